//! Hexagonal grid addressing.
//!
//! Axial coordinates over an unbounded plane: neighbors, rings, distance,
//! lines, canonical storage keys and screen layout helpers.

pub mod coords;
pub mod layout;

pub use coords::{
    axial_round, distance, hex_count, line, neighbors, ring, HexCoord, HexDirection,
};
pub use layout::{from_pixel, to_pixel};
