//! Screen-space conversion for flat-top hexes.
//!
//! The rendering side positions cells with these; nothing in generation
//! depends on them.

use super::coords::{axial_round, HexCoord};

const SQRT_3: f64 = 1.7320508075688772;

/// Center of a hex in pixels for a given hex size (center to corner).
pub fn to_pixel(coord: HexCoord, size: f64) -> (f64, f64) {
    let q = coord.q as f64;
    let r = coord.r as f64;
    let x = size * (1.5 * q);
    let y = size * (SQRT_3 * (r + q / 2.0));
    (x, y)
}

/// Hex containing a pixel position.
pub fn from_pixel(x: f64, y: f64, size: f64) -> HexCoord {
    let q = (2.0 / 3.0 * x) / size;
    let r = (-1.0 / 3.0 * x + SQRT_3 / 3.0 * y) / size;
    axial_round(q, r)
}
