//! Axial hex coordinates and grid math.
//!
//! Coordinates are unbounded signed pairs (q, r); the implicit cube component is
//! `s = -q - r`. Every operation here is total over the whole integer domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// One of the six neighbor directions, in the fixed order used for rings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// All directions in ring-walk order.
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Axial offset for one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    pub fn opposite(self) -> HexDirection {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    /// Short label used by the CLI (`e`, `ne`, `nw`, `w`, `sw`, `se`).
    pub fn label(self) -> &'static str {
        match self {
            HexDirection::East => "e",
            HexDirection::NorthEast => "ne",
            HexDirection::NorthWest => "nw",
            HexDirection::West => "w",
            HexDirection::SouthWest => "sw",
            HexDirection::SouthEast => "se",
        }
    }
}

impl FromStr for HexDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        HexDirection::ALL
            .into_iter()
            .find(|d| d.label() == lower)
            .ok_or_else(|| format!("unknown direction '{}' (expected e, ne, nw, w, sw, se)", s))
    }
}

/// Axial hex coordinate.
///
/// Ordering is lexicographic on (q, r) so exports and reports are stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube component, widened so it cannot overflow at the domain edges
    pub fn s(&self) -> i64 {
        -(self.q as i64) - self.r as i64
    }

    /// Step once in a direction
    pub fn neighbor(&self, dir: HexDirection) -> HexCoord {
        self.offset(dir, 1)
    }

    /// Step `steps` times in a direction
    pub fn offset(&self, dir: HexDirection, steps: i32) -> HexCoord {
        let (dq, dr) = dir.offset();
        HexCoord::new(
            self.q.wrapping_add(dq.wrapping_mul(steps)),
            self.r.wrapping_add(dr.wrapping_mul(steps)),
        )
    }

    /// The six adjacent coordinates, in direction order.
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::ALL.map(|d| self.neighbor(d))
    }

    /// Hex metric distance, saturating at `u32::MAX` for points on opposite
    /// edges of the integer domain.
    pub fn distance(&self, other: &HexCoord) -> u32 {
        let dq = (self.q as i64 - other.q as i64).abs();
        let dr = (self.r as i64 - other.r as i64).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2).min(u32::MAX as i64) as u32
    }

    /// Coordinates at exactly `radius` from this one.
    ///
    /// Walk starts `radius` steps to the south-west and proceeds counter-clockwise
    /// through the six directions, so the order is deterministic. Radius 0 yields
    /// the center alone.
    pub fn ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }
        let radius = radius as i32;
        let mut results = Vec::with_capacity(6 * radius as usize);
        let mut cursor = self.offset(HexDirection::SouthWest, radius);
        for dir in HexDirection::ALL {
            for _ in 0..radius {
                results.push(cursor);
                cursor = cursor.neighbor(dir);
            }
        }
        results
    }

    /// Center followed by rings 1..=radius.
    pub fn spiral(&self, radius: u32) -> Vec<HexCoord> {
        let mut results = Vec::with_capacity(hex_count(radius));
        for k in 0..=radius {
            results.extend(self.ring(k));
        }
        results
    }

    /// All coordinates within `radius` in row order (r, then q).
    pub fn within(&self, radius: u32) -> Vec<HexCoord> {
        let n = radius as i32;
        let mut results = Vec::with_capacity(hex_count(radius));
        for dr in -n..=n {
            let q_min = (-n).max(-dr - n);
            let q_max = n.min(-dr + n);
            for dq in q_min..=q_max {
                results.push(HexCoord::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr)));
            }
        }
        results
    }

    /// Straight line from `self` to `other`, both endpoints included.
    pub fn line_to(&self, other: &HexCoord) -> Vec<HexCoord> {
        let n = self.distance(other);
        if n == 0 {
            return vec![*self];
        }
        // Nudge off exact edges so ties round consistently.
        let (aq, ar) = (self.q as f64 + 1e-6, self.r as f64 + 1e-6);
        let (bq, br) = (other.q as f64 + 1e-6, other.r as f64 + 1e-6);
        (0..=n)
            .map(|i| {
                let t = i as f64 / n as f64;
                axial_round(aq + (bq - aq) * t, ar + (br - ar) * t)
            })
            .collect()
    }

    /// Canonical storage key, e.g. `+0015_-0007`.
    pub fn key(&self) -> String {
        format!("{:+05}_{:+05}", self.q, self.r)
    }

    /// Parse a key produced by [`HexCoord::key`].
    pub fn from_key(key: &str) -> Result<HexCoord, WorldError> {
        let invalid = || WorldError::InvalidKey(key.to_string());
        let (q_part, r_part) = key.split_once('_').ok_or_else(invalid)?;
        let q = parse_axis(q_part).ok_or_else(invalid)?;
        let r = parse_axis(r_part).ok_or_else(invalid)?;
        Ok(HexCoord::new(q, r))
    }
}

/// Number of cells in a hexagon of the given radius.
pub fn hex_count(radius: u32) -> usize {
    let n = radius as usize;
    1 + 3 * n * (n + 1)
}

/// Free-function form of [`HexCoord::neighbors`].
pub fn neighbors(c: HexCoord) -> [HexCoord; 6] {
    c.neighbors()
}

/// Free-function form of [`HexCoord::distance`].
pub fn distance(a: HexCoord, b: HexCoord) -> u32 {
    a.distance(&b)
}

/// Free-function form of [`HexCoord::ring`].
pub fn ring(center: HexCoord, radius: u32) -> Vec<HexCoord> {
    center.ring(radius)
}

/// Free-function form of [`HexCoord::line_to`].
pub fn line(a: HexCoord, b: HexCoord) -> Vec<HexCoord> {
    a.line_to(&b)
}

/// Round fractional axial coordinates to the nearest hex.
pub fn axial_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }
    HexCoord::new(rq as i32, rr as i32)
}

/// One axis token: explicit sign followed by at least four digits.
fn parse_axis(token: &str) -> Option<i32> {
    let digits = token.strip_prefix('+').or_else(|| token.strip_prefix('-'))?;
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<i32>().ok()
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Parses `q,r` (as typed on the command line).
impl FromStr for HexCoord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'q,r', got '{}'", s))?;
        let q = q.trim().parse::<i32>().map_err(|e| format!("bad q in '{}': {}", s, e))?;
        let r = r.trim().parse::<i32>().map_err(|e| format!("bad r in '{}': {}", s, e))?;
        Ok(HexCoord::new(q, r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_neighbors_are_at_distance_one() {
        let c = HexCoord::new(3, -7);
        let ns = c.neighbors();
        assert_eq!(ns.len(), 6);
        for n in ns {
            assert_eq!(c.distance(&n), 1);
        }
        let unique: HashSet<_> = ns.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_distance_symmetry_and_examples() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(3, -1);
        assert_eq!(a.distance(&b), 3);
        assert_eq!(b.distance(&a), 3);
        assert_eq!(HexCoord::new(-2, 5).distance(&HexCoord::new(4, -3)), 8);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_distance_extreme_values() {
        let a = HexCoord::new(i32::MAX, i32::MIN);
        let b = HexCoord::new(i32::MIN, i32::MAX);
        assert!(a.distance(&b) > 0);
    }

    #[test]
    fn test_ring_sizes_and_order() {
        let c = HexCoord::new(2, 2);
        assert_eq!(c.ring(0), vec![c]);
        for radius in 1..6u32 {
            let ring = c.ring(radius);
            assert_eq!(ring.len(), 6 * radius as usize);
            for h in &ring {
                assert_eq!(c.distance(h), radius);
            }
            let unique: HashSet<_> = ring.iter().collect();
            assert_eq!(unique.len(), ring.len());
            // consecutive entries are adjacent: it is a walk
            for pair in ring.windows(2) {
                assert_eq!(pair[0].distance(&pair[1]), 1);
            }
        }
        // deterministic starting point
        assert_eq!(c.ring(2)[0], HexCoord::new(0, 4));
    }

    #[test]
    fn test_spiral_and_within_cover_same_cells() {
        let c = HexCoord::new(-4, 9);
        let spiral: HashSet<_> = c.spiral(4).into_iter().collect();
        let within: HashSet<_> = c.within(4).into_iter().collect();
        assert_eq!(spiral.len(), hex_count(4));
        assert_eq!(spiral, within);
        assert_eq!(c.spiral(4)[0], c);
    }

    #[test]
    fn test_line_endpoints_and_length() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(5, -2);
        let line = a.line_to(&b);
        assert_eq!(line.len(), a.distance(&b) as usize + 1);
        assert_eq!(line[0], a);
        assert_eq!(*line.last().unwrap(), b);
        for pair in line.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
        assert_eq!(a.line_to(&a), vec![a]);
    }

    #[test]
    fn test_key_format_and_roundtrip() {
        assert_eq!(HexCoord::new(15, -7).key(), "+0015_-0007");
        assert_eq!(HexCoord::new(0, 0).key(), "+0000_+0000");
        for c in [
            HexCoord::new(0, 0),
            HexCoord::new(-1, 1),
            HexCoord::new(12345, -99999),
            HexCoord::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(HexCoord::from_key(&c.key()).unwrap(), c);
        }
    }

    #[test]
    fn test_key_rejects_malformed() {
        for bad in ["", "0015_-0007", "+15_-0007", "+0015-0007", "+00a5_+0001", "+0001_"] {
            assert!(HexCoord::from_key(bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_axial_round() {
        assert_eq!(axial_round(0.1, -0.1), HexCoord::new(0, 0));
        assert_eq!(axial_round(0.9, 0.05), HexCoord::new(1, 0));
        assert_eq!(axial_round(-1.4, 1.45), HexCoord::new(-1, 1));
    }

    #[test]
    fn test_parse_from_cli() {
        assert_eq!("3,-4".parse::<HexCoord>().unwrap(), HexCoord::new(3, -4));
        assert_eq!(" -2 , 7 ".parse::<HexCoord>().unwrap(), HexCoord::new(-2, 7));
        assert!("3".parse::<HexCoord>().is_err());
        assert_eq!("NE".parse::<HexDirection>().unwrap(), HexDirection::NorthEast);
        assert!("up".parse::<HexDirection>().is_err());
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let c = HexCoord::new(1, 1);
        for d in HexDirection::ALL {
            assert_eq!(c.neighbor(d).neighbor(d.opposite()), c);
        }
    }
}
