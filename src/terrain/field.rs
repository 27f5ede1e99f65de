//! Deterministic scalar fields sampled per hex.
//!
//! Each field is fractal Perlin noise read at the hex center. Two hexes close
//! together sample nearby points and get correlated values, which is what makes
//! terrain cluster without ever looking at a neighbor's generated result.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin, Seedable};

use crate::hex::HexCoord;
use crate::seeds::{mix64, unit};

/// sqrt(3) / 2, the row spacing of a pointy layout with unit neighbor distance.
const ROW_HEIGHT: f64 = 0.8660254037844386;

/// Width of the window a field's origin is shifted into. Perlin is zero on
/// every lattice point, so without the shift hex (0, 0) reads 0.5 for all seeds.
const DOMAIN_SPAN: f64 = 4096.0;

/// Continuous position of a hex center; neighbors are exactly 1.0 apart.
pub fn hex_position(coord: HexCoord) -> (f64, f64) {
    let x = coord.q as f64 + coord.r as f64 * 0.5;
    let y = coord.r as f64 * ROW_HEIGHT;
    (x, y)
}

/// Fold a 64-bit system seed into a `noise` seed.
///
/// `Fbm` seeds octave `i` with `seed + i`, so the top bit is kept clear.
pub fn noise_seed(seed: u64) -> u32 {
    ((seed ^ (seed >> 32)) as u32) >> 1
}

/// Fractal Perlin noise rescaled into [0, 1].
#[derive(Clone, Debug)]
pub struct FractalField {
    fbm: Fbm<Perlin>,
    offset: [f64; 2],
}

impl FractalField {
    pub fn new(seed: u64, frequency: f64, octaves: u32, persistence: f64) -> Self {
        let fbm = Fbm::<Perlin>::new(0)
            .set_seed(noise_seed(seed))
            .set_octaves(octaves.max(1) as usize)
            .set_frequency(frequency)
            .set_lacunarity(2.0)
            .set_persistence(persistence);
        let offset = [
            unit(mix64(seed)) * DOMAIN_SPAN,
            unit(mix64(!seed)) * DOMAIN_SPAN,
        ];
        Self { fbm, offset }
    }

    /// Field value at a hex center.
    pub fn sample(&self, coord: HexCoord) -> f64 {
        let (x, y) = hex_position(coord);
        self.get([x, y])
    }

    pub fn octave_count(&self) -> usize {
        self.fbm.octaves
    }
}

impl NoiseFn<f64, 2> for FractalField {
    fn get(&self, point: [f64; 2]) -> f64 {
        let [x, y] = point;
        let v = self.fbm.get([x + self.offset[0], y + self.offset[1]]);
        (v + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexDirection;

    #[test]
    fn test_noise_seed_leaves_octave_headroom() {
        for seed in [0, 1, u64::MAX, 0x8000_0000, 0xdead_beef_cafe_f00d] {
            assert!(noise_seed(seed) <= u32::MAX >> 1, "{:#x}", seed);
        }
        // Would overflow `seed + octave` inside Fbm without the fold.
        let field = FractalField::new(u64::MAX, 0.07, 8, 0.5);
        assert_eq!(field.octave_count(), 8);
        let v = field.sample(HexCoord::new(3, -7));
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let field = FractalField::new(1234, 0.07, 4, 0.5);
        for coord in HexCoord::ORIGIN.spiral(20) {
            let v = field.sample(coord);
            assert!((0.0..=1.0).contains(&v), "{} out of range at {}", v, coord);
        }
    }

    #[test]
    fn test_origin_is_not_a_lattice_zero() {
        let origins: Vec<f64> = (1..=4u64)
            .map(|seed| FractalField::new(seed, 0.07, 4, 0.5).sample(HexCoord::ORIGIN))
            .collect();
        assert!(origins.iter().all(|&v| v != 0.5), "{:?}", origins);
        assert_ne!(origins[0], origins[1]);
    }

    #[test]
    fn test_neighbors_are_correlated() {
        // Adjacent samples differ far less than unrelated ones on average.
        let field = FractalField::new(77, 0.07, 4, 0.5);
        let mut adjacent = 0.0;
        let mut distant = 0.0;
        let mut n = 0.0;
        for coord in HexCoord::ORIGIN.spiral(15) {
            let here = field.sample(coord);
            let next = field.sample(coord.neighbor(HexDirection::East));
            let far = field.sample(HexCoord::new(coord.q + 500, coord.r - 300));
            adjacent += (here - next).abs();
            distant += (here - far).abs();
            n += 1.0;
        }
        assert!(adjacent / n < 0.5 * (distant / n));
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = FractalField::new(5, 0.09, 3, 0.5);
        let b = FractalField::new(5, 0.09, 3, 0.5);
        let c = FractalField::new(6, 0.09, 3, 0.5);
        let coord = HexCoord::new(-40, 17);
        assert_eq!(a.sample(coord), b.sample(coord));
        assert_ne!(a.sample(coord), c.sample(coord));
        assert_eq!(a.octave_count(), 3);
    }
}
