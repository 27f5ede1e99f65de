//! Seed management for world generation
//!
//! Provides separate seeds for each generation system, allowing fine-grained control
//! over which aspects of world generation to vary or keep constant. Also hosts the
//! stable hash primitives every generator builds on: results must be identical
//! across runs and processes, so nothing here goes through `DefaultHasher`.

/// Seeds for all world generation systems.
///
/// Each system gets its own seed, derived from a master seed by default.
/// Individual seeds can be overridden for experimentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Elevation field (mountains, hills, lowlands)
    pub elevation: u64,
    /// Moisture field (water, forest, desert)
    pub moisture: u64,
    /// Warmth field (desert placement)
    pub warmth: u64,
    /// Special terrain features (springs, caves, ruins...)
    pub features: u64,
    /// Settlement placement, prosperity and population
    pub settlements: u64,
    /// Settlement names, feature tags and trade goods
    pub names: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            elevation: derive_seed(master, "elevation"),
            moisture: derive_seed(master, "moisture"),
            warmth: derive_seed(master, "warmth"),
            features: derive_seed(master, "features"),
            settlements: derive_seed(master, "settlements"),
            names: derive_seed(master, "names"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    /// Override the elevation seed
    pub fn elevation(mut self, seed: u64) -> Self {
        self.seeds.elevation = seed;
        self
    }

    /// Override the moisture seed
    pub fn moisture(mut self, seed: u64) -> Self {
        self.seeds.moisture = seed;
        self
    }

    /// Override the warmth seed
    pub fn warmth(mut self, seed: u64) -> Self {
        self.seeds.warmth = seed;
        self
    }

    /// Override the settlements seed
    pub fn settlements(mut self, seed: u64) -> Self {
        self.seeds.settlements = seed;
        self
    }

    /// Build the final WorldSeeds
    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Resolve user seed input to a fixed integer.
///
/// Anything that parses as a 64-bit integer is used as-is (negative values are
/// reinterpreted as `u64`); every other string is hashed. There is no invalid seed.
/// Surrounding whitespace is ignored in both cases.
pub fn resolve_seed(input: &str) -> u64 {
    let trimmed = input.trim();
    numeric_seed(trimmed).unwrap_or_else(|| fnv1a(trimmed.as_bytes()))
}

/// The seed, if `input` is an integer literal.
pub fn numeric_seed(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| trimmed.parse::<i64>().ok().map(|value| value as u64))
}

/// 64-bit FNV-1a over raw bytes.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// splitmix64 finalizer.
#[inline]
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Hash a grid coordinate under a seed and a salt.
///
/// Different salts give independent streams for the same coordinate, which is how
/// placement, prosperity and per-feature rolls stay uncorrelated.
#[inline]
pub fn hash_coord(seed: u64, q: i32, r: i32, salt: u64) -> u64 {
    let mut h = seed ^ salt.wrapping_mul(0x9e3779b97f4a7c15);
    h = mix64(h.wrapping_add(q as i64 as u64));
    h = mix64(h.wrapping_add(r as i64 as u64));
    h
}

/// Map a hash to a float in [0, 1) using its top 53 bits.
#[inline]
pub fn unit(hash: u64) -> f64 {
    (hash >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    mix64(master ^ fnv1a(system.as_bytes()))
}

/// Display format for seeds (useful for sharing world configurations)
impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, elevation: {}, moisture: {}, warmth: {}, \
             features: {}, settlements: {}, names: {} }}",
            self.master,
            self.elevation,
            self.moisture,
            self.warmth,
            self.features,
            self.settlements,
            self.names,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = WorldSeeds::from_master(12345);
        let seeds2 = WorldSeeds::from_master(12345);
        assert_eq!(seeds1, seeds2);
    }

    #[test]
    fn test_different_systems_get_different_seeds() {
        let seeds = WorldSeeds::from_master(12345);

        assert_ne!(seeds.elevation, seeds.moisture);
        assert_ne!(seeds.moisture, seeds.warmth);
        assert_ne!(seeds.settlements, seeds.names);
    }

    #[test]
    fn test_builder_override() {
        let seeds = WorldSeeds::builder(12345).moisture(99999).build();

        assert_eq!(seeds.moisture, 99999);

        let default_seeds = WorldSeeds::from_master(12345);
        assert_eq!(seeds.elevation, default_seeds.elevation);
        assert_eq!(seeds.warmth, default_seeds.warmth);
    }

    #[test]
    fn test_resolve_numeric_and_string_seeds() {
        assert_eq!(resolve_seed("42"), 42);
        assert_eq!(resolve_seed(" 42 "), 42);
        assert_eq!(resolve_seed("-1"), u64::MAX);
        // FNV-1a of "Arden"
        assert_eq!(resolve_seed("Arden"), 0x2748_6cc1_f2f1_83d9);
        assert_eq!(resolve_seed("Arden"), resolve_seed("Arden"));
        assert_ne!(resolve_seed("Arden"), resolve_seed("arden"));
        assert_eq!(resolve_seed("  Arden\n"), resolve_seed("Arden"));
        assert_eq!(numeric_seed(" -7 "), Some(-7i64 as u64));
        assert_eq!(numeric_seed("Arden"), None);
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_unit_range() {
        assert_eq!(unit(0), 0.0);
        assert!(unit(u64::MAX) < 1.0);
        for i in 0..1000 {
            let u = unit(hash_coord(7, i, -i, 3));
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_hash_coord_salts_are_independent() {
        let a = hash_coord(1, 5, 5, 1);
        let b = hash_coord(1, 5, 5, 2);
        assert_ne!(a, b);
        assert_eq!(a, hash_coord(1, 5, 5, 1));
        assert_ne!(hash_coord(1, 5, 6, 1), hash_coord(1, 6, 5, 1));
    }
}
