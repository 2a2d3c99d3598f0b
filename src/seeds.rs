//! Seed management for terrain generation
//!
//! Every randomized stage gets its own seed, derived from a master seed by
//! default, so one stage can be varied while the others stay fixed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use noise::Perlin;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for all terrain generation stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Permutation table of the shared Perlin noise
    pub noise: u32,
    /// Random heights, Voronoi peaks and midpoint displacement
    pub heightmap: u64,
    /// Coastline noise offsets
    pub island: u64,
    /// Droplet placement and river neighbour shuffles
    pub erosion: u64,
    /// Tree density draws and jitter
    pub vegetation: u64,
    /// Detail density draws
    pub details: u64,
}

impl TerrainSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            noise: derive_seed(master, "noise") as u32,
            heightmap: derive_seed(master, "heightmap"),
            island: derive_seed(master, "island"),
            erosion: derive_seed(master, "erosion"),
            vegetation: derive_seed(master, "vegetation"),
            details: derive_seed(master, "details"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> TerrainSeedsBuilder {
        TerrainSeedsBuilder::new(master)
    }

    /// The shared Perlin source for all noise-driven stages.
    pub fn perlin(&self) -> Perlin {
        Perlin::new(self.noise)
    }

    /// A fresh generator for one stage, e.g. `seeds.rng(seeds.erosion)`.
    pub fn rng(&self, stage_seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(stage_seed)
    }
}

impl Default for TerrainSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct TerrainSeedsBuilder {
    seeds: TerrainSeeds,
}

impl TerrainSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: TerrainSeeds::from_master(master),
        }
    }

    pub fn noise(mut self, seed: u32) -> Self {
        self.seeds.noise = seed;
        self
    }

    pub fn heightmap(mut self, seed: u64) -> Self {
        self.seeds.heightmap = seed;
        self
    }

    pub fn island(mut self, seed: u64) -> Self {
        self.seeds.island = seed;
        self
    }

    /// Override the erosion seed
    pub fn erosion(mut self, seed: u64) -> Self {
        self.seeds.erosion = seed;
        self
    }

    pub fn vegetation(mut self, seed: u64) -> Self {
        self.seeds.vegetation = seed;
        self
    }

    pub fn details(mut self, seed: u64) -> Self {
        self.seeds.details = seed;
        self
    }

    pub fn build(self) -> TerrainSeeds {
        self.seeds
    }
}

/// Hash a master seed together with a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, noise: {}, heightmap: {}, island: {}, erosion: {}, \
             vegetation: {}, details: {} }}",
            self.master, self.noise, self.heightmap, self.island, self.erosion, self.vegetation, self.details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_deterministic_derivation() {
        assert_eq!(TerrainSeeds::from_master(12345), TerrainSeeds::from_master(12345));
        assert_ne!(TerrainSeeds::from_master(12345), TerrainSeeds::from_master(12346));
    }

    #[test]
    fn test_stages_get_different_seeds() {
        let seeds = TerrainSeeds::from_master(12345);
        assert_ne!(seeds.heightmap, seeds.island);
        assert_ne!(seeds.island, seeds.erosion);
        assert_ne!(seeds.vegetation, seeds.details);
    }

    #[test]
    fn test_builder_override() {
        let seeds = TerrainSeeds::builder(12345).erosion(99999).noise(7).build();
        let derived = TerrainSeeds::from_master(12345);

        assert_eq!(seeds.erosion, 99999);
        assert_eq!(seeds.noise, 7);
        assert_eq!(seeds.heightmap, derived.heightmap);
        assert_eq!(seeds.details, derived.details);
    }

    #[test]
    fn test_stage_rng_repeats() {
        let seeds = TerrainSeeds::from_master(1);
        let a: u64 = seeds.rng(seeds.erosion).gen();
        let b: u64 = seeds.rng(seeds.erosion).gen();
        assert_eq!(a, b);
    }
}
