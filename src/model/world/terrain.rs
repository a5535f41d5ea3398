// terrain.rs - column based terrain generation
//
// The world is filled in two passes:
//
// PASS 1: Columns (2D noise)
//   → fractal noise gives a base height per (x, z) column, a second
//     independent noise field adds small scale detail
//   → every cell below the height gets grass / dirt / stone
//   → columns that end below the water level are topped up with water
//   → columns above the water level may become tree sites
//
// PASS 2: Features
//   → trees (wood trunk, diamond shaped leaf cluster) fill only air
//   → optional cloud layer from a third noise field
//
// All randomness comes from the world seed, so a seed reproduces a world.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::block::Block;
use super::map::World;
use super::noise::Perlin;
use crate::error::WorldError;
use crate::utils::WorldCoord;

const DETAIL_SALT: u64 = 0x9E37_79B9_7F4A_7C15;
const CLOUD_SALT: u64 = 0xC2B2_AE3D_27D4_EB4F;
const BLOCK_SALT: u64 = 0x1656_67B1_9E37_79F9;

/// Configuration for terrain generation parameters
///
/// Usage:
///   let mut config = TerrainConfig::default();
///   config.world_size = 32;
///   config.tree_chance = 0.05;  // more trees
///   let gen = TerrainGenerator::new(config, 1234);
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Columns generated along x and z, starting at 0
    pub world_size: i32,

    // Base relief
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub base_height: f64,
    pub height_amplitude: f64,

    // Secondary detail
    pub detail_scale: f64,
    pub detail_amplitude: f64,

    pub water_level: i32,

    // Column fill
    pub grass_chance: f64,
    pub topsoil_depth: i32,
    pub stone_chance: f64,
    pub stone_min_y: i32,

    // Trees
    pub tree_chance: f64,
    pub tree_min_height: i32,
    pub tree_max_height: i32,
    pub leaf_radius: i32,
    pub leaf_reach: i32,

    // Clouds
    pub clouds: bool,
    pub cloud_level: i32,
    pub cloud_scale: f64,
    pub cloud_threshold: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            world_size: 128,

            scale: 100.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            base_height: 20.0,
            height_amplitude: 20.0,

            detail_scale: 25.0,
            detail_amplitude: 5.0,

            water_level: 15,

            grass_chance: 0.9,
            topsoil_depth: 5,
            stone_chance: 0.1,
            stone_min_y: 10,

            tree_chance: 0.01,
            tree_min_height: 4,
            tree_max_height: 7,
            leaf_radius: 2,
            leaf_reach: 4,

            clouds: false,
            cloud_level: 48,
            cloud_scale: 12.0,
            cloud_threshold: 0.35,
        }
    }
}

/// Where a tree grows: column, ground height and trunk length
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeSite {
    pub x: i32,
    pub z: i32,
    pub ground: i32,
    pub trunk_height: i32,
}

/// Summary of one generation pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub seed: u64,
    pub columns: usize,
    pub blocks: usize,
    pub trees: usize,
    pub water_columns: usize,
    pub clouds: usize,
}

pub struct TerrainGenerator {
    pub config: TerrainConfig,
    seed: u64,
    height_noise: Perlin,
    detail_noise: Perlin,
    cloud_noise: Perlin,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            height_noise: Perlin::new(seed),
            detail_noise: Perlin::new(seed ^ DETAIL_SALT),
            cloud_noise: Perlin::new(seed ^ CLOUD_SALT),
        }
    }

    pub fn with_random_seed(config: TerrainConfig) -> Self {
        let seed = rand::thread_rng().gen();
        info!(seed, "no world seed given, picked one");
        Self::new(config, seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Terrain height of column (x, z): number of filled cells from y = 0
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        let c = &self.config;
        let (fx, fz) = (x as f64, z as f64);

        let relief = self.height_noise.fbm2(
            fx / c.scale,
            fz / c.scale,
            c.octaves,
            c.persistence,
            c.lacunarity,
        );
        let base = (relief * c.height_amplitude + c.base_height) as i32;

        let detail = self.detail_noise.noise2(fx / c.detail_scale, fz / c.detail_scale);
        base + (detail * c.detail_amplitude) as i32
    }

    /// Block for cell y of a column whose top filled cell is height - 1
    fn column_block(&self, rng: &mut StdRng, y: i32, height: i32) -> Block {
        let c = &self.config;
        if y == height - 1 {
            if rng.gen::<f64>() < c.grass_chance { Block::Grass } else { Block::Dirt }
        } else if y > height - c.topsoil_depth {
            Block::Dirt
        } else if rng.gen::<f64>() < c.stone_chance && y > c.stone_min_y {
            Block::Stone
        } else {
            Block::Dirt
        }
    }

    /// Populate `world` with terrain, water, trees and (optionally) clouds.
    ///
    /// Fails only when the configured size reaches outside the packable
    /// coordinate range.
    pub fn generate(&self, world: &mut World) -> Result<GenerationReport, WorldError> {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(self.seed ^ BLOCK_SALT);
        let mut report = GenerationReport { seed: self.seed, ..Default::default() };
        let mut sites = Vec::new();

        info!(seed = self.seed, size = c.world_size, "generating world");

        for x in 0..c.world_size {
            for z in 0..c.world_size {
                let height = self.column_height(x, z);
                report.columns += 1;

                for y in 0..height {
                    let block = self.column_block(&mut rng, y, height);
                    world.set(WorldCoord(x, y, z), block)?;
                }

                if height < c.water_level {
                    report.water_columns += 1;
                    for y in height..c.water_level {
                        world.set(WorldCoord(x, y, z), Block::Water)?;
                    }
                }

                if height > c.water_level && rng.gen::<f64>() < c.tree_chance {
                    let lo = c.tree_min_height.min(c.tree_max_height);
                    let hi = c.tree_min_height.max(c.tree_max_height);
                    sites.push(TreeSite { x, z, ground: height, trunk_height: rng.gen_range(lo..=hi) });
                }
            }
        }

        for site in &sites {
            self.plant_tree(world, site)?;
        }
        report.trees = sites.len();

        if c.clouds {
            report.clouds = self.spread_clouds(world)?;
        }

        report.blocks = world.len();
        info!(
            blocks = report.blocks,
            trees = report.trees,
            water_columns = report.water_columns,
            "world generated"
        );
        Ok(report)
    }

    /// Trunk from the ground up, then leaves within `leaf_reach` (manhattan)
    /// of the cell above the trunk. Leaves replace the top of this tree's own
    /// trunk but no other existing block.
    pub fn plant_tree(&self, world: &mut World, site: &TreeSite) -> Result<(), WorldError> {
        let c = &self.config;
        let mut planted = Vec::new();
        for y in site.ground..site.ground + site.trunk_height {
            if world.set_if_empty(WorldCoord(site.x, y, site.z), Block::Wood)? {
                planted.push(y);
            }
        }

        let crown = WorldCoord(site.x, site.ground + site.trunk_height, site.z);
        let r = c.leaf_radius;
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if dx.abs() + dy.abs() + dz.abs() >= c.leaf_reach {
                        continue;
                    }
                    let cell = crown.offset(dx, dy, dz);
                    if dx == 0 && dz == 0 && planted.contains(&cell.1) {
                        world.set(cell, Block::Leaf)?;
                    } else {
                        world.set_if_empty(cell, Block::Leaf)?;
                    }
                }
            }
        }
        debug!(x = site.x, z = site.z, trunk = site.trunk_height, "planted tree");
        Ok(())
    }

    fn spread_clouds(&self, world: &mut World) -> Result<usize, WorldError> {
        let c = &self.config;
        let mut placed = 0;
        for x in 0..c.world_size {
            for z in 0..c.world_size {
                let n = self.cloud_noise.noise2(x as f64 / c.cloud_scale, z as f64 / c.cloud_scale);
                if n > c.cloud_threshold && world.set_if_empty(WorldCoord(x, c.cloud_level, z), Block::Cloud)? {
                    placed += 1;
                }
            }
        }
        Ok(placed)
    }
}
