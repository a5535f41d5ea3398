use image::imageops;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::textures::{TextureSet, TILE_SIZE};
use crate::model::{Camera, ProjectionMode, World};
use crate::utils::{ChunkColumn, WorldCoord};

/// Smallest drawn tile edge in pixels
const MIN_TILE: u32 = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Horizontal tile size used to choose iteration bounds, at least 1
    pub chunk_size: i32,
    /// Chunks scanned on each side of the camera's chunk
    pub render_distance: i32,
    /// Cells y in 0..max_height are scanned
    pub max_height: i32,
    pub sky: [u8; 3],
    /// Apply camera yaw/pitch in projection
    pub rotate: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            chunk_size: 16,
            render_distance: 8,
            max_height: 64,
            sky: [135, 206, 235],
            rotate: false,
        }
    }
}

impl RenderConfig {
    pub fn projection_mode(&self) -> ProjectionMode {
        if self.rotate { ProjectionMode::Rotated } else { ProjectionMode::Translate }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size <= 0 {
            return Err(format!("render.chunk_size must be positive, got {}", self.chunk_size));
        }
        Ok(())
    }
}

/// Per-frame counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// cells scanned
    pub visited: usize,
    /// scanned cells holding a block
    pub present: usize,
    pub drawn: usize,
    /// present but behind the camera or on the undefined plane
    pub culled: usize,
}

/// Brute force point renderer: every block in the scan window is drawn as a
/// scaled tile at its projected position, in scan order, without occlusion.
pub struct Renderer {
    pub config: RenderConfig,
    textures: TextureSet,
}

impl Renderer {
    pub fn new(config: RenderConfig, textures: TextureSet) -> Self {
        Self { config, textures }
    }

    fn chunk_size(&self) -> i32 {
        self.config.chunk_size.max(1)
    }

    /// Chunk columns scanned for a camera, in scan order. Columns past the
    /// i32 range are left out.
    pub fn scan_columns(&self, camera: &Camera) -> Vec<ChunkColumn> {
        let center = WorldCoord::containing(camera.position).to_chunk_column(self.chunk_size());
        let d = self.config.render_distance.max(0);
        let mut columns = Vec::new();
        for dx in -d..=d {
            for dz in -d..=d {
                columns.extend(center.offset(dx, dz));
            }
        }
        columns
    }

    pub fn render(&mut self, world: &World, camera: &Camera) -> (RgbaImage, RenderStats) {
        let c = &self.config;
        let [r, g, b] = c.sky;
        let mut frame = RgbaImage::from_pixel(c.width, c.height, Rgba([r, g, b, 255]));
        let mut stats = RenderStats::default();
        let mode = c.projection_mode();
        let (width, height, max_height) = (c.width, c.height, c.max_height);
        let cs = self.chunk_size();
        // a point right at the eye would ask for an enormous tile
        let max_tile = width.max(height).max(MIN_TILE);

        for column in self.scan_columns(camera) {
            // cells outside the packable range are always air
            let Some((xs, zs)) = column.block_span(cs) else { continue };
            for x in xs {
                for z in zs.clone() {
                    for y in 0..max_height {
                        stats.visited += 1;
                        let coord = WorldCoord(x, y, z);
                        let Some(block) = world.get(coord) else { continue };
                        stats.present += 1;

                        let projected = camera
                            .project(coord.as_vec3(), width, height, mode)
                            .filter(|p| p.is_visible());
                        let Some(p) = projected else {
                            stats.culled += 1;
                            continue;
                        };

                        let size = ((TILE_SIZE as f32 * p.factor) as u32).clamp(MIN_TILE, max_tile);
                        if let Some(tile) = self.textures.scaled(block, size) {
                            let half = (size / 2) as i64;
                            imageops::overlay(&mut frame, tile, p.x as i64 - half, p.y as i64 - half);
                            stats.drawn += 1;
                        }
                    }
                }
            }
        }

        debug!(?stats, "frame rendered");
        (frame, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::utils::AXIS_MAX;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn renderer(config: RenderConfig) -> Renderer {
        Renderer::new(config, TextureSet::generate(&mut StdRng::seed_from_u64(0)))
    }

    fn small() -> RenderConfig {
        RenderConfig { width: 64, height: 48, render_distance: 1, max_height: 8, ..Default::default() }
    }

    #[test]
    fn empty_world_is_all_sky() {
        let mut renderer = renderer(small());
        let (frame, stats) = renderer.render(&World::new(), &Camera::new(Vec3::ZERO));
        assert_eq!(stats.drawn, 0);
        assert_eq!(stats.visited, 3 * 3 * 16 * 16 * 8);
        assert!(frame.pixels().all(|p| *p == Rgba([135, 206, 235, 255])));
    }

    #[test]
    fn block_ahead_is_drawn_at_center() {
        let mut renderer = renderer(small());
        let mut world = World::new();
        world.set(WorldCoord(0, 0, 0), Block::Water).unwrap();

        let (frame, stats) = renderer.render(&world, &Camera::new(Vec3::ZERO));
        assert_eq!(stats, RenderStats { visited: stats.visited, present: 1, drawn: 1, culled: 0 });
        let px = frame.get_pixel(32, 24);
        assert!(px[2] > 200, "expected water blue at center, got {px:?}");
    }

    #[test]
    fn blocks_behind_the_plane_are_culled() {
        let config = RenderConfig { render_distance: 20, ..small() };
        let mut renderer = renderer(config);
        let mut world = World::new();
        world.set(WorldCoord(0, 0, -300), Block::Stone).unwrap();
        world.set(WorldCoord(0, 0, -256), Block::Stone).unwrap();

        let (_, stats) = renderer.render(&world, &Camera::new(Vec3::ZERO));
        assert_eq!(stats.present, 2);
        assert_eq!(stats.culled, 2);
        assert_eq!(stats.drawn, 0);
    }

    #[test]
    fn scan_window_follows_camera_chunk() {
        let renderer = renderer(small());
        let columns = renderer.scan_columns(&Camera::new(Vec3::new(-1.0, 0.0, 40.0)));
        assert_eq!(columns.len(), 9);
        assert_eq!(columns[0], ChunkColumn(-2, 1));
        assert_eq!(columns[8], ChunkColumn(0, 3));
    }

    #[test]
    fn far_camera_scans_only_the_packable_edge() {
        let mut renderer = renderer(small());
        let mut world = World::new();
        world.set(WorldCoord(AXIS_MAX, 0, 0), Block::Stone).unwrap();

        let camera = Camera::new(Vec3::new(1.0e10, 0.0, 0.0));
        let (_, stats) = renderer.render(&world, &camera);
        // the chunk past AXIS_MAX on x is skipped
        assert_eq!(stats.visited, 2 * 3 * 16 * 16 * 8);
        assert_eq!(stats.present, 1);
        assert_eq!(stats.drawn + stats.culled, 1);

        let (_, stats) = renderer.render(&world, &Camera::new(Vec3::new(-1.0e10, f32::MAX, f32::NAN)));
        assert_eq!(stats.present, 0);
    }

    #[test]
    fn non_positive_chunk_size_scans_single_cells() {
        let config = RenderConfig { chunk_size: 0, ..small() };
        assert!(config.validate().is_err());
        let mut renderer = renderer(config);
        let mut world = World::new();
        world.set(WorldCoord(5, 0, 0), Block::Dirt).unwrap();

        let (_, stats) = renderer.render(&world, &Camera::new(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(stats.visited, 3 * 3 * 8);
        assert_eq!(stats.present, 1);
    }
}
