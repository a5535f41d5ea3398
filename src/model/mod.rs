// MODEL: world data and camera
pub mod world;
pub mod camera;

pub use world::{Block, World, TerrainConfig, TerrainGenerator};
pub use camera::{Camera, Projection, ProjectionMode, FOV_SCALE};
