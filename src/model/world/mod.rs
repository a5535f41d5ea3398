pub mod block;
pub mod map;
pub mod noise;
pub mod persist;
pub mod terrain;

pub use block::Block;
pub use map::World;
pub use terrain::{GenerationReport, TerrainConfig, TerrainGenerator};
