// VIEW: software rendering into an image
pub mod render;
pub mod textures;

pub use render::{RenderConfig, RenderStats, Renderer};
pub use textures::TextureSet;
