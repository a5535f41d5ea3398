// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod utils;
pub mod error;
pub mod config;

// MVC Architecture for the voxel world
pub mod model;
pub mod view;
pub mod controller;

// Standalone utilities
pub mod stress;
pub mod clock;
pub mod player;

pub use error::Error;
