// CONTROLLER: input, camera control and the engine loop state
pub mod input;
pub mod camera_controller;
pub mod engine;

pub use input::{InputEvent, InputState};
pub use camera_controller::CameraController;
pub use engine::{Command, Engine, Flow};
