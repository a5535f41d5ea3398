use std::path::PathBuf;

use image::RgbaImage;
use tracing::{error, info, warn};

use super::camera_controller::CameraController;
use super::input::{InputEvent, InputState};
use crate::error::WorldError;
use crate::model::world::{persist, GenerationReport};
use crate::model::{Camera, TerrainConfig, TerrainGenerator, World};
use crate::view::{RenderStats, Renderer};

/// One-shot actions bound to keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Save,
    Load,
    Reset,
    Quit,
}

impl Command {
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            "p" => Some(Command::Save),
            "l" => Some(Command::Load),
            "r" => Some(Command::Reset),
            "Escape" => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns everything one running voxel world needs.
pub struct Engine {
    pub world: World,
    pub camera: Camera,
    pub input: InputState,
    pub controller: CameraController,
    generator: TerrainGenerator,
    save_path: PathBuf,
}

impl Engine {
    /// Generate a fresh world and place the camera over it
    pub fn new(generator: TerrainGenerator, save_path: PathBuf) -> Result<Self, WorldError> {
        let mut world = World::new();
        generator.generate(&mut world)?;
        Ok(Self::with_world(world, generator, save_path))
    }

    /// Start from an existing world, e.g. one loaded from disk
    pub fn with_world(world: World, generator: TerrainGenerator, save_path: PathBuf) -> Self {
        Self {
            world,
            camera: Camera::spawn_for(generator.config.world_size),
            input: InputState::new(),
            controller: CameraController::new(),
            generator,
            save_path,
        }
    }

    pub fn terrain(&self) -> &TerrainConfig {
        &self.generator.config
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn save_path(&self) -> &std::path::Path {
        &self.save_path
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        if let InputEvent::KeyDown(key) = &event {
            if let Some(command) = Command::for_key(key) {
                return self.execute(command);
            }
        }
        self.input.process_event(&event);
        Flow::Continue
    }

    /// Run a command. Failures are logged and leave the world as it was.
    pub fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Save => match persist::save(&self.world, &self.save_path) {
                Ok(count) => info!(path = %self.save_path.display(), count, "world saved"),
                Err(e) => error!("save failed: {e}"),
            },
            Command::Load => match persist::load(&self.save_path) {
                Ok(world) => {
                    info!(path = %self.save_path.display(), count = world.len(), "world loaded");
                    self.world = world;
                }
                Err(e) => warn!("load failed, keeping current world: {e}"),
            },
            Command::Reset => {
                if let Err(e) = self.regenerate() {
                    error!("regeneration failed: {e}");
                }
            }
            Command::Quit => return Flow::Exit,
        }
        Flow::Continue
    }

    /// Wipe the world and generate it again from the same seed
    pub fn regenerate(&mut self) -> Result<GenerationReport, WorldError> {
        let mut world = World::new();
        let report = self.generator.generate(&mut world)?;
        self.world = world;
        Ok(report)
    }

    /// Advance one frame: held keys move, mouse motion turns
    pub fn update(&mut self) {
        self.controller.update_movement(&mut self.camera, &self.input);
        let (dx, dy) = self.input.consume_look();
        self.controller.apply_look(&mut self.camera, dx, dy);
    }

    pub fn render(&self, renderer: &mut Renderer) -> (RgbaImage, RenderStats) {
        renderer.render(&self.world, &self.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::utils::WorldCoord;
    use glam::Vec3;

    fn engine(name: &str) -> Engine {
        let config = TerrainConfig { world_size: 8, ..Default::default() };
        let path = std::env::temp_dir()
            .join(format!("deskbench-engine-{}-{name}", std::process::id()))
            .join("world.json");
        Engine::new(TerrainGenerator::new(config, 21), path).unwrap()
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::for_key("p"), Some(Command::Save));
        assert_eq!(Command::for_key("l"), Some(Command::Load));
        assert_eq!(Command::for_key("r"), Some(Command::Reset));
        assert_eq!(Command::for_key("Escape"), Some(Command::Quit));
        assert_eq!(Command::for_key("w"), None);
    }

    #[test]
    fn failed_load_keeps_world() {
        let mut engine = engine("failed-load");
        let before = engine.world.clone();
        assert_eq!(engine.execute(Command::Load), Flow::Continue);
        assert_eq!(engine.world, before);
    }

    #[test]
    fn save_then_load_restores_edits() {
        let mut engine = engine("save-load");
        let original = engine.world.clone();
        engine.execute(Command::Save);

        engine.world.set(WorldCoord(0, 100, 0), Block::Sand).unwrap();
        assert_ne!(engine.world, original);
        engine.handle_event(InputEvent::KeyDown("l".into()));
        assert_eq!(engine.world, original);

        let _ = std::fs::remove_dir_all(engine.save_path().parent().unwrap());
    }

    #[test]
    fn reset_regenerates_same_world() {
        let mut engine = engine("reset");
        let original = engine.world.clone();
        engine.world.clear();
        engine.execute(Command::Reset);
        assert_eq!(engine.world, original);
    }

    #[test]
    fn escape_exits_and_movement_updates_camera() {
        let mut engine = engine("movement");
        assert_eq!(engine.camera.position, Vec3::new(4.0, 20.0, 4.0));
        engine.handle_event(InputEvent::KeyDown("s".into()));
        engine.handle_event(InputEvent::MouseMove { dx: 10.0, dy: 0.0 });
        engine.update();
        assert_eq!(engine.camera.position, Vec3::new(4.0, 20.0, 3.5));
        assert_eq!(engine.camera.yaw, 2.0);
        assert_eq!(engine.handle_event(InputEvent::KeyDown("Escape".into())), Flow::Exit);
    }
}
