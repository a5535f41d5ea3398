use std::path::PathBuf;

use deskbench::controller::{Command, Engine, Flow, InputEvent};
use deskbench::model::world::persist;
use deskbench::model::{Block, Camera, TerrainConfig, TerrainGenerator, World};
use deskbench::utils::WorldCoord;
use deskbench::view::{RenderConfig, Renderer, TextureSet};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("deskbench-it-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_generator(water_level: i32) -> TerrainGenerator {
    let config = TerrainConfig { world_size: 8, water_level, ..Default::default() };
    TerrainGenerator::new(config, 7)
}

#[test]
fn low_columns_are_flooded_up_to_water_level() {
    // a high water level floods most columns of the 8x8 patch
    for water_level in [15, 30] {
        let generator = small_generator(water_level);
        let mut world = World::new();
        let report = generator.generate(&mut world).unwrap();
        assert_eq!(report.columns, 64);

        let mut flooded = 0;
        for x in 0..8 {
            for z in 0..8 {
                let height = generator.column_height(x, z);
                for y in 0..height {
                    let block = world.get(WorldCoord(x, y, z)).unwrap();
                    assert!(matches!(block, Block::Grass | Block::Dirt | Block::Stone), "{block:?} at {x},{y},{z}");
                }
                if height < water_level {
                    flooded += 1;
                    for y in height..water_level {
                        assert_eq!(world.get(WorldCoord(x, y, z)), Some(Block::Water));
                    }
                }
            }
        }
        assert_eq!(flooded, report.water_columns);
    }
}

#[test]
fn world_file_round_trip() {
    let dir = scratch_dir("round-trip");
    let generator = small_generator(15);
    let mut world = World::new();
    generator.generate(&mut world).unwrap();
    world.set(WorldCoord(-3, 90, 1_000), Block::Cloud).unwrap();

    let path = dir.join("nested").join("world.json");
    let saved = persist::save(&world, &path).unwrap();
    assert_eq!(saved, world.len());
    assert_eq!(persist::load(&path).unwrap(), world);

    let empty = dir.join("empty.json");
    persist::save(&World::new(), &empty).unwrap();
    assert!(persist::load(&empty).unwrap().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn same_seed_same_world() {
    let mut a = World::new();
    let mut b = World::new();
    small_generator(15).generate(&mut a).unwrap();
    small_generator(15).generate(&mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn generated_world_renders() {
    let generator = small_generator(15);
    let mut world = World::new();
    generator.generate(&mut world).unwrap();

    let config = RenderConfig { width: 160, height: 120, render_distance: 2, ..Default::default() };
    let sky = config.sky;
    let mut renderer = Renderer::new(config, TextureSet::generate(&mut StdRng::seed_from_u64(1)));
    let camera = Camera::new(Vec3::new(4.0, 40.0, -20.0));
    let (frame, stats) = renderer.render(&world, &camera);

    assert_eq!(frame.dimensions(), (160, 120));
    // the scanned chunks cover the whole 8x8 patch
    assert_eq!(stats.present, world.len());
    assert_eq!(stats.drawn + stats.culled, stats.present);
    assert!(stats.drawn > 0);
    assert!(frame.pixels().any(|p| p.0[..3] != sky));
}

#[test]
fn engine_session_saves_moves_and_reloads() {
    let dir = scratch_dir("engine");
    let path = dir.join("world.json");
    let mut engine = Engine::new(small_generator(15), path.clone()).unwrap();
    let start = engine.camera.position;

    assert_eq!(engine.handle_event(InputEvent::KeyDown("p".into())), Flow::Continue);
    assert!(path.exists());

    engine.handle_event(InputEvent::KeyDown("w".into()));
    engine.update();
    engine.handle_event(InputEvent::KeyUp("w".into()));
    assert!(engine.camera.position.z > start.z);

    let saved = engine.world.clone();
    engine.world.clear();
    engine.execute(Command::Load);
    assert_eq!(engine.world, saved);
    assert_eq!(engine.handle_event(InputEvent::KeyDown("Escape".into())), Flow::Exit);

    std::fs::remove_dir_all(&dir).unwrap();
}
