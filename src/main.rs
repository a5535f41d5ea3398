use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

// Import from the library crate
use deskbench::{
    logging, model, view, controller,
    clock, config, player, stress,
    Error,
};

use clock::{palette, ClockReading, ClockState, Theme};
use config::AppConfig;
use controller::{Engine, Flow, InputEvent};
use model::world::persist;
use model::{TerrainConfig, TerrainGenerator, World};
use player::{Player, Playlist};
use stress::{StressSession, SystemTelemetry, TelemetrySource};
use view::{Renderer, TextureSet};

mod cli;

use cli::{Cli, Commands, WorldCommand};

/// How long `stop` waits for load workers
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

fn main() -> Result<(), Error> {
    logging::init();
    let cli = Cli::parse();
    run(cli).map_err(|e| {
        error!("fatal: {e}");
        e
    })
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::World { action } => match action {
            WorldCommand::Generate { size, seed, out } => generate_world(&config, size, seed, &out),
            WorldCommand::Render { load, size, seed, pos, yaw, pitch, rotate, keys, width, height, out } => {
                let mut render = config.render.clone();
                render.rotate |= rotate;
                if let Some(width) = width {
                    render.width = width;
                }
                if let Some(height) = height {
                    render.height = height;
                }

                let generator = generator(terrain_config(&config, size), seed);
                let texture_seed = generator.seed();
                let mut engine = match load {
                    Some(path) => Engine::with_world(persist::load(&path)?, generator, path),
                    None => Engine::new(generator, PathBuf::from("world.json"))?,
                };

                if let Some(pos) = pos {
                    engine.camera.position = Vec3::new(pos[0], pos[1], pos[2]);
                }
                engine.camera.yaw = yaw;
                engine.camera.set_pitch(pitch);
                if let Some(keys) = keys {
                    replay_keys(&mut engine, &keys);
                }

                let mut renderer = Renderer::new(render, TextureSet::generate(&mut StdRng::seed_from_u64(texture_seed)));
                let (frame, stats) = engine.render(&mut renderer);
                frame.save(&out)?;
                info!(path = %out.display(), drawn = stats.drawn, culled = stats.culled, "frame written");
                println!(
                    "Rendered {} of {} blocks ({} culled) from {:?} to {}",
                    stats.drawn,
                    stats.present,
                    stats.culled,
                    engine.camera.position,
                    out.display()
                );
                Ok(())
            }
        },
        Commands::Stress { cpu, ram, duration, kind, threads } => {
            let mut settings = config.stress.clone();
            settings.cpu_percent = cpu.unwrap_or(settings.cpu_percent);
            settings.ram_percent = ram.unwrap_or(settings.ram_percent);
            settings.duration_secs = duration.unwrap_or(settings.duration_secs);
            settings.kind = kind.unwrap_or(settings.kind);
            settings.cpu_threads = threads.unwrap_or(settings.cpu_threads);
            run_stress(settings)
        }
        Commands::Telemetry { samples, interval_ms } => {
            let mut telemetry = SystemTelemetry::new();
            for i in 0..samples {
                if i > 0 {
                    thread::sleep(Duration::from_millis(interval_ms));
                }
                println!("{}", telemetry.sample());
            }
            Ok(())
        }
        Commands::Clock { ticks, interval_ms, dark } => {
            run_clock(ticks, Duration::from_millis(interval_ms), dark);
            Ok(())
        }
        Commands::Playlist { files, volume } => {
            show_playlist(&files, volume);
            Ok(())
        }
    }
}

fn terrain_config(config: &AppConfig, size: Option<i32>) -> TerrainConfig {
    let mut terrain = config.terrain.clone();
    if let Some(size) = size {
        terrain.world_size = size;
    }
    terrain
}

fn generator(terrain: TerrainConfig, seed: Option<u64>) -> TerrainGenerator {
    match seed {
        Some(seed) => TerrainGenerator::new(terrain, seed),
        None => TerrainGenerator::with_random_seed(terrain),
    }
}

fn generate_world(config: &AppConfig, size: Option<i32>, seed: Option<u64>, out: &Path) -> Result<(), Error> {
    let generator = generator(terrain_config(config, size), seed);
    let mut world = World::new();
    let report = generator.generate(&mut world)?;
    let saved = persist::save(&world, out)?;

    println!("Seed {}: {} blocks, {} trees, {} water columns", report.seed, saved, report.trees, report.water_columns);
    for (block, count) in world.counts() {
        println!("  {:<6} {count}", block.label());
    }
    println!("Saved to {}", out.display());
    Ok(())
}

/// Feed each key as a press, one frame of movement, then a release
fn replay_keys(engine: &mut Engine, keys: &str) {
    for key in keys.chars().map(String::from) {
        if engine.handle_event(InputEvent::KeyDown(key.clone())) == Flow::Exit {
            return;
        }
        engine.update();
        engine.handle_event(InputEvent::KeyUp(key));
    }
}

fn run_stress(settings: config::StressConfig) -> Result<(), Error> {
    let plan = settings.plan().normalized();
    let mut telemetry = SystemTelemetry::new();
    let session = StressSession::start(&plan, telemetry.total_memory(), None)?;

    let bar = ProgressBar::new(plan.duration.as_secs());
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}s {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    while !session.is_complete() {
        thread::sleep(Duration::from_millis(500));
        let progress = session.progress();
        bar.set_position(progress.elapsed.as_secs().min(plan.duration.as_secs()));
        bar.set_message(telemetry.sample().to_string());
    }

    let report = session.stop(STOP_TIMEOUT);
    bar.finish_with_message("Test complete");
    if !report.detached.is_empty() {
        warn!(workers = ?report.detached, "some workers were still running at exit");
    }
    println!("Stopped {} workers, {} detached", report.joined.len(), report.detached.len());
    Ok(())
}

fn run_clock(ticks: u32, interval: Duration, dark: bool) {
    let mut state = ClockState::new(Instant::now());
    if dark {
        state.toggle_theme();
    }
    for _ in 0..ticks {
        let reading = ClockReading::now();
        let colors = palette(state.theme(), reading.hour);
        println!(
            "{}  {}  UTC{}  unix {}  [{} on {}]",
            reading.time,
            reading.date_full,
            reading.utc_offset,
            reading.unix_text(),
            colors.fg,
            colors.bg
        );
        state.tick(Instant::now());
        thread::sleep(interval);
    }
    let theme = if state.theme() == Theme::Dark { "dark" } else { "light" };
    println!("{} ({theme} theme)", state.status_line(&ClockReading::now()));
}

fn show_playlist(files: &[PathBuf], volume: u8) {
    let mut playlist = Playlist::new();
    let added = playlist.add(files);
    if added < files.len() {
        println!("Skipped {} unsupported files", files.len() - added);
    }

    let mut player = Player::new(playlist);
    player.set_volume(volume);
    if !player.toggle(Instant::now()) {
        println!("No track selected");
        return;
    }

    let current = player.playlist.current_index();
    for (i, track) in player.playlist.tracks().iter().enumerate() {
        let marker = if Some(i) == current { ">" } else { " " };
        println!("{marker} {:>3}. {}", i + 1, track.title);
    }
    if let Some(track) = player.playlist.current() {
        println!("Now playing: {} ({}, volume {})", track.title, player::format_time(player.elapsed(Instant::now())), player.volume());
    }
}
