use std::path::PathBuf;

use clap::{Parser, Subcommand};

use deskbench::stress::TestKind;

#[derive(Parser, Debug)]
#[command(name = "deskbench", version)]
#[command(about = "Voxel world, load generator, clock and playlist utilities", long_about = None)]
pub struct Cli {
    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, save and render voxel worlds
    World {
        #[command(subcommand)]
        action: WorldCommand,
    },
    /// Load CPU and RAM for a fixed duration
    Stress {
        /// Target CPU load in percent (10-100)
        #[arg(long)]
        cpu: Option<u8>,
        /// Share of total RAM to allocate in percent (10-90)
        #[arg(long)]
        ram: Option<u8>,
        /// Test length in seconds, at least 10
        #[arg(long)]
        duration: Option<u64>,
        #[arg(long, value_enum)]
        kind: Option<TestKind>,
        /// Number of CPU load threads
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Print host CPU, RAM and sensor readings
    Telemetry {
        #[arg(long, default_value_t = 5)]
        samples: u32,
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Print millisecond clock readings
    Clock {
        #[arg(long, default_value_t = 10)]
        ticks: u32,
        #[arg(long, default_value_t = 10)]
        interval_ms: u64,
        /// Use the dark palette
        #[arg(long)]
        dark: bool,
    },
    /// Build a playlist from files and show it
    Playlist {
        files: Vec<PathBuf>,
        /// Playback volume 0-100
        #[arg(long, default_value_t = 50)]
        volume: u8,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorldCommand {
    /// Generate a world and save it as JSON
    Generate {
        /// Columns along x and z
        #[arg(long)]
        size: Option<i32>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "world.json")]
        out: PathBuf,
    },
    /// Render one frame of a world to PNG
    Render {
        /// World JSON to render instead of generating one
        #[arg(long)]
        load: Option<PathBuf>,
        #[arg(long)]
        size: Option<i32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Camera position
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        pos: Option<Vec<f32>>,
        /// Camera yaw in degrees
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        yaw: f32,
        /// Camera pitch in degrees
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pitch: f32,
        /// Apply yaw and pitch in the projection
        #[arg(long)]
        rotate: bool,
        /// Keys replayed one frame each before rendering, e.g. "wwd p"
        #[arg(long)]
        keys: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(short, long, default_value = "frame.png")]
        out: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_position() {
        let cli = Cli::parse_from([
            "deskbench", "world", "render", "--pos", "1", "-2.5", "3", "--rotate", "--out", "f.png",
        ]);
        match cli.command {
            Commands::World { action: WorldCommand::Render { pos, rotate, out, .. } } => {
                assert_eq!(pos, Some(vec![1.0, -2.5, 3.0]));
                assert!(rotate);
                assert_eq!(out, PathBuf::from("f.png"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_stress_kind_and_global_config() {
        let cli = Cli::parse_from(["deskbench", "stress", "--kind", "ram-only", "--config", "c.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert!(matches!(cli.command, Commands::Stress { kind: Some(TestKind::RamOnly), .. }));
    }
}
