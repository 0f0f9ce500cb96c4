// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "rgbd-mesh")]
#[command(about = "Reconstruct per-frame meshes from RGB-D sequences")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one COFF mesh per selected frame of a TUM RGB-D dataset
    Reconstruct {
        /// Dataset directory (contains depth.txt, rgb.txt, groundtruth.txt)
        dataset: PathBuf,

        /// Output directory (default: current directory or config value)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (default: <config dir>/rgbd-mesh/config.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Process every n-th frame
        #[arg(short, long)]
        every: Option<usize>,

        /// Stop after this many frames
        #[arg(short, long)]
        max_frames: Option<usize>,

        /// Maximum triangle edge length in meters
        #[arg(long)]
        edge_threshold: Option<f32>,

        /// Pair the column axis with fx (conventional pinhole) instead of the row axis
        #[arg(long)]
        pinhole_axes: bool,
    },

    /// Show dataset size, resolution, and calibration
    Inspect {
        /// Dataset directory
        dataset: PathBuf,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=rgbd_mesh=debug, RUST_LOG=warn
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reconstruct {
            dataset,
            output,
            config,
            every,
            max_frames,
            edge_threshold,
            pinhole_axes,
        } => cli::reconstruct(
            dataset,
            config,
            cli::Overrides {
                output,
                every,
                max_frames,
                edge_threshold,
                pinhole_axes,
            },
        ),
        Commands::Inspect { dataset, config } => cli::inspect(dataset, config),
    }
}
