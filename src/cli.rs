//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Webcam data collection for hand-gesture recognition
#[derive(Parser, Debug)]
#[command(name = "gesture-recorder")]
#[command(version, about = "Collect and assemble hand-keypoint training data", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset root directory (overrides config)
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Create the per-action, per-sequence folder tree
    Prepare {
        /// Actions to prepare folders for (comma separated; default from config)
        #[arg(long, value_delimiter = ',')]
        actions: Vec<String>,
        /// Sequences per action
        #[arg(long)]
        sequences: Option<usize>,
    },
    /// Record keypoint sequences for one action from the webcam
    Record {
        /// Action label being recorded
        #[arg(long)]
        action: String,
        /// Sequence index the first trigger press records into
        #[arg(long, default_value = "0")]
        sequence: usize,
        /// Frames per sequence
        #[arg(long)]
        frames: Option<usize>,
        /// Camera device index (from list-cameras)
        #[arg(long)]
        camera: Option<u32>,
        /// Mirror camera horizontally
        #[arg(long)]
        mirror: bool,
        /// Skip the per-frame .jpg dumps
        #[arg(long)]
        no_save_frames: bool,
        /// Key that records one sequence
        #[arg(long)]
        trigger_key: Option<String>,
        /// Key that ends the session
        #[arg(long)]
        quit_key: Option<String>,
        /// Hand landmark detector command (overrides config)
        #[arg(long)]
        detector: Option<String>,
    },
    /// Assemble recorded sequences into training windows and print a summary
    Assemble {
        /// Actions to assemble (comma separated; default from config)
        #[arg(long, value_delimiter = ',')]
        actions: Vec<String>,
        /// Sequences per action
        #[arg(long)]
        sequences: Option<usize>,
        /// Frames per sequence
        #[arg(long)]
        frames: Option<usize>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
