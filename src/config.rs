//! Configuration file handling for gesture-recorder.
//!
//! Loads configuration from `~/.config/gesture-recorder/config.toml` or a
//! custom path. CLI arguments override config values, which override the
//! built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dataset::DEFAULT_DATA_ROOT;

/// Configuration file structure for gesture-recorder.
/// Loaded from ~/.config/gesture-recorder/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
    #[serde(default = "default_true")]
    pub mirror: bool,
}

#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_data_root")]
    pub root: PathBuf,
    /// Gesture classes being collected, in label-index order
    #[serde(default)]
    pub actions: Vec<String>,
    /// Sequences recorded per action
    #[serde(default = "default_sequences")]
    pub sequences: usize,
    /// Frames per sequence
    #[serde(default = "default_frames")]
    pub frames: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: default_data_root(),
            actions: Vec::new(),
            sequences: default_sequences(),
            frames: default_frames(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_trigger_key")]
    pub trigger_key: String,
    #[serde(default = "default_quit_key")]
    pub quit_key: String,
    /// Dump each captured frame as .jpg next to its .npy
    #[serde(default = "default_true")]
    pub save_frames: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            trigger_key: default_trigger_key(),
            quit_key: default_quit_key(),
            save_frames: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct DetectorConfig {
    /// Command that runs the hand landmark detector subprocess
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_ROOT)
}

fn default_sequences() -> usize {
    30
}

fn default_frames() -> usize {
    20
}

fn default_trigger_key() -> String {
    "s".to_string()
}

fn default_quit_key() -> String {
    "q".to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// A commented default config file, for `config init`.
    pub fn default_toml() -> &'static str {
        "\
# gesture-recorder configuration

[camera]
device = 0
mirror = true

[dataset]
root = \"./data/processed_data/MP_Data\"
# actions = [\"hello\", \"thanks\", \"iloveyou\"]
sequences = 30
frames = 20

[capture]
trigger_key = \"s\"
quit_key = \"q\"
save_frames = true

[detector]
# command = \"./detector/run.sh\"
# args = []
"
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "gesture-recorder", "gesture-recorder")
        .map(|d| d.config_dir().to_path_buf().join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/gesture-recorder/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.camera.device, 0);
        assert!(config.camera.mirror);
        assert_eq!(config.dataset.sequences, 30);
        assert_eq!(config.dataset.frames, 20);
        assert_eq!(config.capture.trigger_key, "s");
        assert_eq!(config.capture.quit_key, "q");
        assert!(config.detector.command.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[dataset]\nactions = [\"hello\", \"thanks\"]\nsequences = 5").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.dataset.actions, vec!["hello", "thanks"]);
        assert_eq!(config.dataset.sequences, 5);
        // Unspecified sections keep their defaults
        assert_eq!(config.dataset.frames, 20);
        assert!(config.camera.mirror);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_default_toml_parses() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.dataset.sequences, 30);
        assert_eq!(config.capture.trigger_key, "s");
    }
}
