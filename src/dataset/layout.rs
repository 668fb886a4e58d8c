//! Dataset directory tree layout.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::DatasetError;

/// Default dataset root, relative to the working directory.
pub const DEFAULT_DATA_ROOT: &str = "./data/processed_data/MP_Data";

/// Path layout of a recorded dataset:
/// `<root>/<action>/<sequence>/<frame>.npy`, with a sibling
/// `<frame>.jpg` per frame when frame dumps are enabled.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one recorded sequence of an action.
    pub fn sequence_dir(&self, action: &str, sequence: usize) -> PathBuf {
        self.root.join(action).join(sequence.to_string())
    }

    /// Path of one frame's keypoint vector.
    pub fn keypoints_path(&self, action: &str, sequence: usize, frame: usize) -> PathBuf {
        self.sequence_dir(action, sequence)
            .join(format!("{}.npy", frame))
    }

    /// Path of one frame's raw image dump.
    pub fn frame_image_path(&self, action: &str, sequence: usize, frame: usize) -> PathBuf {
        self.sequence_dir(action, sequence)
            .join(format!("{}.jpg", frame))
    }
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_ROOT)
    }
}

/// Create the per-action, per-sequence folder tree.
///
/// Idempotent: directories that already exist are fine. Any other
/// filesystem error (permissions, a file squatting on the path, ...)
/// surfaces instead of being swallowed.
pub fn prepare_folders(
    layout: &DatasetLayout,
    actions: &[String],
    no_sequences: usize,
) -> Result<(), DatasetError> {
    for action in actions {
        for sequence in 0..no_sequences {
            let dir = layout.sequence_dir(action, sequence);
            fs::create_dir_all(&dir).map_err(|source| DatasetError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            debug!("prepared {}", dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = DatasetLayout::new("/tmp/data");
        assert_eq!(
            layout.sequence_dir("hello", 3),
            PathBuf::from("/tmp/data/hello/3")
        );
        assert_eq!(
            layout.keypoints_path("hello", 3, 7),
            PathBuf::from("/tmp/data/hello/3/7.npy")
        );
        assert_eq!(
            layout.frame_image_path("hello", 3, 7),
            PathBuf::from("/tmp/data/hello/3/7.jpg")
        );
    }

    #[test]
    fn test_default_layout_root() {
        let layout = DatasetLayout::default();
        assert_eq!(layout.root(), Path::new(DEFAULT_DATA_ROOT));
    }
}
