//! Dataset persistence and assembly.
//!
//! Recorded sequences live under a per-action, per-sequence, per-frame
//! directory tree; one `.npy` keypoint vector (and optionally a `.jpg`
//! frame dump) per frame. This module owns the tree layout, the `.npy`
//! store, and the assembly of persisted frames into training windows.

mod assemble;
mod layout;
mod store;

pub use assemble::{assemble, AssembledDataset, LabelMap};
pub use layout::{prepare_folders, DatasetLayout, DEFAULT_DATA_ROOT};
pub use store::{load_keypoints, save_keypoints};

use std::path::PathBuf;

/// Errors that can occur while persisting or assembling dataset files.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write keypoints to '{path}': {source}")]
    Write {
        path: PathBuf,
        source: ndarray_npy::WriteNpyError,
    },
    #[error("failed to read keypoints from '{path}': {source}")]
    Read {
        path: PathBuf,
        source: ndarray_npy::ReadNpyError,
    },
    #[error("keypoint vector in '{path}' has length {found}, expected {expected}")]
    BadVectorLength {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("action '{0}' is not in the label map")]
    UnknownAction(String),
}
