//! Per-frame keypoint vector persistence (`.npy`).

use std::path::Path;

use ndarray::Array1;
use ndarray_npy::{read_npy, write_npy};

use super::DatasetError;
use crate::keypoints::KEYPOINT_LEN;

/// Write one frame's keypoint vector.
pub fn save_keypoints(path: &Path, keypoints: &Array1<f32>) -> Result<(), DatasetError> {
    write_npy(path, keypoints).map_err(|source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one frame's keypoint vector, checking its length.
pub fn load_keypoints(path: &Path) -> Result<Array1<f32>, DatasetError> {
    let keypoints: Array1<f32> = read_npy(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if keypoints.len() != KEYPOINT_LEN {
        return Err(DatasetError::BadVectorLength {
            path: path.to_path_buf(),
            expected: KEYPOINT_LEN,
            found: keypoints.len(),
        });
    }

    Ok(keypoints)
}
