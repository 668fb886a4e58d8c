//! Assembly of persisted sequences into in-memory training windows.

use ndarray::Array2;

use log::info;

use super::layout::DatasetLayout;
use super::store::load_keypoints;
use super::DatasetError;
use crate::keypoints::KEYPOINT_LEN;

/// Fixed action-name to label-index mapping, in the order the actions
/// were supplied.
#[derive(Debug, Clone)]
pub struct LabelMap {
    actions: Vec<String>,
}

impl LabelMap {
    pub fn from_actions(actions: &[String]) -> Self {
        Self {
            actions: actions.to_vec(),
        }
    }

    /// Label index of an action name, if the action is known.
    pub fn index_of(&self, action: &str) -> Option<usize> {
        self.actions.iter().position(|a| a == action)
    }

    /// Action names in label-index order.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Assembled training data: one window and one label per
/// (action, sequence) pair, in deterministic iteration order.
#[derive(Debug)]
pub struct AssembledDataset {
    /// One `(sequence_length, 126)` array per recorded sequence
    pub windows: Vec<Array2<f32>>,
    /// Label index of each window, parallel to `windows`
    pub labels: Vec<usize>,
}

impl AssembledDataset {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Walk the dataset tree and build training windows.
///
/// Iterates actions, then sequences `0..no_sequences`, then frames
/// `0..sequence_length`, loading one persisted vector per frame and
/// stacking them in frame order. No shuffling, filtering, or validation
/// beyond vector length; missing files surface as read errors naming the
/// offending path.
pub fn assemble(
    layout: &DatasetLayout,
    label_map: &LabelMap,
    no_sequences: usize,
    sequence_length: usize,
) -> Result<AssembledDataset, DatasetError> {
    let mut windows = Vec::with_capacity(label_map.len() * no_sequences);
    let mut labels = Vec::with_capacity(label_map.len() * no_sequences);

    for action in label_map.actions() {
        let label = label_map
            .index_of(action)
            .ok_or_else(|| DatasetError::UnknownAction(action.clone()))?;

        for sequence in 0..no_sequences {
            let mut window = Array2::zeros((sequence_length, KEYPOINT_LEN));
            for frame in 0..sequence_length {
                let path = layout.keypoints_path(action, sequence, frame);
                let keypoints = load_keypoints(&path)?;
                window.row_mut(frame).assign(&keypoints);
            }
            windows.push(window);
            labels.push(label);
        }
    }

    info!(
        "assembled {} windows ({} actions x {} sequences, {} frames each)",
        windows.len(),
        label_map.len(),
        no_sequences,
        sequence_length
    );

    Ok(AssembledDataset { windows, labels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_map_order() {
        let map = LabelMap::from_actions(&["hello".to_string(), "thanks".to_string()]);
        assert_eq!(map.index_of("hello"), Some(0));
        assert_eq!(map.index_of("thanks"), Some(1));
        assert_eq!(map.index_of("other"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_assemble_missing_frame_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path());
        let map = LabelMap::from_actions(&["wave".to_string()]);

        // Nothing persisted: the very first frame read must fail with its path
        let err = assemble(&layout, &map, 1, 3).unwrap_err();
        match err {
            DatasetError::Read { path, .. } => {
                assert!(path.ends_with("wave/0/0.npy"));
            }
            other => panic!("expected Read error, got {:?}", other),
        }
    }
}
