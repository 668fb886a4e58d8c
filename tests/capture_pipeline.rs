//! End-to-end test of the capture pipeline without camera hardware:
//! scripted detections go through keypoint extraction, sequence
//! recording, and dataset assembly.

use std::time::Duration;

use gesture_recorder::camera::Frame;
use gesture_recorder::dataset::{assemble, DatasetLayout, LabelMap};
use gesture_recorder::detector::{
    Detection, DetectorError, Hand, HandDetector, Handedness, Landmark, LANDMARKS_PER_HAND,
};
use gesture_recorder::keypoints::{KEYPOINTS_PER_HAND, KEYPOINT_LEN};
use gesture_recorder::session::{record_sequence, SessionOptions};

/// Replays a fixed cycle of detections.
struct CyclingDetector {
    cycle: Vec<Detection>,
    calls: usize,
}

impl HandDetector for CyclingDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Detection, DetectorError> {
        let detection = self.cycle[self.calls % self.cycle.len()].clone();
        self.calls += 1;
        Ok(detection)
    }
}

fn hand(handedness: Handedness, x: f32) -> Hand {
    let mut landmarks = [Landmark::default(); LANDMARKS_PER_HAND];
    for lm in landmarks.iter_mut() {
        lm.x = x;
        lm.y = 0.5;
        lm.z = -0.01;
    }
    Hand {
        landmarks,
        handedness,
        score: 0.95,
    }
}

fn frame() -> Frame {
    Frame {
        data: vec![128; 8 * 8 * 3],
        width: 8,
        height: 8,
    }
}

fn options(action: &str, frames: usize) -> SessionOptions {
    SessionOptions {
        action: action.to_string(),
        start_sequence: 0,
        sequence_length: frames,
        save_frames: false,
        frame_interval: Duration::ZERO,
    }
}

#[test]
fn test_recorded_sequences_assemble_into_windows() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path());
    let actions = vec!["wave".to_string(), "fist".to_string()];

    // Right hand only for 'wave', two hands for 'fist'
    let mut wave_detector = CyclingDetector {
        cycle: vec![Detection::new(vec![hand(Handedness::Right, 0.3)]).unwrap()],
        calls: 0,
    };
    let mut fist_detector = CyclingDetector {
        cycle: vec![Detection::new(vec![
            hand(Handedness::Right, 0.3),
            hand(Handedness::Left, 0.7),
        ])
        .unwrap()],
        calls: 0,
    };

    for sequence in 0..2 {
        record_sequence(
            &mut wave_detector,
            || Some(frame()),
            &layout,
            &options("wave", 4),
            sequence,
        )
        .unwrap();
        record_sequence(
            &mut fist_detector,
            || Some(frame()),
            &layout,
            &options("fist", 4),
            sequence,
        )
        .unwrap();
    }

    let label_map = LabelMap::from_actions(&actions);
    let dataset = assemble(&layout, &label_map, 2, 4).unwrap();

    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.labels, vec![0, 0, 1, 1]);

    // 'wave' windows: right-hand half populated, left-hand half zero-padded
    let wave_window = &dataset.windows[0];
    for frame_row in wave_window.rows() {
        assert!(frame_row
            .iter()
            .take(KEYPOINTS_PER_HAND)
            .any(|&v| v != 0.0));
        assert!(frame_row
            .iter()
            .skip(KEYPOINTS_PER_HAND)
            .all(|&v| v == 0.0));
    }

    // 'fist' windows: both halves populated, full 126 values
    let fist_window = &dataset.windows[2];
    for frame_row in fist_window.rows() {
        assert_eq!(frame_row.len(), KEYPOINT_LEN);
        assert!(frame_row.iter().all(|&v| v != 0.0));
    }
}

#[test]
fn test_hands_lost_mid_sequence_store_zero_frames() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path());

    // Detection succeeds, then the hand leaves the frame
    let mut detector = CyclingDetector {
        cycle: vec![
            Detection::new(vec![hand(Handedness::Left, 0.4)]).unwrap(),
            Detection::empty(),
        ],
        calls: 0,
    };

    record_sequence(
        &mut detector,
        || Some(frame()),
        &layout,
        &options("wave", 4),
        0,
    )
    .unwrap();

    let label_map = LabelMap::from_actions(&["wave".to_string()]);
    let dataset = assemble(&layout, &label_map, 1, 4).unwrap();
    let window = &dataset.windows[0];

    // Odd frames (empty detections) are dense zero rows, even frames have data
    assert!(window.row(0).iter().any(|&v| v != 0.0));
    assert!(window.row(1).iter().all(|&v| v == 0.0));
    assert!(window.row(2).iter().any(|&v| v != 0.0));
    assert!(window.row(3).iter().all(|&v| v == 0.0));
}

#[test]
fn test_frame_dumps_written_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path());

    let mut detector = CyclingDetector {
        cycle: vec![Detection::empty()],
        calls: 0,
    };
    let mut opts = options("wave", 2);
    opts.save_frames = true;

    record_sequence(&mut detector, || Some(frame()), &layout, &opts, 0).unwrap();

    for frame_num in 0..2 {
        let jpg = layout.frame_image_path("wave", 0, frame_num);
        assert!(jpg.exists(), "missing frame dump {}", jpg.display());
        // The dump must be a decodable image of the captured size
        let img = image::open(&jpg).unwrap();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 8);
    }
}
