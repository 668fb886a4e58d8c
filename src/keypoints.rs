//! Keypoint extraction: flattening a per-frame detection into the
//! fixed-length vector the dataset stores.
//!
//! Every persisted frame is a 126-value vector: 2 hands x 21 landmarks x
//! (x, y, z). When only one hand is present the missing hand's slots are
//! zero-filled, and handedness decides which half is real: the right-hand
//! half comes first, the left-hand half second.

use ndarray::Array1;

use crate::detector::{Detection, Handedness, LANDMARKS_PER_HAND};

/// Coordinates stored per landmark (x, y, z).
pub const COORDS_PER_LANDMARK: usize = 3;

/// Values contributed by one hand: 21 landmarks x 3 coords.
pub const KEYPOINTS_PER_HAND: usize = LANDMARKS_PER_HAND * COORDS_PER_LANDMARK;

/// Full per-frame vector length: two hands' worth of values.
pub const KEYPOINT_LEN: usize = 2 * KEYPOINTS_PER_HAND;

/// Flatten a detection into a fixed-length keypoint vector.
///
/// Returns `None` when no hand was detected; the caller decides what an
/// absent frame means. When `Some`, the vector length is always
/// [`KEYPOINT_LEN`]:
///
/// - two hands: both hands' values concatenated in detection order;
/// - one `Right` hand: its 63 values, then 63 zeros;
/// - one `Left` hand: 63 zeros, then its 63 values.
pub fn extract_keypoints(detection: &Detection) -> Option<Array1<f32>> {
    let hands = detection.hands();
    if hands.is_empty() {
        return None;
    }

    let mut values = Vec::with_capacity(KEYPOINT_LEN);
    for hand in hands {
        for lm in &hand.landmarks {
            values.push(lm.x);
            values.push(lm.y);
            values.push(lm.z);
        }
    }

    if hands.len() == 1 {
        match hands[0].handedness {
            Handedness::Right => values.resize(KEYPOINT_LEN, 0.0),
            Handedness::Left => {
                let mut padded = vec![0.0; KEYPOINTS_PER_HAND];
                padded.append(&mut values);
                values = padded;
            }
        }
    }

    debug_assert_eq!(values.len(), KEYPOINT_LEN);
    Some(Array1::from(values))
}

/// The all-zero vector stored for frames where detection found nothing,
/// keeping recorded sequences dense.
pub fn zero_keypoints() -> Array1<f32> {
    Array1::zeros(KEYPOINT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Hand, Landmark};

    /// A hand whose landmark coordinates are all distinct, so slot order
    /// is observable in the flattened output.
    fn numbered_hand(handedness: Handedness, base: f32) -> Hand {
        let mut landmarks = [Landmark::default(); LANDMARKS_PER_HAND];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            lm.x = base + i as f32;
            lm.y = base + i as f32 + 0.25;
            lm.z = base + i as f32 + 0.5;
        }
        Hand {
            landmarks,
            handedness,
            score: 0.99,
        }
    }

    #[test]
    fn test_no_hands_is_none() {
        assert!(extract_keypoints(&Detection::empty()).is_none());
    }

    #[test]
    fn test_single_hand_vector_length_is_126() {
        for handedness in [Handedness::Left, Handedness::Right] {
            let detection = Detection::new(vec![numbered_hand(handedness, 1.0)]).unwrap();
            let keypoints = extract_keypoints(&detection).unwrap();
            assert_eq!(keypoints.len(), KEYPOINT_LEN);
        }
    }

    #[test]
    fn test_right_hand_fills_first_half() {
        let detection = Detection::new(vec![numbered_hand(Handedness::Right, 1.0)]).unwrap();
        let keypoints = extract_keypoints(&detection).unwrap();

        // Real values occupy slots 0..63, zeros fill 63..126
        assert_eq!(keypoints[0], 1.0);
        assert_eq!(keypoints[1], 1.25);
        assert_eq!(keypoints[2], 1.5);
        assert!(keypoints
            .iter()
            .take(KEYPOINTS_PER_HAND)
            .all(|&v| v != 0.0));
        assert!(keypoints
            .iter()
            .skip(KEYPOINTS_PER_HAND)
            .all(|&v| v == 0.0));
    }

    #[test]
    fn test_left_hand_fills_second_half() {
        let detection = Detection::new(vec![numbered_hand(Handedness::Left, 1.0)]).unwrap();
        let keypoints = extract_keypoints(&detection).unwrap();

        // Zeros occupy slots 0..63, real values fill 63..126
        assert!(keypoints
            .iter()
            .take(KEYPOINTS_PER_HAND)
            .all(|&v| v == 0.0));
        assert_eq!(keypoints[KEYPOINTS_PER_HAND], 1.0);
        assert!(keypoints
            .iter()
            .skip(KEYPOINTS_PER_HAND)
            .all(|&v| v != 0.0));
    }

    #[test]
    fn test_two_hands_no_padding() {
        let detection = Detection::new(vec![
            numbered_hand(Handedness::Right, 1.0),
            numbered_hand(Handedness::Left, 100.0),
        ])
        .unwrap();
        let keypoints = extract_keypoints(&detection).unwrap();

        assert_eq!(keypoints.len(), KEYPOINT_LEN);
        assert!(keypoints.iter().all(|&v| v != 0.0));
        // Detection order preserved: first hand's wrist first
        assert_eq!(keypoints[0], 1.0);
        assert_eq!(keypoints[KEYPOINTS_PER_HAND], 100.0);
    }

    #[test]
    fn test_landmark_index_order_preserved() {
        let detection = Detection::new(vec![numbered_hand(Handedness::Right, 0.0)]).unwrap();
        let keypoints = extract_keypoints(&detection).unwrap();

        // Landmark i lands at slots [3i, 3i+1, 3i+2]
        for i in 0..LANDMARKS_PER_HAND {
            assert_eq!(keypoints[i * COORDS_PER_LANDMARK], i as f32);
            assert_eq!(keypoints[i * COORDS_PER_LANDMARK + 1], i as f32 + 0.25);
            assert_eq!(keypoints[i * COORDS_PER_LANDMARK + 2], i as f32 + 0.5);
        }
    }

    #[test]
    fn test_zero_keypoints_shape() {
        let zeros = zero_keypoints();
        assert_eq!(zeros.len(), KEYPOINT_LEN);
        assert!(zeros.iter().all(|&v| v == 0.0));
    }
}
