//! Hand landmark detection data model and detector seam.
//!
//! The landmark estimator itself is an external collaborator. This module
//! defines the per-frame detection result the rest of the crate consumes,
//! plus the [`HandDetector`] trait that any concrete estimator plugs into.
//! A subprocess-backed implementation, [`SubprocessDetector`], is provided.

mod subprocess;

pub use subprocess::SubprocessDetector;

use std::fmt;
use std::str::FromStr;

use crate::camera::Frame;

/// Number of landmarks the estimator reports per hand.
pub const LANDMARKS_PER_HAND: usize = 21;

/// Maximum number of hands in a single detection.
pub const MAX_HANDS: usize = 2;

/// Hand landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single hand landmark with 3D coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    /// X coordinate (0.0 to 1.0, normalized to image width)
    pub x: f32,
    /// Y coordinate (0.0 to 1.0, normalized to image height)
    pub y: f32,
    /// Z coordinate (depth, relative to wrist)
    pub z: f32,
}

/// Handedness classification assigned by the detector to a detected hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "Left"),
            Handedness::Right => write!(f, "Right"),
        }
    }
}

impl FromStr for Handedness {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left" => Ok(Handedness::Left),
            "Right" => Ok(Handedness::Right),
            other => Err(DetectorError::UnknownHandedness(other.to_string())),
        }
    }
}

/// One detected hand: all 21 landmarks plus the detector's classification.
#[derive(Clone, Debug)]
pub struct Hand {
    /// All 21 hand landmarks, in landmark-index order
    pub landmarks: [Landmark; LANDMARKS_PER_HAND],
    /// Handedness label assigned by the detector
    pub handedness: Handedness,
    /// Confidence score (0.0 to 1.0)
    pub score: f32,
}

impl Hand {
    /// All landmarks as pixel coordinates for visualization.
    pub fn landmarks_pixels(&self, image_width: f32, image_height: f32) -> Vec<(f32, f32)> {
        self.landmarks
            .iter()
            .map(|lm| (lm.x * image_width, lm.y * image_height))
            .collect()
    }
}

/// Per-frame detection result: zero, one, or two hands.
#[derive(Clone, Debug, Default)]
pub struct Detection {
    hands: Vec<Hand>,
}

impl Detection {
    /// Build a detection from detected hands, in detection order.
    ///
    /// # Errors
    /// Returns `DetectorError::TooManyHands` if more than two hands are given.
    pub fn new(hands: Vec<Hand>) -> Result<Self, DetectorError> {
        if hands.len() > MAX_HANDS {
            return Err(DetectorError::TooManyHands(hands.len()));
        }
        Ok(Self { hands })
    }

    /// A detection with no hands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Detected hands, in detection order.
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// Whether any hand was detected in this frame.
    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }
}

/// Errors that can occur while running the landmark detector.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("failed to start detector process '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("detector i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("detector protocol violation: {0}")]
    Protocol(String),
    #[error("failed to parse detector response '{line}': {source}")]
    Parse {
        line: String,
        source: serde_json::Error,
    },
    #[error("unknown handedness label '{0}' (expected \"Left\" or \"Right\")")]
    UnknownHandedness(String),
    #[error("detector reported {0} hands, at most 2 are supported")]
    TooManyHands(usize),
    #[error("detector reported {0} landmarks per hand, expected 21")]
    BadLandmarkCount(usize),
}

/// The seam for the external hand-landmark estimator.
///
/// Implementations take a captured frame and return the hands found in it.
/// `detect` takes `&mut self` because real estimators track state across
/// frames (and the subprocess implementation owns pipes).
pub trait HandDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Detection, DetectorError>;
}
