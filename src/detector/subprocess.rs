//! Subprocess-backed hand landmark detector.
//!
//! Runs an external landmarker process (typically a small MediaPipe script)
//! and streams frames to it over stdin. Protocol, per frame:
//!
//! - request: three little-endian u32 values (width, height, channels)
//!   followed by the raw RGB pixel data;
//! - response: a single JSON line
//!   `{"hands": [{"handedness": "Left", "score": 0.98, "landmarks": [{"x": ..., "y": ..., "z": ...}, ...]}]}`.
//!
//! On startup the process must print a single `READY` line once its model
//! is loaded, so slow model initialization doesn't eat the first frame.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use log::{debug, info, warn};
use serde::Deserialize;

use super::{
    Detection, DetectorError, Hand, HandDetector, Landmark, LANDMARKS_PER_HAND,
};
use crate::camera::Frame;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Hand detector running as an external subprocess.
pub struct SubprocessDetector {
    process: Child,
    stdout_reader: BufReader<std::process::ChildStdout>,
    command: String,
    /// Hands below this score are dropped
    min_score: f32,
}

impl SubprocessDetector {
    /// Spawn the detector process and wait for its `READY` handshake.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self, DetectorError> {
        info!("starting hand landmark detector: {}", command);

        let mut process = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| DetectorError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = process.stdout.take().ok_or_else(|| {
            DetectorError::Protocol("detector process has no stdout pipe".to_string())
        })?;
        let mut stdout_reader = BufReader::new(stdout);

        let mut ready_line = String::new();
        stdout_reader.read_line(&mut ready_line)?;
        if ready_line.trim() != "READY" {
            return Err(DetectorError::Protocol(format!(
                "detector did not signal ready, got: {:?}",
                ready_line.trim()
            )));
        }

        info!("hand landmark detector ready");

        Ok(Self {
            process,
            stdout_reader,
            command: command.to_string(),
            min_score: 0.5,
        })
    }

    /// Set the confidence threshold below which hands are dropped.
    pub fn set_min_score(&mut self, min_score: f32) {
        self.min_score = min_score.clamp(0.0, 1.0);
    }

    fn parse_response(&self, line: &str) -> Result<Detection, DetectorError> {
        let result: DetectionJson =
            serde_json::from_str(line).map_err(|source| DetectorError::Parse {
                line: line.to_string(),
                source,
            })?;

        if let Some(error) = result.error {
            warn!("detector error: {}", error);
            return Ok(Detection::empty());
        }

        let mut hands = Vec::with_capacity(result.hands.len());
        for hand in result.hands {
            if hand.score < self.min_score {
                debug!(
                    "dropping {} hand below score threshold ({:.2} < {:.2})",
                    hand.handedness, hand.score, self.min_score
                );
                continue;
            }
            if hand.landmarks.len() != LANDMARKS_PER_HAND {
                return Err(DetectorError::BadLandmarkCount(hand.landmarks.len()));
            }

            let mut landmarks = [Landmark::default(); LANDMARKS_PER_HAND];
            for (i, lm) in hand.landmarks.iter().enumerate() {
                landmarks[i] = Landmark {
                    x: lm.x,
                    y: lm.y,
                    z: lm.z,
                };
            }

            hands.push(Hand {
                landmarks,
                handedness: hand.handedness.parse()?,
                score: hand.score,
            });
        }

        Detection::new(hands)
    }
}

impl HandDetector for SubprocessDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Detection, DetectorError> {
        let stdin = self.process.stdin.as_mut().ok_or_else(|| {
            DetectorError::Protocol("detector process has no stdin pipe".to_string())
        })?;

        // Header: width, height, channels, then raw RGB data
        stdin.write_all(&frame.width.to_le_bytes())?;
        stdin.write_all(&frame.height.to_le_bytes())?;
        stdin.write_all(&(Frame::BYTES_PER_PIXEL as u32).to_le_bytes())?;
        stdin.write_all(&frame.data)?;
        stdin.flush()?;

        let mut response = String::new();
        let n = self.stdout_reader.read_line(&mut response)?;
        if n == 0 {
            return Err(DetectorError::Protocol(format!(
                "detector process '{}' closed its stdout",
                self.command
            )));
        }

        self.parse_response(&response)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        // Closing stdin tells a well-behaved detector to exit; kill covers the rest.
        drop(self.process.stdin.take());
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // parse_response needs a SubprocessDetector, which needs a process; use a
    // trivial long-lived child so the parsing logic is testable on its own.
    fn detector_for_parsing() -> SubprocessDetector {
        let mut process = Command::new("sleep")
            .arg("5")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let stdout = process.stdout.take().unwrap();
        SubprocessDetector {
            stdout_reader: BufReader::new(stdout),
            process,
            command: "sleep".to_string(),
            min_score: 0.5,
        }
    }

    fn hand_json(handedness: &str, score: f32) -> String {
        let landmarks: Vec<String> = (0..21)
            .map(|i| format!("{{\"x\": 0.{}, \"y\": 0.5, \"z\": 0.0}}", i % 10))
            .collect();
        format!(
            "{{\"handedness\": \"{}\", \"score\": {}, \"landmarks\": [{}]}}",
            handedness,
            score,
            landmarks.join(",")
        )
    }

    #[test]
    fn test_parse_response_one_hand() {
        let det = detector_for_parsing();
        let line = format!("{{\"hands\": [{}]}}", hand_json("Right", 0.9));
        let detection = det.parse_response(&line).unwrap();
        assert_eq!(detection.hands().len(), 1);
        assert_eq!(
            detection.hands()[0].handedness,
            crate::detector::Handedness::Right
        );
    }

    #[test]
    fn test_parse_response_drops_low_score() {
        let det = detector_for_parsing();
        let line = format!(
            "{{\"hands\": [{}, {}]}}",
            hand_json("Right", 0.9),
            hand_json("Left", 0.1)
        );
        let detection = det.parse_response(&line).unwrap();
        assert_eq!(detection.hands().len(), 1);
    }

    #[test]
    fn test_parse_response_error_field_is_empty_detection() {
        let det = detector_for_parsing();
        let detection = det
            .parse_response("{\"hands\": [], \"error\": \"no frame\"}")
            .unwrap();
        assert!(!detection.has_hands());
    }

    #[test]
    fn test_parse_response_rejects_bad_handedness() {
        let det = detector_for_parsing();
        let line = format!("{{\"hands\": [{}]}}", hand_json("Both", 0.9));
        assert!(matches!(
            det.parse_response(&line),
            Err(DetectorError::UnknownHandedness(_))
        ));
    }

    #[test]
    fn test_parse_response_rejects_bad_json() {
        let det = detector_for_parsing();
        assert!(matches!(
            det.parse_response("not json"),
            Err(DetectorError::Parse { .. })
        ));
    }
}
