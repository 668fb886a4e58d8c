//! The interactive capture session: webcam frames in, labeled keypoint
//! sequences on disk out.
//!
//! The session blocks on a polling loop. Pressing the trigger key records
//! one sequence: a fixed number of consecutive frames, each run through
//! the detector, flattened to a keypoint vector, and persisted as
//! `<frame>.npy` (plus a `<frame>.jpg` dump when enabled). The session
//! ends on the quit key, Ctrl+C, or when the camera stream dies.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::camera::{CameraCapture, Frame};
use crate::dataset::{save_keypoints, DatasetError, DatasetLayout};
use crate::detector::{Detection, DetectorError, HandDetector};
use crate::hotkeys::KeyListener;
use crate::keypoints::{extract_keypoints, zero_keypoints};
use crate::overlay::draw_landmarks;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl+C handler that ends a running session.
pub fn setup_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        INTERRUPTED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, finishing up...");
    })
}

/// Check whether Ctrl+C was received.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Options for one capture session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Action label being recorded
    pub action: String,
    /// Sequence index the first trigger press records into
    pub start_sequence: usize,
    /// Frames captured per sequence
    pub sequence_length: usize,
    /// Also dump each frame as a .jpg next to its .npy
    pub save_frames: bool,
    /// Delay between frame grabs inside a burst, roughly matching the
    /// camera frame interval
    pub frame_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            action: String::new(),
            start_sequence: 0,
            sequence_length: 20,
            save_frames: true,
            frame_interval: Duration::from_millis(33),
        }
    }
}

/// What a finished session did.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Sequences fully recorded
    pub sequences_recorded: usize,
    /// Index the next recording session should start at
    pub next_sequence: usize,
}

/// Errors that end a capture session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("failed to write frame image '{path}': {source}")]
    WriteImage {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("camera stream ended mid-sequence (frame {frame} of {expected})")]
    StreamEnded { frame: usize, expected: usize },
}

/// Record one sequence: `sequence_length` consecutive frames pulled from
/// `next_frame`, run through the detector and persisted.
///
/// Frames where the detector finds no hand are stored as all-zero vectors
/// so the sequence stays dense. `next_frame` returning `None` means the
/// stream died; that aborts the sequence with `SessionError::StreamEnded`.
pub fn record_sequence<D, F>(
    detector: &mut D,
    mut next_frame: F,
    layout: &DatasetLayout,
    options: &SessionOptions,
    sequence: usize,
) -> Result<(), SessionError>
where
    D: HandDetector,
    F: FnMut() -> Option<Frame>,
{
    let dir = layout.sequence_dir(&options.action, sequence);
    std::fs::create_dir_all(&dir).map_err(|source| DatasetError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    for frame_num in 0..options.sequence_length {
        let frame = next_frame().ok_or(SessionError::StreamEnded {
            frame: frame_num,
            expected: options.sequence_length,
        })?;

        let detection = detector.detect(&frame)?;
        let keypoints = match extract_keypoints(&detection) {
            Some(keypoints) => keypoints,
            None => {
                debug!(
                    "no hands in {}/{}/{}, storing zero vector",
                    options.action, sequence, frame_num
                );
                zero_keypoints()
            }
        };

        let npy_path = layout.keypoints_path(&options.action, sequence, frame_num);
        save_keypoints(&npy_path, &keypoints)?;

        if options.save_frames {
            save_frame_image(layout, options, sequence, frame_num, &frame, &detection)?;
        }
    }

    info!(
        "recorded sequence {} of action '{}' ({} frames)",
        sequence, options.action, options.sequence_length
    );
    Ok(())
}

/// Dump one frame as .jpg with the detected landmarks drawn on it.
fn save_frame_image(
    layout: &DatasetLayout,
    options: &SessionOptions,
    sequence: usize,
    frame_num: usize,
    frame: &Frame,
    detection: &Detection,
) -> Result<(), SessionError> {
    let path = layout.frame_image_path(&options.action, sequence, frame_num);

    let mut annotated = frame.clone();
    draw_landmarks(&mut annotated, detection, [0, 255, 0]);

    let img = image::RgbImage::from_raw(annotated.width, annotated.height, annotated.data)
        .ok_or_else(|| SessionError::WriteImage {
            path: path.clone(),
            source: image::ImageError::Limits(image::error::LimitError::from_kind(
                image::error::LimitErrorKind::DimensionError,
            )),
        })?;
    img.save(&path)
        .map_err(|source| SessionError::WriteImage { path, source })
}

/// Run the interactive capture session until the quit key, Ctrl+C, or the
/// end of the camera stream.
pub fn run<D: HandDetector>(
    camera: &mut CameraCapture,
    detector: &mut D,
    keys: &KeyListener,
    layout: &DatasetLayout,
    options: &SessionOptions,
) -> Result<SessionOutcome, SessionError> {
    let mut sequence = options.start_sequence;
    let mut recorded = 0;

    info!(
        "capture session for action '{}' starting at sequence {}",
        options.action, sequence
    );

    loop {
        if interrupted() || keys.quit_requested() {
            break;
        }

        // The capture thread dying means the stream is gone; there is no
        // retry story for a webcam that went away.
        if !camera.is_running() {
            warn!("camera stream ended, stopping session");
            break;
        }

        if keys.take_trigger() {
            let interval = options.frame_interval;
            record_sequence(
                detector,
                || {
                    thread::sleep(interval);
                    camera.latest_frame()
                },
                layout,
                options,
                sequence,
            )?;
            sequence += 1;
            recorded += 1;
        }

        thread::sleep(Duration::from_millis(10));
    }

    Ok(SessionOutcome {
        sequences_recorded: recorded,
        next_sequence: sequence,
    })
}
