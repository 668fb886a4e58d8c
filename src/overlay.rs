//! Drawing on frames: the prediction probability bar chart and the
//! capture-preview landmark markers.
//!
//! Primitives are implemented directly on [`Frame`] pixels; labels use a
//! small built-in 5x7 bitmap font so no font file has to ship with the
//! crate.

use crate::camera::Frame;
use crate::detector::Detection;

/// RGB color triple.
pub type Color = [u8; 3];

/// Bar colors cycled across actions.
pub const DEFAULT_COLORS: [Color; 3] = [[245, 117, 16], [117, 245, 16], [16, 117, 245]];

const WHITE: Color = [255, 255, 255];

// Bar chart geometry: row i spans y = 60+40i .. 90+40i, bar width is
// probability x 100 pixels.
const BAR_TOP: i64 = 60;
const BAR_STEP: i64 = 40;
const BAR_HEIGHT: i64 = 30;
const BAR_SCALE: f32 = 100.0;

/// Errors from overlay rendering.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("probability vector has {probs} entries but there are {actions} actions")]
    LengthMismatch { probs: usize, actions: usize },
}

/// Set a pixel, ignoring out-of-bounds coordinates.
#[inline]
fn set_pixel(frame: &mut Frame, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= frame.width as i64 || y >= frame.height as i64 {
        return;
    }
    let idx = (y as usize * frame.width as usize + x as usize) * Frame::BYTES_PER_PIXEL;
    frame.data[idx..idx + 3].copy_from_slice(&color);
}

/// Draw a filled rectangle, clamped to the frame bounds.
fn fill_rect(frame: &mut Frame, top_left: (i64, i64), bottom_right: (i64, i64), color: Color) {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;
    for y in y0.min(y1)..y0.max(y1) {
        for x in x0.min(x1)..x0.max(x1) {
            set_pixel(frame, x, y, color);
        }
    }
}

/// Draw text using the built-in 5x7 font, top-left anchored.
///
/// Unknown characters render as a hollow box. Lowercase letters use the
/// uppercase glyphs.
fn draw_label(frame: &mut Frame, text: &str, x: i64, y: i64, color: Color, scale: i64) {
    let mut cursor_x = x;
    for ch in text.chars() {
        let glyph = glyph_for(ch);
        for (col, bits) in glyph.iter().enumerate() {
            for row in 0..7 {
                if bits & (1 << row) != 0 {
                    fill_rect(
                        frame,
                        (cursor_x + col as i64 * scale, y + row as i64 * scale),
                        (
                            cursor_x + (col as i64 + 1) * scale,
                            y + (row as i64 + 1) * scale,
                        ),
                        color,
                    );
                }
            }
        }
        // 5 glyph columns plus 1 column of spacing
        cursor_x += 6 * scale;
    }
}

/// Render a probability bar chart onto a copy of the input frame.
///
/// One filled horizontal bar per action, its width proportional to the
/// action's probability, with the action name drawn next to it. The input
/// frame is untouched. Colors cycle when there are more actions than
/// colors.
///
/// # Errors
/// Returns `OverlayError::LengthMismatch` when `probs` and `actions`
/// disagree in length.
pub fn prob_viz(
    probs: &[f32],
    actions: &[String],
    frame: &Frame,
    colors: &[Color],
) -> Result<Frame, OverlayError> {
    if probs.len() != actions.len() {
        return Err(OverlayError::LengthMismatch {
            probs: probs.len(),
            actions: actions.len(),
        });
    }

    let mut output = frame.clone();
    for (num, (&prob, action)) in probs.iter().zip(actions).enumerate() {
        let y = BAR_TOP + num as i64 * BAR_STEP;
        let width = (prob.clamp(0.0, 1.0) * BAR_SCALE) as i64;
        let color = colors[num % colors.len()];

        fill_rect(&mut output, (0, y), (width, y + BAR_HEIGHT), color);
        draw_label(&mut output, action, 4, y + 8, WHITE, 2);
    }

    Ok(output)
}

/// Draw detected hand landmarks as small filled squares, for preview dumps.
pub fn draw_landmarks(frame: &mut Frame, detection: &Detection, color: Color) {
    let (w, h) = (frame.width as f32, frame.height as f32);
    for hand in detection.hands() {
        for (px, py) in hand.landmarks_pixels(w, h) {
            let (x, y) = (px as i64, py as i64);
            fill_rect(frame, (x - 2, y - 2), (x + 2, y + 2), color);
        }
    }
}

/// Glyph lookup: 5 column bytes, bit 0 = top row.
fn glyph_for(ch: char) -> [u8; 5] {
    let upper = ch.to_ascii_uppercase();
    match upper {
        'A' => [0x7E, 0x11, 0x11, 0x11, 0x7E],
        'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
        'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
        'D' => [0x7F, 0x41, 0x41, 0x22, 0x1C],
        'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
        'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
        'G' => [0x3E, 0x41, 0x49, 0x49, 0x7A],
        'H' => [0x7F, 0x08, 0x08, 0x08, 0x7F],
        'I' => [0x00, 0x41, 0x7F, 0x41, 0x00],
        'J' => [0x20, 0x40, 0x41, 0x3F, 0x01],
        'K' => [0x7F, 0x08, 0x14, 0x22, 0x41],
        'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
        'M' => [0x7F, 0x02, 0x0C, 0x02, 0x7F],
        'N' => [0x7F, 0x04, 0x08, 0x10, 0x7F],
        'O' => [0x3E, 0x41, 0x41, 0x41, 0x3E],
        'P' => [0x7F, 0x09, 0x09, 0x09, 0x06],
        'Q' => [0x3E, 0x41, 0x51, 0x21, 0x5E],
        'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
        'S' => [0x46, 0x49, 0x49, 0x49, 0x31],
        'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
        'U' => [0x3F, 0x40, 0x40, 0x40, 0x3F],
        'V' => [0x1F, 0x20, 0x40, 0x20, 0x1F],
        'W' => [0x7F, 0x20, 0x18, 0x20, 0x7F],
        'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
        'Y' => [0x07, 0x08, 0x70, 0x08, 0x07],
        'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],
        '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
        '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
        '2' => [0x42, 0x61, 0x51, 0x49, 0x46],
        '3' => [0x21, 0x41, 0x45, 0x4B, 0x31],
        '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
        '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => [0x3C, 0x4A, 0x49, 0x49, 0x30],
        '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => [0x06, 0x49, 0x49, 0x29, 0x1E],
        '-' => [0x08, 0x08, 0x08, 0x08, 0x08],
        '_' => [0x40, 0x40, 0x40, 0x40, 0x40],
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00],
        _ => [0x7F, 0x41, 0x41, 0x41, 0x7F],
    }
}
