//! Overlay Renderer: draws detection rectangles and confidence labels
//! directly into a mapped BGRA buffer.
//!
//! Grounded in the original's `cairooverlay` `draw` signal handler, which
//! strokes a green rectangle (line width 3) and positions a percentage
//! label above (or below, to avoid clipping) each scaled detection box.
//! No Cairo binding exists anywhere in this workspace's dependency corpus,
//! so the draw is a buffer pad probe rasterizing straight lines and a
//! fixed bitmap font directly into the pixel buffer — the same
//! "plain loop over a raw pixel buffer" idiom `rockchip-rga`'s software
//! fallback and color converter already use.

use crate::detection_store::{DetectionBox, DetectionSetStore};
use crate::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

const LINE_WIDTH: i32 = 3;
const GREEN_BGRA: [u8; 4] = [0, 255, 0, 255];
const LABEL_MARGIN: i32 = 2;
const GLYPH_SPACING: i32 = 1;

#[derive(Clone, Copy)]
struct ScaledBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    score: f32,
}

/// Draws every current detection box into `buffer`, a tightly packed BGRA
/// frame of `video_width`x`video_height` pixels with `stride` bytes per
/// row. No-op if there are no detections or either source dimension is
/// unknown (zero), matching the spec's described behavior exactly.
pub fn draw(buffer: &mut [u8], stride: usize, video_width: u32, video_height: u32, store: &DetectionSetStore) {
    let (boxes, source_width, source_height) = store.snapshot();
    if boxes.is_empty() || source_width == 0 || source_height == 0 {
        return;
    }

    let scale_x = video_width as f32 / source_width as f32;
    let scale_y = video_height as f32 / source_height as f32;

    for detection in &boxes {
        let scaled = scale_box(detection, scale_x, scale_y);
        stroke_rect(buffer, stride, video_width, video_height, scaled);
        if scaled.score > 0.0 {
            draw_label(buffer, stride, video_width, video_height, scaled);
        }
    }
}

fn scale_box(b: &DetectionBox, scale_x: f32, scale_y: f32) -> ScaledBox {
    let cx = b.center_x * scale_x;
    let cy = b.center_y * scale_y;
    let w = b.width * scale_x;
    let h = b.height * scale_y;
    ScaledBox {
        left: (cx - w / 2.0).round() as i32,
        top: (cy - h / 2.0).round() as i32,
        right: (cx + w / 2.0).round() as i32,
        bottom: (cy + h / 2.0).round() as i32,
        score: b.score,
    }
}

fn set_pixel(buffer: &mut [u8], stride: usize, width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
        return;
    }
    let offset = y as usize * stride + x as usize * 4;
    if offset + 4 > buffer.len() {
        return;
    }
    buffer[offset..offset + 4].copy_from_slice(&color);
}

/// Axis-aligned rectangle sides are drawn with plain integer loops rather
/// than a general Bresenham stepper — for a horizontal or vertical line
/// the two degenerate to the same thing.
fn stroke_rect(buffer: &mut [u8], stride: usize, width: u32, height: u32, b: ScaledBox) {
    let half = LINE_WIDTH / 2;
    for dy in -half..=half {
        for x in b.left..=b.right {
            set_pixel(buffer, stride, width, height, x, b.top + dy, GREEN_BGRA);
            set_pixel(buffer, stride, width, height, x, b.bottom + dy, GREEN_BGRA);
        }
    }
    for dx in -half..=half {
        for y in b.top..=b.bottom {
            set_pixel(buffer, stride, width, height, b.left + dx, y, GREEN_BGRA);
            set_pixel(buffer, stride, width, height, b.right + dx, y, GREEN_BGRA);
        }
    }
}

/// Formats `score` as up to three characters (`"N%"` or `"NN%"`) without
/// any heap allocation — a fixed stack array stands in for the scratch
/// buffer the original's Cairo text layout would have used.
fn format_percent(score: f32) -> ([char; 3], usize) {
    let pct = ((score.clamp(0.0, 1.0) * 100.0).round() as u32).min(99);
    let mut chars = ['0', '%', ' '];
    if pct >= 10 {
        chars[0] = (b'0' + (pct / 10) as u8) as char;
        chars[1] = (b'0' + (pct % 10) as u8) as char;
        chars[2] = '%';
        (chars, 3)
    } else {
        chars[0] = (b'0' + pct as u8) as char;
        (chars, 2)
    }
}

fn draw_label(buffer: &mut [u8], stride: usize, width: u32, height: u32, b: ScaledBox) {
    let (chars, len) = format_percent(b.score);
    let label_height = GLYPH_HEIGHT as i32;
    let above_top = b.top - LABEL_MARGIN - label_height;
    let top = if above_top < 0 { b.bottom + LABEL_MARGIN } else { above_top };

    for (i, c) in chars.iter().take(len).enumerate() {
        let glyph_x = b.left + i as i32 * (GLYPH_WIDTH as i32 + GLYPH_SPACING);
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if font::pixel_at(*c, row, col) {
                    set_pixel(buffer, stride, width, height, glyph_x + col as i32, top + row as i32, GREEN_BGRA);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection_store::DetectionSetStore;

    fn blank_frame(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 4) as usize]
    }

    #[test]
    fn no_detections_leaves_the_frame_untouched() {
        let store = DetectionSetStore::new(320, 240);
        let mut frame = blank_frame(64, 48);
        let before = frame.clone();
        draw(&mut frame, 64 * 4, 64, 48, &store);
        assert_eq!(frame, before);
    }

    #[test]
    fn a_scaled_box_draws_a_stroked_rectangle() {
        let store = DetectionSetStore::new(32, 24);
        store.set(
            &[DetectionBox { center_x: 16.0, center_y: 12.0, width: 10.0, height: 10.0, score: 0.0 }],
            32,
            24,
        );
        let mut frame = blank_frame(64, 48);
        draw(&mut frame, 64 * 4, 64, 48, &store);
        assert!(frame.chunks(4).any(|px| px == GREEN_BGRA));
    }

    #[test]
    fn zero_source_dimensions_is_a_no_op() {
        let store = DetectionSetStore::new(0, 0);
        store.set(&[DetectionBox { center_x: 1.0, center_y: 1.0, width: 1.0, height: 1.0, score: 0.5 }], 0, 0);
        let mut frame = blank_frame(64, 48);
        draw(&mut frame, 64 * 4, 64, 48, &store);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn format_percent_clamps_and_pads() {
        assert_eq!(format_percent(1.5), (['9', '9', '%'], 3));
        assert_eq!(format_percent(0.05), (['5', '%', ' '], 2));
        assert_eq!(format_percent(-1.0), (['0', '%', ' '], 2));
    }
}
