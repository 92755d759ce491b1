use crate::{
    foundation::core::{FrameIndex, Rect},
    foundation::math::{clamp01, lerp},
    style::options::TextAnimation,
};

/// Scale start for the zoom-in entrance.
pub const ZOOM_IN_START_SCALE: f64 = 0.8;
/// Vertical distance, in pixels, covered by the slide-in entrance.
pub const SLIDE_IN_DISTANCE_PX: f64 = 50.0;

/// Opacity, scale and vertical offset applied to every caption line on one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextAnimState {
    /// Clamped progress the other fields were derived from.
    pub progress: f64,
    /// Caption opacity in `[0, 1]`.
    pub opacity: f64,
    /// Font scale relative to the size class.
    pub scale: f64,
    /// Pixels added to the block's baseline (positive is downward).
    pub offset_y: f64,
}

impl TextAnimState {
    /// Evaluate `animation` at `progress`; inputs outside `[0, 1]` are clamped.
    pub fn evaluate(animation: TextAnimation, progress: f64) -> Self {
        let p = clamp01(progress);
        let (opacity, scale, offset_y) = match animation {
            TextAnimation::None => (1.0, 1.0, 0.0),
            TextAnimation::ZoomIn => (p, lerp(ZOOM_IN_START_SCALE, 1.0, p), 0.0),
            TextAnimation::FadeIn => (p, 1.0, 0.0),
            TextAnimation::SlideIn => (1.0, 1.0, SLIDE_IN_DISTANCE_PX * (1.0 - p)),
        };
        Self {
            progress: p,
            opacity,
            scale,
            offset_y,
        }
    }
}

/// Global loop progress used by ken-burns: `frame / (total - 1)`, or 0 for single-frame loops.
pub fn loop_progress(frame: FrameIndex, total_frames: u64) -> f64 {
    if total_frames <= 1 {
        return 0.0;
    }
    clamp01(frame.0 as f64 / (total_frames - 1) as f64)
}

/// Ken-burns zoom scale: 1.0 on the first frame up to `zoom_factor` on the last.
pub fn ken_burns_scale(frame: FrameIndex, total_frames: u64, zoom_factor: f64) -> f64 {
    lerp(1.0, zoom_factor, loop_progress(frame, total_frames))
}

/// Source crop for a zoom `scale`, shrunk symmetrically about the image center.
pub fn centered_crop(image_width: f64, image_height: f64, scale: f64) -> Rect {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let w = image_width / scale;
    let h = image_height / scale;
    let x0 = (image_width - w) / 2.0;
    let y0 = (image_height - h) / 2.0;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/anim.rs"]
mod tests;
