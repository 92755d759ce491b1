use crate::{
    eval::anim::centered_crop,
    eval::evaluator::{BorderState, FrameState},
    foundation::core::{Affine, Canvas, FrameIndex, Point, Rect, Rgba8, Vec2},
    foundation::error::{PromoError, PromoResult},
    style::request::StylingRequest,
    text::layout::{LINE_HEIGHT_RATIO, TextAlign, place_block},
    text::wrap::{MAX_LINE_WIDTH_RATIO, TextMeasure, wrap_words},
};

/// Border stroke width in pixels.
pub const BORDER_WIDTH_PX: f64 = 20.0;
/// Strobe dash pattern: dash length, gap length.
pub const STROBE_DASH: [f64; 2] = [50.0, 25.0];

/// Soft shadow (or glow) cast by a draw op.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Shadow {
    /// Straight-alpha shadow color.
    pub color: Rgba8,
    /// Blur amount; the Gaussian sigma is half of this.
    pub blur: f64,
    /// Device-space offset.
    pub offset: Vec2,
}

impl Shadow {
    /// Caption drop shadow: 70% black, blur 15, offset (+5, +5).
    pub fn text_drop() -> Self {
        Self {
            color: Rgba8::rgb_alpha(0, 0, 0, 0.7),
            blur: 15.0,
            offset: Vec2::new(5.0, 5.0),
        }
    }

    /// Glow around a border stroke.
    pub fn glow(border: BorderState) -> Self {
        let (color, blur) = match border {
            BorderState::Neon { .. } => (Rgba8::rgb(192, 132, 252), 30.0),
            BorderState::Rainbow { .. } => (border.stroke_color(), 20.0),
            BorderState::Strobe => (Rgba8::rgb_alpha(255, 255, 255, 0.7), 15.0),
        };
        Self {
            color,
            blur,
            offset: Vec2::ZERO,
        }
    }
}

/// Paint the source image over the whole surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BackgroundOp {
    /// Region of the source image (in image pixels) stretched to fill the surface.
    pub source_rect: Rect,
}

/// One wrapped caption line.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLine {
    /// Line content.
    pub text: String,
    /// Anchor in block-local space; `y` is the vertical middle of the line.
    pub anchor: Point,
}

/// Draw the caption.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextOp {
    /// Requested font identifier.
    pub font: String,
    /// Effective (animated) font size in pixels.
    pub font_size: f64,
    /// Lines in drawing order.
    pub lines: Vec<TextLine>,
    /// Horizontal anchoring of each line.
    pub align: TextAlign,
    /// Block-local to surface transform.
    pub transform: Affine,
    /// Opacity applied to fill and shadow alike.
    pub opacity: f64,
    /// Straight-alpha fill color.
    pub fill: Rgba8,
    /// Drop shadow.
    pub shadow: Shadow,
}

/// Stroke the border.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BorderOp {
    /// Stroke centerline, inset half the stroke width from each edge.
    pub rect: Rect,
    /// Stroke width in pixels.
    pub width: f64,
    /// Straight-alpha stroke color.
    pub color: Rgba8,
    /// Dash pattern, if any.
    pub dashes: Option<[f64; 2]>,
    /// Glow around the stroke.
    pub glow: Shadow,
}

/// Draw operation in a [`FramePlan`].
///
/// Every op carries its complete draw state so nothing set by one op can affect another.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DrawOp {
    /// Background image.
    Background(BackgroundOp),
    /// Caption.
    Text(TextOp),
    /// Border stroke.
    Border(BorderOp),
}

/// Backend-agnostic draw list for a single frame.
///
/// Ops are always ordered background, text, border; text and border are omitted when not drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FramePlan {
    /// Frame this plan renders.
    pub frame: FrameIndex,
    /// Surface size.
    pub canvas: Canvas,
    /// Ops in drawing order.
    pub ops: Vec<DrawOp>,
}

/// Turn an evaluated [`FrameState`] into a [`FramePlan`].
///
/// `image_size` is the source still's pixel size; `measure` provides line widths for wrapping.
pub fn compile_frame(
    state: &FrameState,
    request: &StylingRequest,
    canvas: Canvas,
    image_size: (u32, u32),
    measure: &mut dyn TextMeasure,
) -> PromoResult<FramePlan> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PromoError::validation("canvas width/height must be > 0"));
    }
    if image_size.0 == 0 || image_size.1 == 0 {
        return Err(PromoError::validation("source image width/height must be > 0"));
    }

    let mut ops = Vec::with_capacity(3);
    ops.push(DrawOp::Background(BackgroundOp {
        source_rect: centered_crop(
            f64::from(image_size.0),
            f64::from(image_size.1),
            state.background_scale,
        ),
    }));

    if let Some(text) = state.text {
        let base_size = request.text_size.font_size_px(canvas.width_f64());
        let font_size = base_size * text.scale;
        let max_width = (canvas.width_f64() * MAX_LINE_WIDTH_RATIO) as f32;
        let words = wrap_words(&request.overlay_text, max_width, |line| {
            measure.measure_text(&request.font, line, font_size as f32)
        })?;

        let placement = place_block(
            request.layout,
            canvas,
            words.len(),
            base_size * LINE_HEIGHT_RATIO,
            text.offset_y,
        );
        let lines = words
            .into_iter()
            .zip(placement.anchors)
            .map(|(text, anchor)| TextLine { text, anchor })
            .collect();

        ops.push(DrawOp::Text(TextOp {
            font: request.font.clone(),
            font_size,
            lines,
            align: placement.align,
            transform: placement.transform,
            opacity: text.opacity,
            fill: Rgba8::WHITE,
            shadow: Shadow::text_drop(),
        }));
    }

    if let Some(border) = state.border {
        let inset = BORDER_WIDTH_PX / 2.0;
        ops.push(DrawOp::Border(BorderOp {
            rect: Rect::new(
                inset,
                inset,
                canvas.width_f64() - inset,
                canvas.height_f64() - inset,
            ),
            width: BORDER_WIDTH_PX,
            color: border.stroke_color(),
            dashes: matches!(border, BorderState::Strobe).then_some(STROBE_DASH),
            glow: Shadow::glow(border),
        }));
    }

    Ok(FramePlan {
        frame: state.frame,
        canvas,
        ops,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
