use crate::{
    compile::plan::{BackgroundOp, BorderOp, DrawOp, FramePlan, TextOp},
    foundation::core::Canvas,
    foundation::error::PromoResult,
    text::wrap::TextMeasure,
};

/// A rendered frame as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to straight (unpremultiplied) alpha, as GIF quantization expects.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Rasterizer that executes [`FramePlan`] ops onto a single surface.
///
/// Each draw call owns its full draw state; implementations must not carry transform, shadow or
/// dash state from one call to the next.
pub trait FrameBackend: TextMeasure {
    /// Start a new frame: clear the surface to transparent at `canvas` size.
    fn begin_frame(&mut self, canvas: Canvas) -> PromoResult<()>;
    /// Paint the source image.
    fn draw_background(&mut self, op: &BackgroundOp) -> PromoResult<()>;
    /// Paint the caption.
    fn draw_text(&mut self, op: &TextOp) -> PromoResult<()>;
    /// Stroke the border.
    fn draw_border(&mut self, op: &BorderOp) -> PromoResult<()>;
    /// Read back the finished surface.
    fn readback_rgba8(&mut self) -> PromoResult<FrameRGBA>;
}

/// Run every op of `plan` in order and read back the result.
pub fn execute_plan<B: FrameBackend + ?Sized>(
    backend: &mut B,
    plan: &FramePlan,
) -> PromoResult<FrameRGBA> {
    backend.begin_frame(plan.canvas)?;

    for op in &plan.ops {
        match op {
            DrawOp::Background(op) => backend.draw_background(op)?,
            DrawOp::Text(op) => backend.draw_text(op)?,
            DrawOp::Border(op) => backend.draw_border(op)?,
        }
    }

    backend.readback_rgba8()
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
