use std::{collections::HashMap, sync::Arc};

use kurbo::Shape as _;

use crate::{
    assets::decode::PreparedImage,
    compile::plan::{BackgroundOp, BorderOp, Shadow, TextOp},
    foundation::core::{Affine, Canvas, Rect, Rgba8},
    foundation::error::{PromoError, PromoResult},
    render::backend::{FrameBackend, FrameRGBA},
    render::blur::{blur_rgba8_premul, radius_for_sigma},
    render::composite::{over_in_place, shift, tint_alpha},
    text::font::{FontBook, RegisteredFont},
    text::layout::TextAlign,
    text::wrap::TextMeasure,
};

/// Flattening tolerance used when outlining border strokes.
const STROKE_TOLERANCE: f64 = 0.1;

/// CPU raster backend powered by `vello_cpu`.
///
/// The source still is uploaded once; each op is drawn into its own transparent layer, which
/// gets its shadow or glow and is then composited onto the frame surface.
pub struct CpuBackend {
    fonts: FontBook,
    background: vello_cpu::Image,
    font_data: HashMap<String, vello_cpu::peniko::FontData>,
    ctx: Option<vello_cpu::RenderContext>,
    canvas: Canvas,
    surface: Vec<u8>,
}

impl CpuBackend {
    /// Create a backend that paints `image` as the background and sets text with `fonts`.
    pub fn new(fonts: FontBook, image: &PreparedImage) -> PromoResult<Self> {
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        Ok(Self {
            fonts,
            background: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            font_data: HashMap::new(),
            ctx: None,
            canvas: Canvas {
                width: 0,
                height: 0,
            },
            surface: Vec::new(),
        })
    }

    fn font_data_for(&mut self, font: &RegisteredFont) -> vello_cpu::peniko::FontData {
        self.font_data
            .entry(font.family.clone())
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                    font.index,
                )
            })
            .clone()
    }

    /// Draw into a fresh transparent layer the size of the canvas.
    fn render_layer(
        &mut self,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> PromoResult<()>,
    ) -> PromoResult<Vec<u8>> {
        let (w, h) = canvas_u16(self.canvas)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        let drawn = f(self, &mut ctx);
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        if drawn.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        }
        self.ctx = Some(ctx);
        drawn?;
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    /// Composite `layer` (and its shadow, if any) onto the surface.
    fn composite_layer(
        &mut self,
        layer: &[u8],
        shadow: Option<Shadow>,
        opacity: f32,
    ) -> PromoResult<()> {
        if let Some(shadow) = shadow {
            let cast = cast_shadow(layer, self.canvas, shadow)?;
            over_in_place(&mut self.surface, &cast, opacity)?;
        }
        over_in_place(&mut self.surface, layer, opacity)
    }
}

impl TextMeasure for CpuBackend {
    fn measure_text(&mut self, font: &str, text: &str, size_px: f32) -> PromoResult<f32> {
        self.fonts.measure_text(font, text, size_px)
    }
}

impl FrameBackend for CpuBackend {
    fn begin_frame(&mut self, canvas: Canvas) -> PromoResult<()> {
        canvas_u16(canvas)?;
        self.canvas = canvas;
        self.surface.clear();
        self.surface.resize(canvas.rgba8_len(), 0);
        Ok(())
    }

    fn draw_background(&mut self, op: &BackgroundOp) -> PromoResult<()> {
        let src = op.source_rect;
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return Err(PromoError::evaluation("background source rect is empty"));
        }
        let transform = Affine::scale_non_uniform(
            self.canvas.width_f64() / src.width(),
            self.canvas.height_f64() / src.height(),
        ) * Affine::translate((-src.x0, -src.y0));

        let layer = self.render_layer(|this, ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(this.background.clone());
            ctx.fill_rect(&rect_to_cpu(src));
            Ok(())
        })?;
        self.composite_layer(&layer, None, 1.0)
    }

    fn draw_text(&mut self, op: &TextOp) -> PromoResult<()> {
        let size = op.font_size as f32;
        let mut shaped = Vec::with_capacity(op.lines.len());
        for line in &op.lines {
            let s = self.fonts.shape_line(&op.font, &line.text, size)?;
            let x = match op.align {
                TextAlign::Center => line.anchor.x - f64::from(s.width) / 2.0,
                TextAlign::Left => line.anchor.x,
            };
            let y = line.anchor.y - f64::from(s.middle());
            shaped.push((op.transform * Affine::translate((x, y)), s));
        }

        let fill = op.fill;
        let layer = self.render_layer(|this, ctx| {
            ctx.set_paint(color_to_cpu(fill));
            for (transform, line) in shaped {
                let font = this.font_data_for(&line.font);
                ctx.set_transform(affine_to_cpu(transform));
                ctx.glyph_run(&font)
                    .font_size(size)
                    .fill_glyphs(line.glyphs.into_iter());
            }
            Ok(())
        })?;
        self.composite_layer(&layer, Some(op.shadow), op.opacity as f32)
    }

    fn draw_border(&mut self, op: &BorderOp) -> PromoResult<()> {
        let mut stroke = kurbo::Stroke::new(op.width)
            .with_caps(kurbo::Cap::Butt)
            .with_join(kurbo::Join::Miter);
        if let Some(dashes) = op.dashes {
            stroke = stroke.with_dashes(0.0, dashes);
        }
        let outline = kurbo::stroke(
            op.rect.to_path(STROKE_TOLERANCE),
            &stroke,
            &kurbo::StrokeOpts::default(),
            STROKE_TOLERANCE,
        );

        let color = op.color;
        let layer = self.render_layer(|_, ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_path(&bezpath_to_cpu(&outline));
            Ok(())
        })?;
        self.composite_layer(&layer, Some(op.glow), 1.0)
    }

    fn readback_rgba8(&mut self) -> PromoResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.surface.clone(),
            premultiplied: true,
        })
    }
}

/// Tint, blur and offset a layer's silhouette.
fn cast_shadow(layer: &[u8], canvas: Canvas, shadow: Shadow) -> PromoResult<Vec<u8>> {
    let tinted = tint_alpha(layer, shadow.color.to_premul());
    let sigma = (shadow.blur / 2.0) as f32;
    let blurred = blur_rgba8_premul(
        &tinted,
        canvas.width,
        canvas.height,
        radius_for_sigma(sigma),
        sigma,
    )?;
    shift(
        &blurred,
        canvas.width,
        canvas.height,
        shadow.offset.x.round() as i32,
        shadow.offset.y.round() as i32,
    )
}

fn canvas_u16(canvas: Canvas) -> PromoResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| PromoError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| PromoError::validation("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(PromoError::validation("canvas width/height must be > 0"));
    }
    Ok((w, h))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PromoResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PromoError::image_load("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PromoError::image_load("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PromoError::evaluation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
