use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::decode::{PreparedImage, decode_base64_image},
    compile::plan::compile_frame,
    config::RenderConfig,
    encode::gif::GifSink,
    encode::sink::{AbortHandle, EncodeOutcome, EncodedGif, FrameSink, SinkConfig},
    eval::evaluator::{EvalContext, Evaluator},
    foundation::core::{Canvas, FrameIndex},
    foundation::error::{PromoError, PromoResult},
    render::backend::{FrameBackend, FrameRGBA, execute_plan},
    render::cpu::CpuBackend,
    services::resources::{ResourceGuard, WorkerResources},
    style::request::StylingRequest,
    text::font::FontBook,
};

/// A finished GIF ready to be saved or offered for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GifArtifact {
    /// Encoded GIF file contents.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frames in the animation.
    pub frame_count: u64,
    /// Suggested download file name.
    pub suggested_filename: String,
}

impl GifArtifact {
    /// Write the GIF bytes to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> PromoResult<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write gif '{}'", path.display()))?;
        Ok(())
    }
}

/// Evaluate, compile and rasterize one frame.
pub fn render_frame(
    ctx: &EvalContext<'_>,
    frame: FrameIndex,
    canvas: Canvas,
    image_size: (u32, u32),
    backend: &mut dyn FrameBackend,
) -> PromoResult<FrameRGBA> {
    let state = Evaluator::eval_frame(ctx, frame)?;
    let plan = compile_frame(&state, ctx.request, canvas, image_size, &mut *backend)?;
    execute_plan(backend, &plan)
}

/// Drive every frame of the timing plan through `backend` into `sink`, in index order.
///
/// Stops pushing as soon as the sink reports an abort. `end` is called exactly once after
/// `begin`, even when a frame fails; an aborted encode is [`PromoError::RenderAborted`].
#[tracing::instrument(skip_all, fields(total = ctx.timing.total_frames))]
pub fn run_frames(
    ctx: &EvalContext<'_>,
    canvas: Canvas,
    image_size: (u32, u32),
    backend: &mut dyn FrameBackend,
    sink: &mut dyn FrameSink,
) -> PromoResult<EncodedGif> {
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        frame_count: ctx.timing.total_frames,
    })?;

    let delay_ms = ctx.timing.frame_delay_ms.round() as u32;
    let mut produce = || -> PromoResult<u64> {
        let mut pushed = 0;
        for frame in ctx.timing.frames() {
            if sink.aborted() {
                break;
            }
            let rgba = render_frame(ctx, frame, canvas, image_size, backend)?;
            sink.push_frame(frame, &rgba, delay_ms)?;
            pushed += 1;
        }
        Ok(pushed)
    };
    let produced = produce();
    let outcome = sink.end();

    let pushed = produced?;
    match outcome? {
        EncodeOutcome::Finished(gif) => {
            tracing::debug!(frames = pushed, "frame loop finished");
            Ok(gif)
        }
        EncodeOutcome::Aborted => {
            tracing::warn!(frames = pushed, "encoder aborted");
            Err(PromoError::RenderAborted)
        }
    }
}

/// Render `request` over a base64-encoded still into a GIF.
pub fn render_gif(
    request: &StylingRequest,
    image_base64: &str,
    fonts: FontBook,
    config: &RenderConfig,
    resources: &dyn WorkerResources,
) -> PromoResult<GifArtifact> {
    render_gif_with_abort(
        request,
        image_base64,
        fonts,
        config,
        resources,
        &AbortHandle::new(),
    )
}

/// Like [`render_gif`], with an externally owned abort flag.
///
/// The worker resource is held for the whole call and released on every exit path, including
/// an undecodable still.
#[tracing::instrument(skip_all)]
pub fn render_gif_with_abort(
    request: &StylingRequest,
    image_base64: &str,
    fonts: FontBook,
    config: &RenderConfig,
    resources: &dyn WorkerResources,
    abort: &AbortHandle,
) -> PromoResult<GifArtifact> {
    request.validate()?;
    config.validate()?;
    let timing = config.timing_plan()?;

    let guard = ResourceGuard::acquire(resources)?;
    let image = decode_base64_image(image_base64)?;
    let mut backend = CpuBackend::new(fonts, &image)?;
    let mut sink =
        GifSink::new(guard.path(), config.sink_opts())?.with_abort_handle(abort.clone());

    let ctx = EvalContext {
        request,
        timing: &timing,
        zoom_factor: config.zoom_factor,
    };
    let gif = run_frames(
        &ctx,
        config.canvas(),
        (image.width, image.height),
        &mut backend,
        &mut sink,
    )?;
    tracing::info!(
        frames = gif.frame_count,
        bytes = gif.bytes.len(),
        "gif rendered"
    );
    Ok(GifArtifact {
        bytes: gif.bytes,
        width: gif.width,
        height: gif.height,
        frame_count: gif.frame_count,
        suggested_filename: config.output_filename.clone(),
    })
}

/// Render a single frame of `request` over a decoded still.
pub fn render_still_frame(
    request: &StylingRequest,
    image: &PreparedImage,
    fonts: FontBook,
    config: &RenderConfig,
    frame: FrameIndex,
) -> PromoResult<FrameRGBA> {
    request.validate()?;
    config.validate()?;
    let timing = config.timing_plan()?;
    let ctx = EvalContext {
        request,
        timing: &timing,
        zoom_factor: config.zoom_factor,
    };
    let mut backend = CpuBackend::new(fonts, image)?;
    render_frame(
        &ctx,
        frame,
        config.canvas(),
        (image.width, image.height),
        &mut backend,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/sequencer.rs"]
mod tests;
