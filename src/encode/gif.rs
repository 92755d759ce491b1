use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    encode::sink::{AbortHandle, EncodeOutcome, EncodedGif, FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{PromoError, PromoResult},
    render::backend::FrameRGBA,
};

/// Encoder settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// NeuQuant sampling speed, 1 (best) ..= 30 (fastest).
    pub quality: i32,
    /// Frames quantized in parallel per batch.
    pub workers: usize,
    /// Loop count; `None` loops forever.
    pub repeat: Option<u16>,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            quality: 10,
            workers: 4,
            repeat: None,
        }
    }
}

impl GifSinkOpts {
    /// Check ranges.
    pub fn validate(&self) -> PromoResult<()> {
        if !(1..=30).contains(&self.quality) {
            return Err(PromoError::validation("gif quality must be in 1..=30"));
        }
        if self.workers == 0 {
            return Err(PromoError::validation("gif workers must be >= 1"));
        }
        Ok(())
    }
}

/// GIF delay in centiseconds for a delay in milliseconds (rounded, at least 1).
pub fn delay_centis(delay_ms: u32) -> u16 {
    (f64::from(delay_ms) / 10.0).round().clamp(1.0, f64::from(u16::MAX)) as u16
}

struct Pending {
    rgba: Vec<u8>,
    delay: u16,
}

struct Encoding {
    encoder: gif::Encoder<BufWriter<File>>,
    width: u16,
    height: u16,
    pending: Vec<Pending>,
    written: u64,
}

/// Frame sink that encodes an animated GIF into a file.
///
/// Frames are buffered in batches of `workers`, quantized in parallel and written in push order.
pub struct GifSink {
    opts: GifSinkOpts,
    path: PathBuf,
    abort: AbortHandle,
    state: Option<Encoding>,
}

impl GifSink {
    /// Encode into the file at `path` (created or truncated on `begin`).
    pub fn new(path: impl Into<PathBuf>, opts: GifSinkOpts) -> PromoResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            path: path.into(),
            abort: AbortHandle::new(),
            state: None,
        })
    }

    /// Use an externally owned abort flag.
    pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    /// Handle that aborts this encode.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush_pending(&mut self) -> PromoResult<()> {
        let speed = self.opts.quality;
        let Some(state) = self.state.as_mut() else {
            return Err(PromoError::evaluation("gif sink is not started"));
        };
        if state.pending.is_empty() {
            return Ok(());
        }

        let (w, h) = (state.width, state.height);
        let frames: Vec<gif::Frame<'static>> = state
            .pending
            .par_iter_mut()
            .map(|p| {
                let mut frame = gif::Frame::from_rgba_speed(w, h, &mut p.rgba, speed);
                frame.delay = p.delay;
                frame
            })
            .collect();
        state.pending.clear();

        for frame in &frames {
            state
                .encoder
                .write_frame(frame)
                .context("write gif frame")?;
            state.written += 1;
        }
        tracing::debug!(batch = frames.len(), written = state.written, "encoded gif frames");
        Ok(())
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> PromoResult<()> {
        let width: u16 = cfg
            .width
            .try_into()
            .map_err(|_| PromoError::validation("gif width exceeds u16"))?;
        let height: u16 = cfg
            .height
            .try_into()
            .map_err(|_| PromoError::validation("gif height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(PromoError::validation("gif width/height must be > 0"));
        }

        let file = File::create(&self.path)
            .with_context(|| format!("create gif output '{}'", self.path.display()))?;
        let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
            .context("create gif encoder")?;
        let repeat = match self.opts.repeat {
            None => gif::Repeat::Infinite,
            Some(n) => gif::Repeat::Finite(n),
        };
        encoder.set_repeat(repeat).context("set gif repeat")?;

        self.state = Some(Encoding {
            encoder,
            width,
            height,
            pending: Vec::with_capacity(self.opts.workers),
            written: 0,
        });
        Ok(())
    }

    fn push_frame(
        &mut self,
        _idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: u32,
    ) -> PromoResult<()> {
        if self.abort.is_aborted() {
            return Ok(());
        }
        let workers = self.opts.workers;
        let Some(state) = self.state.as_mut() else {
            return Err(PromoError::evaluation("gif sink is not started"));
        };
        if frame.width != u32::from(state.width) || frame.height != u32::from(state.height) {
            return Err(PromoError::evaluation(format!(
                "frame size {}x{} does not match gif size {}x{}",
                frame.width, frame.height, state.width, state.height
            )));
        }

        state.pending.push(Pending {
            rgba: frame.to_straight_rgba8(),
            delay: delay_centis(delay_ms),
        });
        if state.pending.len() >= workers {
            self.flush_pending()?;
        }
        Ok(())
    }

    fn aborted(&self) -> bool {
        self.abort.is_aborted()
    }

    fn end(&mut self) -> PromoResult<EncodeOutcome> {
        if self.abort.is_aborted() {
            self.state = None;
            tracing::warn!(path = %self.path.display(), "gif encode aborted");
            return Ok(EncodeOutcome::Aborted);
        }

        self.flush_pending()?;
        let Some(state) = self.state.take() else {
            return Err(PromoError::evaluation("gif sink is not started"));
        };
        let writer = state.encoder.into_inner().context("finish gif stream")?;
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flush gif output: {}", e.error()))?;

        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read gif output '{}'", self.path.display()))?;
        Ok(EncodeOutcome::Finished(EncodedGif {
            bytes,
            width: u32::from(state.width),
            height: u32::from(state.height),
            frame_count: state.written,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
