use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::PromoResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frames that will be pushed.
    pub frame_count: u64,
}

/// A finished animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedGif {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frames written.
    pub frame_count: u64,
}

/// Terminal result of an encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// All frames were encoded.
    Finished(EncodedGif),
    /// The encoder gave up before finishing.
    Aborted,
}

/// Shared abort flag for an in-flight encode.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// A fresh, un-tripped flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag; the sink reports [`EncodeOutcome::Aborted`] from then on.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag has been tripped.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, and
/// `end` is called exactly once after `begin`, whether or not every frame was pushed.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PromoResult<()>;
    /// Push one frame with its display delay.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA, delay_ms: u32)
    -> PromoResult<()>;
    /// Whether the sink has given up; producers stop pushing once this is true.
    fn aborted(&self) -> bool {
        false
    }
    /// Finish the encode.
    fn end(&mut self) -> PromoResult<EncodeOutcome>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA, u32)>,
    abort_after: Option<usize>,
    ended: usize,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reports an abort once `n` frames have been pushed.
    pub fn aborting_after(n: usize) -> Self {
        Self {
            abort_after: Some(n),
            ..Self::default()
        }
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured `(index, frame, delay_ms)` triples, in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA, u32)] {
        &self.frames
    }

    /// How many times `end` was called.
    pub fn end_calls(&self) -> usize {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PromoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: u32,
    ) -> PromoResult<()> {
        self.frames.push((idx, frame.clone(), delay_ms));
        Ok(())
    }

    fn aborted(&self) -> bool {
        self.abort_after.is_some_and(|n| self.frames.len() >= n)
    }

    fn end(&mut self) -> PromoResult<EncodeOutcome> {
        self.ended += 1;
        if self.aborted() {
            return Ok(EncodeOutcome::Aborted);
        }
        let cfg = self.cfg.unwrap_or(SinkConfig {
            width: 0,
            height: 0,
            frame_count: 0,
        });
        Ok(EncodeOutcome::Finished(EncodedGif {
            bytes: Vec::new(),
            width: cfg.width,
            height: cfg.height,
            frame_count: self.frames.len() as u64,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
