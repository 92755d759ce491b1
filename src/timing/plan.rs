use crate::{
    foundation::core::FrameIndex,
    foundation::error::{PromoError, PromoResult},
    foundation::math::clamp01,
};

/// Contiguous frame range with distinct text behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Background only; text not drawn.
    PreText,
    /// Text entrance animation in progress.
    TextAnimation,
    /// Text held at its final state.
    PostText,
}

/// Frame budget derived from phase durations and a frame rate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TimingPlan {
    /// Frames per second.
    pub fps: u32,
    /// Frames in the pre-text hold.
    pub pre_text_frames: u64,
    /// Frames in the text entrance animation.
    pub text_animation_frames: u64,
    /// Frames in the post-text hold.
    pub post_text_frames: u64,
    /// Sum of the three phases.
    pub total_frames: u64,
    /// Delay of every frame in milliseconds (`1000 / fps`).
    pub frame_delay_ms: f64,
}

/// Number of frames covering `secs` at `fps`, rounded to the nearest frame.
pub fn frame_count(secs: f64, fps: u32) -> u64 {
    (secs * f64::from(fps)).round().max(0.0) as u64
}

impl TimingPlan {
    /// Plan the three phases. Pure; a zero-length phase contributes no frames, but the loop
    /// as a whole must have at least one.
    pub fn new(
        fps: u32,
        pre_text_secs: f64,
        text_animation_secs: f64,
        post_text_secs: f64,
    ) -> PromoResult<Self> {
        if fps == 0 {
            return Err(PromoError::validation("fps must be >= 1"));
        }
        for (name, secs) in [
            ("pre_text_secs", pre_text_secs),
            ("text_animation_secs", text_animation_secs),
            ("post_text_secs", post_text_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(PromoError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }

        let pre_text_frames = frame_count(pre_text_secs, fps);
        let text_animation_frames = frame_count(text_animation_secs, fps);
        let post_text_frames = frame_count(post_text_secs, fps);
        let total_frames = pre_text_frames + text_animation_frames + post_text_frames;
        if total_frames == 0 {
            return Err(PromoError::validation(
                "phase durations must add up to at least one frame",
            ));
        }
        Ok(Self {
            fps,
            pre_text_frames,
            text_animation_frames,
            post_text_frames,
            total_frames,
            frame_delay_ms: 1000.0 / f64::from(fps),
        })
    }

    /// First frame on which text is drawn.
    pub fn text_start(&self) -> FrameIndex {
        FrameIndex(self.pre_text_frames)
    }

    /// Phase membership of `frame`. Frames past the end count as post-text.
    pub fn phase_of(&self, frame: FrameIndex) -> Phase {
        let f = frame.0;
        if f < self.pre_text_frames {
            Phase::PreText
        } else if f < self.pre_text_frames + self.text_animation_frames {
            Phase::TextAnimation
        } else {
            Phase::PostText
        }
    }

    /// Text animation progress for `frame`, or `None` before the text phase.
    ///
    /// With a zero-length animation phase the text appears in its final state.
    pub fn text_progress(&self, frame: FrameIndex) -> Option<f64> {
        if frame.0 < self.pre_text_frames {
            return None;
        }
        if self.text_animation_frames == 0 {
            return Some(1.0);
        }
        let elapsed = (frame.0 - self.pre_text_frames) as f64;
        Some(clamp01(elapsed / self.text_animation_frames as f64))
    }

    /// Iterate every frame index in render order.
    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> + use<> {
        (0..self.total_frames).map(FrameIndex)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/plan.rs"]
mod tests;
