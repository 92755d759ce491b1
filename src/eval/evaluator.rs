use crate::{
    foundation::core::{FrameIndex, Rgba8},
    foundation::error::{PromoError, PromoResult},
    foundation::math::hsl_to_rgb8,
    eval::anim::{TextAnimState, ken_burns_scale},
    style::options::{BackgroundEffect, BorderEffect},
    style::request::StylingRequest,
    timing::plan::{Phase, TimingPlan},
};

/// Ken-burns end scale used when no configuration overrides it.
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.1;

/// Inputs shared by every frame of one render.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    /// Styling choices for this render.
    pub request: &'a StylingRequest,
    /// Frame budget.
    pub timing: &'a TimingPlan,
    /// Ken-burns end scale (> 1).
    pub zoom_factor: f64,
}

/// Everything that varies from frame to frame, before any geometry is computed.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameState {
    /// Evaluated frame.
    pub frame: FrameIndex,
    /// Phase the frame belongs to.
    pub phase: Phase,
    /// Background zoom scale (1.0 means scale-to-fill without crop).
    pub background_scale: f64,
    /// Caption state; `None` before the text phase.
    pub text: Option<TextAnimState>,
    /// Border stroke; `None` when nothing is drawn on this frame.
    pub border: Option<BorderState>,
}

/// Border stroke evaluated for one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BorderState {
    /// White stroke with oscillating alpha and a purple glow.
    Neon {
        /// Stroke alpha, `0.7 + 0.3 * sin(frame * 0.5)`.
        alpha: f64,
    },
    /// Full-saturation stroke and glow sharing one hue.
    Rainbow {
        /// Hue in degrees, `frame * 360 / total mod 360`.
        hue: f64,
    },
    /// Dashed white stroke, only present on "on" frames.
    Strobe,
}

impl BorderState {
    /// Neon border at `frame`.
    pub fn neon(frame: FrameIndex) -> Self {
        Self::Neon {
            alpha: 0.7 + 0.3 * (frame.0 as f64 * 0.5).sin(),
        }
    }

    /// Rainbow border at `frame` of a `total_frames` loop: one full hue cycle per loop.
    pub fn rainbow(frame: FrameIndex, total_frames: u64) -> Self {
        let total = total_frames.max(1) as f64;
        Self::Rainbow {
            hue: (frame.0 as f64 * 360.0 / total) % 360.0,
        }
    }

    /// Whether the strobe border is lit on `frame` (off for two frames, on for two).
    pub fn strobe_visible(frame: FrameIndex) -> bool {
        frame.0 % 4 >= 2
    }

    /// Straight-alpha stroke color.
    pub fn stroke_color(self) -> Rgba8 {
        match self {
            Self::Neon { alpha } => Rgba8::rgb_alpha(255, 255, 255, alpha),
            Self::Rainbow { hue } => rainbow_color(hue),
            Self::Strobe => Rgba8::WHITE,
        }
    }
}

/// `hsl(hue, 100%, 60%)`, the rainbow stroke and glow color.
pub fn rainbow_color(hue: f64) -> Rgba8 {
    let [r, g, b] = hsl_to_rgb8(hue, 1.0, 0.6);
    Rgba8::rgb(r, g, b)
}

/// Stateless evaluator from frame index to [`FrameState`].
pub struct Evaluator;

impl Evaluator {
    /// Evaluate one frame.
    #[tracing::instrument(level = "trace", skip(ctx))]
    pub fn eval_frame(ctx: &EvalContext<'_>, frame: FrameIndex) -> PromoResult<FrameState> {
        let total = ctx.timing.total_frames;
        if frame.0 >= total {
            return Err(PromoError::evaluation(format!(
                "frame {} is out of bounds (total {total})",
                frame.0
            )));
        }

        let background_scale = match ctx.request.background_effect {
            BackgroundEffect::None => 1.0,
            BackgroundEffect::KenBurns => ken_burns_scale(frame, total, ctx.zoom_factor),
        };

        let text = ctx
            .timing
            .text_progress(frame)
            .map(|p| TextAnimState::evaluate(ctx.request.text_animation, p));

        let border = match ctx.request.border_effect {
            BorderEffect::None => None,
            BorderEffect::Neon => Some(BorderState::neon(frame)),
            BorderEffect::Rainbow => Some(BorderState::rainbow(frame, total)),
            BorderEffect::Strobe => {
                BorderState::strobe_visible(frame).then_some(BorderState::Strobe)
            }
        };

        Ok(FrameState {
            frame,
            phase: ctx.timing.phase_of(frame),
            background_scale,
            text,
            border,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
