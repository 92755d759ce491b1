use std::path::Path;

use anyhow::Context as _;

use crate::{
    encode::gif::GifSinkOpts,
    eval::evaluator::DEFAULT_ZOOM_FACTOR,
    foundation::core::Canvas,
    foundation::error::{PromoError, PromoResult},
    timing::plan::TimingPlan,
};

/// Environment variable overriding [`RenderConfig::workers`].
pub const WORKERS_ENV: &str = "PROMOGIF_WORKERS";

/// Render and encode settings shared by every request.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels; must equal `width`.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// Seconds before the caption appears.
    pub pre_text_secs: f64,
    /// Seconds of caption entrance animation.
    pub text_animation_secs: f64,
    /// Seconds the finished caption is held.
    pub post_text_secs: f64,
    /// Ken-burns end scale.
    pub zoom_factor: f64,
    /// Encoder quality, 1 (best) ..= 30 (fastest).
    pub quality: i32,
    /// Frames quantized in parallel.
    pub workers: usize,
    /// GIF loop count; `None` loops forever.
    pub repeat: Option<u16>,
    /// Suggested download name of the finished GIF.
    pub output_filename: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            fps: 20,
            pre_text_secs: 1.0,
            text_animation_secs: 0.5,
            post_text_secs: 2.0,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            quality: 10,
            workers: 4,
            repeat: None,
            output_filename: "result.gif".to_string(),
        }
    }
}

impl RenderConfig {
    /// Check every field; also checks the derived timing plan.
    pub fn validate(&self) -> PromoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PromoError::validation("width/height must be > 0"));
        }
        if self.width != self.height {
            return Err(PromoError::validation(format!(
                "surface must be square, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > u32::from(u16::MAX) {
            return Err(PromoError::validation("width/height must be <= 65535"));
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor <= 1.0 {
            return Err(PromoError::validation("zoom_factor must be finite and > 1"));
        }
        if self.output_filename.trim().is_empty() {
            return Err(PromoError::validation("output_filename must be non-empty"));
        }
        self.sink_opts().validate()?;
        self.timing_plan().map(|_| ())
    }

    /// Parse and validate a config from JSON text. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> PromoResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PromoError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a config JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PromoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `PROMOGIF_WORKERS` when it holds a positive integer.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(n) = std::env::var(WORKERS_ENV)
            .ok()
            .and_then(|v| parse_workers(&v))
        {
            self.workers = n;
        }
        self
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Frame budget for these durations.
    pub fn timing_plan(&self) -> PromoResult<TimingPlan> {
        TimingPlan::new(
            self.fps,
            self.pre_text_secs,
            self.text_animation_secs,
            self.post_text_secs,
        )
    }

    /// Encoder settings.
    pub fn sink_opts(&self) -> GifSinkOpts {
        GifSinkOpts {
            quality: self.quality,
            workers: self.workers,
            repeat: self.repeat,
        }
    }
}

fn parse_workers(v: &str) -> Option<usize> {
    v.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
