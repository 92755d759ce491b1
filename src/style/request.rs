use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{PromoError, PromoResult},
    style::options::{BackgroundEffect, BorderEffect, FONTS, Layout, TextAnimation, TextSize},
};

/// A user's full styling choice for one generation request.
///
/// Created once per request and read-only afterwards; the frame sequencer borrows it for the
/// duration of one render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingRequest {
    /// Source-language idea used to generate the still.
    #[serde(default)]
    pub image_idea: String,
    /// Caption drawn over the still. Must be non-empty.
    pub overlay_text: String,
    /// Font identifier (a family name or CSS-style family list).
    #[serde(default = "default_font")]
    pub font: String,
    /// Caption placement.
    #[serde(default = "default_layout")]
    pub layout: Layout,
    /// Caption size class.
    #[serde(default = "default_text_size")]
    pub text_size: TextSize,
    /// Caption entrance animation.
    #[serde(default = "default_text_animation")]
    pub text_animation: TextAnimation,
    /// Background motion.
    #[serde(default = "default_background_effect")]
    pub background_effect: BackgroundEffect,
    /// Border decoration.
    #[serde(default = "default_border_effect")]
    pub border_effect: BorderEffect,
}

fn default_font() -> String {
    FONTS[0].family.to_string()
}

fn default_layout() -> Layout {
    Layout::Center
}

fn default_text_size() -> TextSize {
    TextSize::Normal
}

fn default_text_animation() -> TextAnimation {
    TextAnimation::ZoomIn
}

fn default_background_effect() -> BackgroundEffect {
    BackgroundEffect::None
}

fn default_border_effect() -> BorderEffect {
    BorderEffect::None
}

impl StylingRequest {
    /// Request with the given caption and every other choice at its default.
    pub fn new(overlay_text: impl Into<String>) -> Self {
        Self {
            image_idea: String::new(),
            overlay_text: overlay_text.into(),
            font: default_font(),
            layout: default_layout(),
            text_size: default_text_size(),
            text_animation: default_text_animation(),
            background_effect: default_background_effect(),
            border_effect: default_border_effect(),
        }
    }

    /// Set the source-language idea.
    pub fn with_image_idea(mut self, idea: impl Into<String>) -> Self {
        self.image_idea = idea.into();
        self
    }

    /// Set the font identifier.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Set the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the text size class.
    pub fn with_text_size(mut self, text_size: TextSize) -> Self {
        self.text_size = text_size;
        self
    }

    /// Set the text animation.
    pub fn with_text_animation(mut self, animation: TextAnimation) -> Self {
        self.text_animation = animation;
        self
    }

    /// Set the background effect.
    pub fn with_background_effect(mut self, effect: BackgroundEffect) -> Self {
        self.background_effect = effect;
        self
    }

    /// Set the border effect.
    pub fn with_border_effect(mut self, effect: BorderEffect) -> Self {
        self.border_effect = effect;
        self
    }

    /// Check the fields the renderer relies on.
    pub fn validate(&self) -> PromoResult<()> {
        if self.overlay_text.trim().is_empty() {
            return Err(PromoError::validation("overlay text must be non-empty"));
        }
        if self.font.trim().is_empty() {
            return Err(PromoError::validation("font identifier must be non-empty"));
        }
        Ok(())
    }

    /// Like [`StylingRequest::validate`], also requiring the idea text used for image
    /// generation.
    pub fn validate_for_generation(&self) -> PromoResult<()> {
        if self.image_idea.trim().is_empty() {
            return Err(PromoError::validation("image idea must be non-empty"));
        }
        self.validate()
    }

    /// Parse and validate a request from JSON text.
    pub fn from_json_str(s: &str) -> PromoResult<Self> {
        let req: Self = serde_json::from_str(s)
            .map_err(|e| PromoError::validation(format!("invalid request json: {e}")))?;
        req.validate()?;
        Ok(req)
    }

    /// Read, parse and validate a request JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PromoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read request '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/request.rs"]
mod tests;
