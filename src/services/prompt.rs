use crate::foundation::error::{PromoError, PromoResult};

/// Style keywords appended to every translated image prompt.
pub const IMAGE_STYLE_KEYWORDS: &[&str] = &[
    "professional photography",
    "photorealistic",
    "cinematic lighting",
    "4k",
    "high detail",
    "close-up shot",
    "soft light",
    "vibrant colors",
];

/// Translates a short source-language idea into English.
pub trait PromptTranslator {
    /// Return the English translation of `idea`, without quotes or prefixes.
    fn translate(&self, idea: &str) -> PromoResult<String>;
}

/// Translator for ideas that are already English.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTranslator;

impl PromptTranslator for IdentityTranslator {
    fn translate(&self, idea: &str) -> PromoResult<String> {
        Ok(idea.to_string())
    }
}

/// Append [`IMAGE_STYLE_KEYWORDS`] to a translation.
pub fn enhance_prompt(translation: &str) -> PromoResult<String> {
    let translation = translation.trim();
    if translation.is_empty() {
        return Err(PromoError::translation("translation returned empty text"));
    }
    Ok(format!("{translation}, {}", IMAGE_STYLE_KEYWORDS.join(", ")))
}

/// Translate `idea` and enhance the result into an image prompt.
///
/// Any translator failure is reported as a translation failure.
#[tracing::instrument(skip(translator))]
pub fn translate_and_enhance(
    translator: &dyn PromptTranslator,
    idea: &str,
) -> PromoResult<String> {
    let translated = translator.translate(idea).map_err(|e| match e {
        PromoError::TranslationFailed(_) => e,
        other => PromoError::translation(other.to_string()),
    })?;
    let prompt = enhance_prompt(&translated)?;
    tracing::debug!(prompt = %prompt, "enhanced prompt");
    Ok(prompt)
}

#[cfg(test)]
#[path = "../../tests/unit/services/prompt.rs"]
mod tests;
