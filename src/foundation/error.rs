/// Convenience result type used across promogif.
pub type PromoResult<T> = Result<T, PromoError>;

/// Top-level error taxonomy.
///
/// Every stage of a generation attempt wraps its cause into one of these kinds and fails fast.
/// None of them is fatal to the process; a failed attempt leaves the engine usable for the next.
#[derive(thiserror::Error, Debug)]
pub enum PromoError {
    /// Invalid user-provided request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal failure while planning or rasterizing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Upstream prompt translation failed or returned empty text.
    #[error("translation failed: {0}")]
    TranslationFailed(String),

    /// Upstream image generation failed or returned no images.
    #[error("image generation failed: {0}")]
    GenerationFailed(String),

    /// The generated still could not be decoded.
    #[error("image load failed: {0}")]
    ImageLoad(String),

    /// The encoder reported an abort before producing output.
    #[error("render aborted")]
    RenderAborted,

    /// A temporary encoder resource could not be acquired.
    #[error("resource acquisition failed: {0}")]
    ResourceAcquisition(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromoError {
    /// Build a [`PromoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PromoError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`PromoError::TranslationFailed`] value.
    pub fn translation(msg: impl Into<String>) -> Self {
        Self::TranslationFailed(msg.into())
    }

    /// Build a [`PromoError::GenerationFailed`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationFailed(msg.into())
    }

    /// Build a [`PromoError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`PromoError::ResourceAcquisition`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }

    /// Single-line message suitable for showing to the person who requested the GIF.
    pub fn user_message(&self) -> String {
        format!("GIF generation failed: {self}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
