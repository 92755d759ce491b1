use std::path::PathBuf;

use base64::Engine as _;

use crate::foundation::error::{PromoError, PromoResult};

/// Fixed request parameters for the image generator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    /// Images to generate.
    pub number_of_images: u32,
    /// Requested output MIME type.
    pub output_mime_type: String,
    /// Requested aspect ratio.
    pub aspect_ratio: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            number_of_images: 1,
            output_mime_type: "image/jpeg".to_string(),
            aspect_ratio: "1:1".to_string(),
        }
    }
}

/// One generated image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes.
    pub image_bytes: String,
    /// MIME type of the decoded bytes.
    pub mime_type: String,
}

/// Produces still images from a text prompt.
pub trait ImageGenerator {
    /// Generate images for `prompt`.
    fn generate(&self, prompt: &str, params: &GenerationParams)
    -> PromoResult<Vec<GeneratedImage>>;
}

/// Generate one image and return its base64 payload.
///
/// Generator errors and an empty result are both generation failures.
#[tracing::instrument(skip(generator))]
pub fn generate_image(generator: &dyn ImageGenerator, prompt: &str) -> PromoResult<String> {
    let images = generator
        .generate(prompt, &GenerationParams::default())
        .map_err(|e| match e {
            PromoError::GenerationFailed(_) => e,
            other => PromoError::generation(other.to_string()),
        })?;
    let Some(first) = images.into_iter().next() else {
        return Err(PromoError::generation("image generation returned no images"));
    };
    Ok(first.image_bytes)
}

/// "Generates" by reading a local still image and base64-encoding it.
#[derive(Clone, Debug)]
pub struct FileImageGenerator {
    path: PathBuf,
}

impl FileImageGenerator {
    /// Serve the image at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageGenerator for FileImageGenerator {
    fn generate(
        &self,
        _prompt: &str,
        params: &GenerationParams,
    ) -> PromoResult<Vec<GeneratedImage>> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            PromoError::generation(format!("read '{}': {e}", self.path.display()))
        })?;
        let mime_type = match self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png".to_string(),
            Some("jpg" | "jpeg") => "image/jpeg".to_string(),
            _ => params.output_mime_type.clone(),
        };
        let image = GeneratedImage {
            image_bytes: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type,
        };
        Ok(vec![image; params.number_of_images.max(1) as usize])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/image_gen.rs"]
mod tests;
