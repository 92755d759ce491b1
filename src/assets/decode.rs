use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::error::{PromoError, PromoResult};

/// Decoded still image, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an encoded image (JPEG, PNG, ...) into premultiplied RGBA8.
///
/// Any decode failure, including an empty image, is an image-load error.
pub fn decode_image(bytes: &[u8]) -> PromoResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PromoError::image_load(format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(PromoError::image_load("decoded image is empty"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode a base64 payload (optionally a `data:` URL) and then the image inside it.
pub fn decode_base64_image(payload: &str) -> PromoResult<PreparedImage> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| PromoError::image_load(format!("invalid base64 image payload: {e}")))?;
    decode_image(&bytes)
}

/// Read and decode an image file.
pub fn load_image_file(path: impl AsRef<std::path::Path>) -> PromoResult<PreparedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| PromoError::image_load(format!("read '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
