use super::*;
use base64::Engine as _;

struct Empty;

impl ImageGenerator for Empty {
    fn generate(&self, _: &str, _: &GenerationParams) -> PromoResult<Vec<GeneratedImage>> {
        Ok(Vec::new())
    }
}

struct Broken;

impl ImageGenerator for Broken {
    fn generate(&self, _: &str, _: &GenerationParams) -> PromoResult<Vec<GeneratedImage>> {
        Err(PromoError::Other(anyhow::anyhow!("network down")))
    }
}

#[test]
fn default_params_request_one_square_jpeg() {
    let p = GenerationParams::default();
    assert_eq!(p.number_of_images, 1);
    assert_eq!(p.output_mime_type, "image/jpeg");
    assert_eq!(p.aspect_ratio, "1:1");
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["numberOfImages"], 1);
}

#[test]
fn zero_images_is_a_generation_failure() {
    let err = generate_image(&Empty, "ramen").unwrap_err();
    assert!(matches!(err, PromoError::GenerationFailed(_)));
}

#[test]
fn generator_errors_are_wrapped() {
    let err = generate_image(&Broken, "ramen").unwrap_err();
    assert!(matches!(err, PromoError::GenerationFailed(ref m) if m.contains("network down")));
}

#[test]
fn file_generator_returns_base64_of_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("still.jpg");
    std::fs::write(&path, b"\xff\xd8\xff fake").unwrap();

    let b64 = generate_image(&FileImageGenerator::new(&path), "ignored").unwrap();
    let decoded = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
    assert_eq!(decoded, b"\xff\xd8\xff fake");
}

#[test]
fn missing_file_is_a_generation_failure() {
    let err = generate_image(&FileImageGenerator::new("/no/such/still.jpg"), "x").unwrap_err();
    assert!(matches!(err, PromoError::GenerationFailed(_)));
}
