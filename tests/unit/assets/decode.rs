use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(vec![100, 50, 200, 128], 1, 1)).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn jpeg_payload_decodes() {
    let img = image::RgbImage::from_pixel(8, 4, image::Rgb([200, 20, 20]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);

    let prepared = decode_base64_image(&b64).unwrap();
    assert_eq!((prepared.width, prepared.height), (8, 4));
    assert!(prepared.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn data_url_prefix_is_accepted() {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes(vec![0, 0, 0, 255], 1, 1));
    let prepared = decode_base64_image(&format!("data:image/png;base64,{b64}")).unwrap();
    assert_eq!(prepared.width, 1);
}

#[test]
fn garbage_is_an_image_load_error() {
    let err = decode_base64_image("not base64 at all!!").unwrap_err();
    assert!(matches!(err, PromoError::ImageLoad(_)));

    let b64 = base64::engine::general_purpose::STANDARD.encode(b"definitely not an image");
    let err = decode_base64_image(&b64).unwrap_err();
    assert!(matches!(err, PromoError::ImageLoad(_)));
}

#[test]
fn missing_file_is_an_image_load_error() {
    let err = load_image_file("/no/such/image.jpg").unwrap_err();
    assert!(matches!(err, PromoError::ImageLoad(_)));
}
