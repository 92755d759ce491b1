use super::*;
use crate::{
    compile::plan::{STROBE_DASH, TextLine},
    eval::evaluator::BorderState,
    foundation::core::{Point, Vec2},
};

fn solid_image(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(px.repeat((w * h) as usize)),
    }
}

fn backend(px: [u8; 4]) -> CpuBackend {
    CpuBackend::new(FontBook::new(), &solid_image(4, 4, px)).unwrap()
}

fn canvas(n: u32) -> Canvas {
    Canvas {
        width: n,
        height: n,
    }
}

fn full_background(b: &mut CpuBackend) {
    b.draw_background(&BackgroundOp {
        source_rect: Rect::new(0.0, 0.0, 4.0, 4.0),
    })
    .unwrap();
}

fn text_op(opacity: f64) -> TextOp {
    TextOp {
        font: "sans-serif".to_string(),
        font_size: 24.0,
        lines: vec![TextLine {
            text: "Hi".to_string(),
            anchor: Point::new(32.0, 32.0),
        }],
        align: TextAlign::Center,
        transform: Affine::IDENTITY,
        opacity,
        fill: Rgba8::WHITE,
        shadow: Shadow::text_drop(),
    }
}

#[test]
fn background_fills_whole_surface() {
    let mut b = backend([255, 0, 0, 255]);
    b.begin_frame(canvas(16)).unwrap();
    full_background(&mut b);
    let frame = b.readback_rgba8().unwrap();
    assert_eq!((frame.width, frame.height), (16, 16));
    assert!(frame.premultiplied);
    for px in frame.data.chunks_exact(4) {
        assert!(px[0] >= 250 && px[1] <= 5 && px[3] >= 250, "{px:?}");
    }
}

#[test]
fn begin_frame_clears_previous_content() {
    let mut b = backend([0, 255, 0, 255]);
    b.begin_frame(canvas(8)).unwrap();
    full_background(&mut b);
    b.begin_frame(canvas(8)).unwrap();
    let frame = b.readback_rgba8().unwrap();
    assert!(frame.data.iter().all(|&v| v == 0));
}

#[test]
fn oversized_canvas_is_rejected() {
    let mut b = backend([0, 0, 0, 255]);
    assert!(b.begin_frame(canvas(70_000)).is_err());
    assert!(b.begin_frame(canvas(0)).is_err());
}

#[test]
fn solid_border_covers_edges_and_leaves_center() {
    let mut b = backend([0, 0, 0, 255]);
    b.begin_frame(canvas(128)).unwrap();
    full_background(&mut b);
    b.draw_border(&BorderOp {
        rect: Rect::new(10.0, 10.0, 118.0, 118.0),
        width: 20.0,
        color: Rgba8::WHITE,
        dashes: None,
        glow: Shadow::glow(BorderState::Rainbow { hue: 0.0 }),
    })
    .unwrap();
    let frame = b.readback_rgba8().unwrap();

    for (x, y) in [(5, 64), (64, 5), (122, 64), (64, 122)] {
        let px = frame.pixel(x, y).unwrap();
        assert!(px[0] >= 250 && px[1] >= 250 && px[2] >= 250, "({x},{y}) {px:?}");
    }
    assert_eq!(frame.pixel(64, 64).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn dashed_border_has_gaps() {
    let mut b = backend([0, 0, 0, 255]);
    b.begin_frame(canvas(128)).unwrap();
    full_background(&mut b);
    b.draw_border(&BorderOp {
        rect: Rect::new(10.0, 10.0, 118.0, 118.0),
        width: 20.0,
        color: Rgba8::WHITE,
        dashes: Some(STROBE_DASH),
        glow: Shadow::glow(BorderState::Strobe),
    })
    .unwrap();
    let frame = b.readback_rgba8().unwrap();

    // First dash spans x in [10, 60] along the top edge, then a 25px gap.
    assert!(frame.pixel(35, 10).unwrap()[0] >= 250);
    assert!(frame.pixel(72, 10).unwrap()[0] < 200);
}

#[test]
fn glow_spills_past_the_stroke() {
    let mut b = backend([0, 0, 0, 255]);
    b.begin_frame(canvas(128)).unwrap();
    full_background(&mut b);
    b.draw_border(&BorderOp {
        rect: Rect::new(10.0, 10.0, 118.0, 118.0),
        width: 20.0,
        color: Rgba8::WHITE,
        dashes: None,
        glow: Shadow {
            color: Rgba8::rgb(192, 132, 252),
            blur: 30.0,
            offset: Vec2::ZERO,
        },
    })
    .unwrap();
    let frame = b.readback_rgba8().unwrap();
    let px = frame.pixel(24, 64).unwrap();
    assert!(px[2] > 0, "{px:?}");
}

#[test]
fn text_without_fonts_is_an_evaluation_error() {
    let mut b = backend([0, 0, 0, 255]);
    b.begin_frame(canvas(64)).unwrap();
    let err = b.draw_text(&text_op(1.0)).unwrap_err();
    assert!(matches!(err, PromoError::Evaluation(_)));
}

#[test]
fn text_changes_pixels_unless_fully_transparent() {
    let fonts = FontBook::with_system_fonts();
    if fonts.is_empty() {
        return;
    }
    let mut b = CpuBackend::new(fonts, &solid_image(4, 4, [0, 0, 0, 255])).unwrap();

    b.begin_frame(canvas(64)).unwrap();
    full_background(&mut b);
    let bg = b.readback_rgba8().unwrap();

    b.draw_text(&text_op(0.0)).unwrap();
    assert_eq!(b.readback_rgba8().unwrap(), bg);

    b.begin_frame(canvas(64)).unwrap();
    full_background(&mut b);
    b.draw_text(&text_op(1.0)).unwrap();
    let lit = b.readback_rgba8().unwrap();
    assert!(lit.data.chunks_exact(4).any(|px| px[0] > 128));
}
