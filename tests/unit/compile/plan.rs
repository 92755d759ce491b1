use super::*;
use crate::{
    eval::anim::TextAnimState,
    style::options::{Layout, TextAnimation},
    text::wrap::MonospaceMeasure,
    timing::plan::Phase,
};

const CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1080,
};

fn state(text: Option<TextAnimState>, border: Option<BorderState>) -> FrameState {
    FrameState {
        frame: FrameIndex(3),
        phase: Phase::TextAnimation,
        background_scale: 1.0,
        text,
        border,
    }
}

fn compile(state: &FrameState, req: &StylingRequest) -> FramePlan {
    compile_frame(state, req, CANVAS, (512, 512), &mut MonospaceMeasure::default()).unwrap()
}

#[test]
fn background_only_when_nothing_else_is_visible() {
    let plan = compile(&state(None, None), &StylingRequest::new("hi"));
    assert_eq!(plan.frame, FrameIndex(3));
    assert_eq!(plan.ops.len(), 1);
    let DrawOp::Background(bg) = &plan.ops[0] else {
        panic!("expected background op");
    };
    assert_eq!(bg.source_rect, Rect::new(0.0, 0.0, 512.0, 512.0));
}

#[test]
fn ken_burns_scale_crops_about_the_center() {
    let mut s = state(None, None);
    s.background_scale = 2.0;
    let plan = compile(&s, &StylingRequest::new("hi"));
    let DrawOp::Background(bg) = &plan.ops[0] else {
        panic!("expected background op");
    };
    assert_eq!(bg.source_rect, Rect::new(128.0, 128.0, 384.0, 384.0));
}

#[test]
fn ops_are_ordered_background_text_border() {
    let text = TextAnimState::evaluate(TextAnimation::None, 1.0);
    let plan = compile(
        &state(Some(text), Some(BorderState::Strobe)),
        &StylingRequest::new("hi"),
    );
    assert!(matches!(plan.ops[0], DrawOp::Background(_)));
    assert!(matches!(plan.ops[1], DrawOp::Text(_)));
    assert!(matches!(plan.ops[2], DrawOp::Border(_)));
}

#[test]
fn text_op_carries_size_opacity_and_shadow() {
    let text = TextAnimState::evaluate(TextAnimation::ZoomIn, 0.5);
    let plan = compile(&state(Some(text), None), &StylingRequest::new("hello"));
    let DrawOp::Text(op) = &plan.ops[1] else {
        panic!("expected text op");
    };
    assert!((op.font_size - 90.0 * 0.9).abs() < 1e-9);
    assert_eq!(op.opacity, 0.5);
    assert_eq!(op.fill, Rgba8::WHITE);
    assert_eq!(op.shadow, Shadow::text_drop());
    assert_eq!(op.lines.len(), 1);
    assert_eq!(op.lines[0].text, "hello");
    assert_eq!(op.lines[0].anchor, Point::new(540.0, 540.0));
}

#[test]
fn long_caption_wraps_and_lines_are_spaced_by_unscaled_height() {
    // Monospace at 90px: 54px per char, so 972px (18 chars) is the limit.
    let req = StylingRequest::new("aaaa bbbb cccc dddd eeee ffff");
    let text = TextAnimState::evaluate(TextAnimation::None, 1.0);
    let plan = compile(&state(Some(text), None), &req);
    let DrawOp::Text(op) = &plan.ops[1] else {
        panic!("expected text op");
    };
    let joined: Vec<&str> = op
        .lines
        .iter()
        .flat_map(|l| l.text.split_whitespace())
        .collect();
    assert_eq!(joined, vec!["aaaa", "bbbb", "cccc", "dddd", "eeee", "ffff"]);
    assert_eq!(op.lines.len(), 2);
    assert!((op.lines[1].anchor.y - op.lines[0].anchor.y - 108.0).abs() < 1e-9);
}

#[test]
fn slide_in_offset_moves_every_line() {
    let req = StylingRequest::new("hi").with_layout(Layout::Top);
    let text = TextAnimState::evaluate(TextAnimation::SlideIn, 0.0);
    let plan = compile(&state(Some(text), None), &req);
    let DrawOp::Text(op) = &plan.ops[1] else {
        panic!("expected text op");
    };
    assert!((op.lines[0].anchor.y - (216.0 + 50.0)).abs() < 1e-9);
}

#[test]
fn border_is_inset_by_half_its_width() {
    let plan = compile(
        &state(None, Some(BorderState::neon(FrameIndex(0)))),
        &StylingRequest::new("hi"),
    );
    let DrawOp::Border(op) = &plan.ops[1] else {
        panic!("expected border op");
    };
    assert_eq!(op.rect, Rect::new(10.0, 10.0, 1070.0, 1070.0));
    assert_eq!(op.width, 20.0);
    assert_eq!(op.dashes, None);
    assert_eq!(op.glow.blur, 30.0);
    assert_eq!(op.glow.color, Rgba8::rgb(192, 132, 252));
}

#[test]
fn strobe_border_is_dashed_with_soft_white_glow() {
    let plan = compile(
        &state(None, Some(BorderState::Strobe)),
        &StylingRequest::new("hi"),
    );
    let DrawOp::Border(op) = &plan.ops[1] else {
        panic!("expected border op");
    };
    assert_eq!(op.dashes, Some([50.0, 25.0]));
    assert_eq!(op.color, Rgba8::WHITE);
    assert_eq!(op.glow.blur, 15.0);
    assert_eq!(op.glow.color, Rgba8::rgb_alpha(255, 255, 255, 0.7));
}

#[test]
fn rainbow_glow_matches_stroke() {
    let border = BorderState::Rainbow { hue: 120.0 };
    let plan = compile(&state(None, Some(border)), &StylingRequest::new("hi"));
    let DrawOp::Border(op) = &plan.ops[1] else {
        panic!("expected border op");
    };
    assert_eq!(op.color, op.glow.color);
    assert_eq!(op.glow.blur, 20.0);
}

#[test]
fn empty_image_is_rejected() {
    let err = compile_frame(
        &state(None, None),
        &StylingRequest::new("hi"),
        CANVAS,
        (0, 10),
        &mut MonospaceMeasure::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PromoError::Validation(_)));
}

#[test]
fn plan_serializes_to_json() {
    let text = TextAnimState::evaluate(TextAnimation::FadeIn, 1.0);
    let plan = compile(
        &state(Some(text), Some(BorderState::Strobe)),
        &StylingRequest::new("hi"),
    );
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["ops"][0]["op"], "background");
    assert_eq!(v["ops"][1]["op"], "text");
    assert_eq!(v["ops"][2]["op"], "border");
}
