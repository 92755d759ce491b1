use super::*;
use crate::style::options::TextAnimation;

fn timing() -> TimingPlan {
    TimingPlan::new(20, 1.0, 0.5, 2.0).unwrap()
}

#[test]
fn text_is_absent_before_pre_text_hold_elapses() {
    let req = StylingRequest::new("hello").with_text_animation(TextAnimation::FadeIn);
    let timing = timing();
    let ctx = EvalContext {
        request: &req,
        timing: &timing,
        zoom_factor: DEFAULT_ZOOM_FACTOR,
    };
    for f in 0..20 {
        let s = Evaluator::eval_frame(&ctx, FrameIndex(f)).unwrap();
        assert!(s.text.is_none());
        assert_eq!(s.phase, Phase::PreText);
    }
    let s = Evaluator::eval_frame(&ctx, FrameIndex(20)).unwrap();
    assert_eq!(s.text.unwrap().opacity, 0.0);
    let s = Evaluator::eval_frame(&ctx, FrameIndex(69)).unwrap();
    assert_eq!(s.text.unwrap().opacity, 1.0);
}

#[test]
fn out_of_range_frame_is_an_error() {
    let req = StylingRequest::new("hello");
    let timing = timing();
    let ctx = EvalContext {
        request: &req,
        timing: &timing,
        zoom_factor: DEFAULT_ZOOM_FACTOR,
    };
    assert!(Evaluator::eval_frame(&ctx, FrameIndex(70)).is_err());
}

#[test]
fn strobe_is_lit_on_frames_two_and_three_of_four() {
    let lit: Vec<u64> = (0..20)
        .filter(|f| BorderState::strobe_visible(FrameIndex(*f)))
        .collect();
    assert_eq!(lit, vec![2, 3, 6, 7, 10, 11, 14, 15, 18, 19]);
}

#[test]
fn rainbow_completes_one_cycle_per_loop() {
    let BorderState::Rainbow { hue } = BorderState::rainbow(FrameIndex(0), 70) else {
        panic!("expected rainbow");
    };
    assert_eq!(hue, 0.0);
    let BorderState::Rainbow { hue } = BorderState::rainbow(FrameIndex(70), 70) else {
        panic!("expected rainbow");
    };
    assert!(hue.abs() < 1e-9 || (hue - 360.0).abs() < 1e-9);
    let BorderState::Rainbow { hue } = BorderState::rainbow(FrameIndex(35), 70) else {
        panic!("expected rainbow");
    };
    assert!((hue - 180.0).abs() < 1e-9);
}

#[test]
fn neon_alpha_oscillates_within_bounds() {
    for f in 0..200 {
        let BorderState::Neon { alpha } = BorderState::neon(FrameIndex(f)) else {
            panic!("expected neon");
        };
        assert!((0.4 - 1e-9..=1.0 + 1e-9).contains(&alpha));
    }
    assert_eq!(BorderState::neon(FrameIndex(0)), BorderState::Neon { alpha: 0.7 });
}

#[test]
fn ken_burns_only_when_selected() {
    let timing = timing();
    let plain = StylingRequest::new("x");
    let zoom = StylingRequest::new("x").with_background_effect(BackgroundEffect::KenBurns);
    let last = FrameIndex(69);
    let a = Evaluator::eval_frame(
        &EvalContext {
            request: &plain,
            timing: &timing,
            zoom_factor: 1.1,
        },
        last,
    )
    .unwrap();
    let b = Evaluator::eval_frame(
        &EvalContext {
            request: &zoom,
            timing: &timing,
            zoom_factor: 1.1,
        },
        last,
    )
    .unwrap();
    assert_eq!(a.background_scale, 1.0);
    assert!((b.background_scale - 1.1).abs() < 1e-12);
}

#[test]
fn rainbow_color_is_pastel_red_at_zero() {
    assert_eq!(rainbow_color(0.0), Rgba8::rgb(255, 51, 51));
}
