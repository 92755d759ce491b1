use proptest::prelude::*;

use super::*;

fn char_width(s: &str) -> PromoResult<f32> {
    Ok(s.chars().count() as f32)
}

#[test]
fn short_text_stays_on_one_line() {
    let lines = wrap_words("hello world", 20.0, char_width).unwrap();
    assert_eq!(lines, vec!["hello world"]);
}

#[test]
fn breaks_before_the_word_that_overflows() {
    let lines = wrap_words("aaa bbb ccc ddd", 7.0, char_width).unwrap();
    assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
}

#[test]
fn exact_fit_does_not_break() {
    let lines = wrap_words("ab cd", 5.0, char_width).unwrap();
    assert_eq!(lines, vec!["ab cd"]);
}

#[test]
fn long_single_word_is_not_split() {
    let lines = wrap_words("tiny supercalifragilistic end", 6.0, char_width).unwrap();
    assert_eq!(lines, vec!["tiny", "supercalifragilistic", "end"]);
}

#[test]
fn repeated_whitespace_is_collapsed() {
    let lines = wrap_words("  이번   주 특선\t메뉴! ", 100.0, char_width).unwrap();
    assert_eq!(lines, vec!["이번 주 특선 메뉴!"]);
}

#[test]
fn empty_text_emits_one_empty_line() {
    let lines = wrap_words("", 10.0, char_width).unwrap();
    assert_eq!(lines, vec![String::new()]);
}

#[test]
fn measure_errors_propagate() {
    let err = wrap_words("a b", 10.0, |_| {
        Err(crate::foundation::error::PromoError::evaluation("no font"))
    })
    .unwrap_err();
    assert!(err.to_string().contains("no font"));
}

#[test]
fn monospace_measure_scales_with_size() {
    let mut m = MonospaceMeasure { advance_em: 0.5 };
    assert_eq!(m.measure_text("any", "abcd", 10.0).unwrap(), 20.0);
}

proptest! {
    #[test]
    fn wrapping_preserves_words_and_respects_width(
        words in proptest::collection::vec("[a-z가-힣]{1,12}", 0..30),
        max_width in 1.0f32..40.0,
    ) {
        let text = words.join(" ");
        let lines = wrap_words(&text, max_width, char_width).unwrap();

        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        prop_assert_eq!(rejoined, original);

        for line in &lines {
            let single_word = line.split_whitespace().count() <= 1;
            prop_assert!(single_word || char_width(line).unwrap() <= max_width);
        }
    }
}
