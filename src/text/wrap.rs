use crate::foundation::error::PromoResult;

/// Share of the surface width a caption line may occupy.
pub const MAX_LINE_WIDTH_RATIO: f64 = 0.9;

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    /// Width in pixels of `text` set in `font` at `size_px`, bold.
    fn measure_text(&mut self, font: &str, text: &str, size_px: f32) -> PromoResult<f32>;
}

/// Greedy word wrap.
///
/// Words (split on whitespace) accumulate on a line until appending the next one would make the
/// line wider than `max_width`; the line is then committed and the next line starts with that
/// word. The final partial line is always emitted, and a single word wider than `max_width`
/// stays on its own line unsplit.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    mut measure: impl FnMut(&str) -> PromoResult<f32>,
) -> PromoResult<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate)? > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    lines.push(current);
    Ok(lines)
}

/// Fixed-advance measurer: every char is `advance_em * size_px` wide.
///
/// Used where real glyph metrics are not needed (planning dumps, tests).
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasure {
    /// Advance of one char as a fraction of the font size.
    pub advance_em: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_text(&mut self, _font: &str, text: &str, size_px: f32) -> PromoResult<f32> {
        Ok(text.chars().count() as f32 * self.advance_em * size_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
