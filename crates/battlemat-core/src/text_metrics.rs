//! Deterministic text measurement for sizing text bubbles.

use kurbo::Size;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Measures rendered text.
///
/// The board only needs a stable width/height for a fixed font, so a
/// renderer with real font metrics can plug its own measurer in.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// Advance-width table approximating a proportional sans-serif font.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl ApproximateMeasurer {
    /// Advance width of a character, as a fraction of the font size.
    fn advance(c: char) -> f64 {
        match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
            ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' => 0.35,
            'm' | 'w' => 0.85,
            'M' | 'W' => 0.95,
            c if c.is_ascii_uppercase() => 0.68,
            c if c.is_ascii_digit() => 0.56,
            c if c.is_ascii() => 0.52,
            // CJK and other wide glyphs
            _ => 1.0,
        }
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let mut lines = 0usize;
        let mut widest: f64 = 0.0;
        for line in text.split('\n') {
            lines += 1;
            let width: f64 = line.chars().map(Self::advance).sum::<f64>() * font_size;
            widest = widest.max(width);
        }
        Size::new(widest, lines as f64 * font_size * LINE_HEIGHT)
    }
}

/// Measure text with the default measurer.
pub fn measure_text(text: &str, font_size: f64) -> Size {
    ApproximateMeasurer.measure(text, font_size)
}
