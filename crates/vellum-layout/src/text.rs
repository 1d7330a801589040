//! Estimated text metrics.
//!
//! Stands in for real shaping: glyph advances are approximated from the
//! font size, which is enough for layout to reserve space for labels.

/// Font settings used for measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in pixels
    pub font_size: f64,
    /// Line height as a multiple of the font size
    pub line_height: f64,
    /// Extra space after every glyph, in pixels
    pub letter_spacing: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Default::default()
        }
    }

    pub(crate) fn advance(&self) -> f64 {
        self.font_size * 0.55 + self.letter_spacing
    }

    fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Distance from the top of a line box to its baseline.
    pub fn ascent(&self) -> f64 {
        self.font_size * 0.8
    }
}

/// Measured extent of a block of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    /// Baseline of the first line, from the top
    pub baseline: f64,
    pub lines: u32,
}

/// Break text into lines.
///
/// Explicit newlines always break. With `max_width`, words that would
/// overflow the line start a new one; a single overlong word stays whole.
pub fn break_lines(text: &str, style: &TextStyle, max_width: Option<f64>) -> Vec<String> {
    let advance = style.advance();
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let Some(limit) = max_width.filter(|w| *w > 0.0) else {
            lines.push(paragraph.to_string());
            continue;
        };

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = (current.chars().count() + 1 + word.chars().count()) as f64 * advance;
            if candidate <= limit {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    lines
}

/// Measure text with the given style.
pub fn measure_text(text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics {
    let lines = break_lines(text, style, max_width);
    let advance = style.advance();
    let width = lines
        .iter()
        .map(|line| line.chars().count() as f64 * advance)
        .fold(0.0_f64, f64::max);
    let count = lines.len().max(1) as u32;

    TextMetrics {
        width,
        height: count as f64 * style.line_advance(),
        baseline: style.ascent(),
        lines: count,
    }
}

/// Baseline offsets of each line, from the top of the text block.
pub fn baselines(style: &TextStyle, lines: usize) -> impl Iterator<Item = f64> + '_ {
    (0..lines).map(move |i| style.ascent() + i as f64 * style.line_advance())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_text() {
        let metrics = measure_text("", &TextStyle::default(), None);
        assert_eq!(metrics.width, 0.0);
        assert_eq!(metrics.lines, 1);
        assert!(metrics.height > 0.0);
    }

    #[test]
    fn test_measure_single_line() {
        let style = TextStyle::sized(20.0);
        let metrics = measure_text("Hello", &style, None);
        assert!((metrics.width - 5.0 * 11.0).abs() < 1e-9);
        assert!((metrics.height - 24.0).abs() < 1e-9);
        assert!((metrics.baseline - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_newlines() {
        let style = TextStyle::default();
        let metrics = measure_text("one\nthree", &style, None);
        assert_eq!(metrics.lines, 2);
        assert!((metrics.width - 5.0 * style.advance()).abs() < 1e-9);
    }

    #[test]
    fn test_wrapping() {
        let style = TextStyle::sized(10.0);
        let lines = break_lines("alpha beta gamma delta", &style, Some(60.0));
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() as f64 * style.advance() <= 60.0);
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn test_baselines() {
        let style = TextStyle::sized(10.0);
        let offsets: Vec<f64> = baselines(&style, 3).collect();
        assert_eq!(offsets.len(), 3);
        assert!((offsets[0] - 8.0).abs() < 1e-9);
        assert!((offsets[2] - 32.0).abs() < 1e-9);
    }
}
