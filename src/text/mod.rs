//! # Text Layout
//!
//! Greedy line breaking against a width limit.
//!
//! Break opportunities come from UAX#14, so lines end after spaces and hyphens
//! and at explicit newlines. A word wider than the whole line is split between
//! characters instead of overflowing. Widths are measured with the real
//! Helvetica advances from the `FontContext`.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::FontContext;
use crate::style::FontSpec;

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The line's text with trailing whitespace removed.
    pub text: String,
    /// Width of `text` in millimetres.
    pub width: f64,
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Always returns at least one line; an empty string yields one empty line.
    pub fn break_into_lines(
        &self,
        fonts: &FontContext,
        text: &str,
        max_width: f64,
        font: &FontSpec,
    ) -> Vec<BrokenLine> {
        self.break_hanging(fonts, text, max_width, max_width, font)
    }

    /// Like `break_into_lines`, but the first line gets its own width limit.
    /// Used when a label sits in front of the first line only.
    pub fn break_hanging(
        &self,
        fonts: &FontContext,
        text: &str,
        first_width: f64,
        rest_width: f64,
        font: &FontSpec,
    ) -> Vec<BrokenLine> {
        let mut lines: Vec<BrokenLine> = Vec::new();
        if text.is_empty() {
            lines.push(BrokenLine {
                text: String::new(),
                width: 0.0,
            });
            return lines;
        }

        let width_of = |s: &str| fonts.text_width(s.trim_end(), font);
        let mut current = String::new();
        let mut start = 0;

        for (end, opportunity) in linebreaks(text) {
            let segment: String = text[start..end].chars().filter(|c| !is_newline(*c)).collect();
            start = end;

            let limit = if lines.is_empty() { first_width } else { rest_width };
            if !current.is_empty() && width_of(&format!("{}{}", current, segment)) > limit {
                lines.push(self.make_line(fonts, &current, font));
                current.clear();
            }

            let mut segment = segment.as_str();
            if current.is_empty() {
                // Split words that cannot fit even on an empty line.
                loop {
                    let limit = if lines.is_empty() { first_width } else { rest_width };
                    if width_of(segment) <= limit {
                        break;
                    }
                    let split = self.fitting_prefix(fonts, segment, limit, font);
                    if split >= segment.trim_end().len() {
                        break;
                    }
                    lines.push(self.make_line(fonts, &segment[..split], font));
                    segment = &segment[split..];
                }
            }
            current.push_str(segment);

            if opportunity == BreakOpportunity::Mandatory && end < text.len() {
                lines.push(self.make_line(fonts, &current, font));
                current.clear();
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(self.make_line(fonts, &current, font));
        }

        lines
    }

    /// Width of `text` in millimetres.
    pub fn measure_width(&self, fonts: &FontContext, text: &str, font: &FontSpec) -> f64 {
        fonts.text_width(text, font)
    }

    fn make_line(&self, fonts: &FontContext, text: &str, font: &FontSpec) -> BrokenLine {
        let text = text.trim_end().to_string();
        let width = fonts.text_width(&text, font);
        BrokenLine { text, width }
    }

    /// Byte length of the longest prefix of `segment` that fits in `limit`,
    /// never less than one character.
    fn fitting_prefix(
        &self,
        fonts: &FontContext,
        segment: &str,
        limit: f64,
        font: &FontSpec,
    ) -> usize {
        let mut width = 0.0;
        let mut end = 0;
        for (idx, ch) in segment.char_indices() {
            let mut buf = [0u8; 4];
            width += fonts.text_width(ch.encode_utf8(&mut buf), font);
            if width > limit && idx > 0 {
                return idx;
            }
            end = idx + ch.len_utf8();
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, FontWeight};

    fn body() -> FontSpec {
        FontSpec::new(9.5, FontWeight::Normal, Color::BLACK)
    }

    fn lines(text: &str, width: f64) -> Vec<String> {
        TextLayout::new()
            .break_into_lines(&FontContext::new(), text, width, &body())
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(lines("Hello, World!", 180.0), vec!["Hello, World!"]);
    }

    #[test]
    fn empty_string_yields_one_empty_line() {
        let result = TextLayout::new().break_into_lines(&FontContext::new(), "", 180.0, &body());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "");
        assert_eq!(result[0].width, 0.0);
    }

    #[test]
    fn breaks_at_spaces_and_respects_width() {
        let text = "Designed and shipped a streaming ingestion pipeline processing forty \
                    million events per day with exactly once delivery guarantees";
        let fonts = FontContext::new();
        let result = TextLayout::new().break_into_lines(&fonts, text, 60.0, &body());
        assert!(result.len() >= 3, "expected wrapping, got {:?}", result);
        for line in &result {
            assert!(line.width <= 60.0 + 1e-9, "line too wide: {:?}", line);
            assert!(!line.text.ends_with(' '));
        }
        let rejoined: Vec<&str> = result.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            rejoined.join(" ").split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn explicit_newline_forces_break() {
        assert_eq!(lines("first\nsecond", 180.0), vec!["first", "second"]);
    }

    #[test]
    fn overlong_word_is_split() {
        let word = "x".repeat(200);
        let result = lines(&word, 20.0);
        assert!(result.len() > 1);
        assert_eq!(result.concat(), word);
    }

    #[test]
    fn hanging_first_line_is_narrower() {
        let fonts = FontContext::new();
        let text = "Rust, Go, Python, TypeScript, Kubernetes, Terraform, PostgreSQL, Redis";
        let result = TextLayout::new().break_hanging(&fonts, text, 30.0, 100.0, &body());
        assert!(result[0].width <= 30.0);
        assert!(result.len() >= 2);
        assert!(result[1].width > 30.0);
    }
}
