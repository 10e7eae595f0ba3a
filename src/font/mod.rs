//! # Font Management
//!
//! Resolving text roles to fonts, and measuring strings with real glyph
//! advances. Resumes are set in the standard PDF Helvetica family, which every
//! viewer ships, so nothing is embedded.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::style::{FontSpec, FontWeight, PT_TO_MM};

/// The standard PDF fonts the exporter draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Shared font context used by layout and PDF serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontContext;

impl FontContext {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, weight: FontWeight) -> StandardFont {
        match weight {
            FontWeight::Normal => StandardFont::Helvetica,
            FontWeight::Bold => StandardFont::HelveticaBold,
        }
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, weight: FontWeight, font_size: f64) -> f64 {
        self.resolve(weight)
            .metrics()
            .measure_string(text, font_size, 0.0)
    }

    /// Width of a string set in `font`, in millimetres.
    pub fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        self.measure_string(text, font.weight, font.size) * PT_TO_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn weight_resolution() {
        let ctx = FontContext::new();
        assert_eq!(ctx.resolve(FontWeight::Normal), StandardFont::Helvetica);
        assert_eq!(ctx.resolve(FontWeight::Bold).pdf_name(), "Helvetica-Bold");
    }

    #[test]
    fn text_width_in_millimetres() {
        let ctx = FontContext::new();
        let font = FontSpec::new(10.0, FontWeight::Normal, Color::BLACK);
        // "Rust" = 722 + 556 + 500 + 278 = 2056 / 1000 em
        let expected = 20.56 * PT_TO_MM;
        assert!((ctx.text_width("Rust", &font) - expected).abs() < 1e-9);
        assert_eq!(ctx.text_width("", &font), 0.0);
    }
}
