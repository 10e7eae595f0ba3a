//! # Layout Configuration
//!
//! Static page geometry, per-role fonts, spacing and colors. Every renderer
//! reads from one `LayoutConfig`; nothing in here changes during an export.
//!
//! All lengths are millimetres measured from the top-left corner of the page.
//! Font sizes are in points, matching how every PDF consumer talks about them.
//! `LayoutConfig::default()` is the fixed resume geometry: a 210 × 300 page,
//! 10/15/0/15 margins, 20pt bold name, 9.5pt body text, 1.2 line height.

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Millimetres per typographic point.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal anchoring of a line relative to the x passed to the renderer.
///
/// `Center` and `Right` treat x as the line's center / right edge. Each line
/// of a wrapped block is aligned on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// An RGB color with 0.0 - 1.0 components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 0-255 channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// `#rrggbb` form, used by the Word export stylesheet.
    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Edge values (top, right, bottom, left) used for page margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Size, weight and color for one text role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font size in points.
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub color: Color,
}

impl FontSpec {
    pub fn new(size: f64, weight: FontWeight, color: Color) -> Self {
        Self {
            size,
            weight,
            color,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

/// The font table, one entry per role a resume uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontRoles {
    pub name: FontSpec,
    pub contact: FontSpec,
    pub section_title: FontSpec,
    pub job_title: FontSpec,
    pub company: FontSpec,
    pub year: FontSpec,
    pub body: FontSpec,
    pub link: FontSpec,
    pub footer: FontSpec,
}

impl Default for FontRoles {
    fn default() -> Self {
        let ink = Color::BLACK;
        let muted = Color::rgb8(64, 64, 64);
        Self {
            name: FontSpec::new(20.0, FontWeight::Bold, ink),
            contact: FontSpec::new(9.0, FontWeight::Normal, muted),
            section_title: FontSpec::new(10.0, FontWeight::Bold, ink),
            job_title: FontSpec::new(9.5, FontWeight::Bold, ink),
            company: FontSpec::new(9.5, FontWeight::Normal, muted),
            year: FontSpec::new(9.5, FontWeight::Normal, muted),
            body: FontSpec::new(9.5, FontWeight::Normal, ink),
            link: FontSpec::new(9.0, FontWeight::Normal, Color::rgb8(0, 70, 160)),
            footer: FontSpec::new(8.0, FontWeight::Normal, Color::rgb8(120, 120, 120)),
        }
    }
}

/// Vertical and horizontal spacing constants, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    /// Distance from the top margin to the name's baseline.
    pub name_offset: f64,
    /// Gap inserted before every section title.
    pub section: f64,
    /// Gap between entries of a list section (jobs, degrees, projects).
    pub entry: f64,
    /// Gap between bullets of one entry, and between skill lines.
    pub bullet: f64,
    /// Left indent of bullet text.
    pub bullet_indent: f64,
    /// Left offset of the bullet glyph itself.
    pub bullet_marker: f64,
    /// Rule position below a section title's baseline.
    pub title_rule_offset: f64,
    /// Gap after a section title's rule.
    pub after_title_rule: f64,
    /// Gap after the header separator.
    pub after_header_rule: f64,
    /// Minimum gap between a left header and its right-aligned label.
    pub label_gap: f64,
    /// Distance from the page bottom to the page-number baseline.
    pub footer_offset: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            name_offset: 8.0,
            section: 4.0,
            entry: 3.0,
            bullet: 0.8,
            bullet_indent: 4.0,
            bullet_marker: 1.2,
            title_rule_offset: 1.5,
            after_title_rule: 1.0,
            after_header_rule: 2.0,
            label_gap: 4.0,
            footer_offset: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Colors {
    pub rule: Color,
    pub header_rule: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            rule: Color::rgb8(150, 150, 150),
            header_rule: Color::rgb8(90, 90, 90),
        }
    }
}

/// How a bullet list may cross a page boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletListBreak {
    /// Each bullet is checked on its own; a list may continue on the next page.
    #[default]
    BetweenBullets,
    /// A list that fits on a fresh page is moved there as a unit.
    KeepTogether,
}

/// Where page numbers go on multi-page documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageNumbering {
    /// Centered `Page X of N` on every page, stamped after layout.
    #[default]
    Footer,
    /// `Page X` in the bottom-right corner, stamped as each page is left.
    Corner,
}

/// Immutable page geometry for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: Edges,
    pub fonts: FontRoles,
    pub spacing: Spacing,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Stroke width of horizontal rules.
    pub rule_thickness: f64,
    pub colors: Colors,
    pub bullet_list_break: BulletListBreak,
    pub page_numbering: PageNumbering,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 300.0,
            margin: Edges::new(10.0, 15.0, 0.0, 15.0),
            fonts: FontRoles::default(),
            spacing: Spacing::default(),
            line_height: 1.2,
            rule_thickness: 0.3,
            colors: Colors::default(),
            bullet_list_break: BulletListBreak::default(),
            page_numbering: PageNumbering::default(),
        }
    }
}

impl LayoutConfig {
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin.horizontal()
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - self.margin.vertical()
    }

    /// Lowest y a block may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.page_height - self.margin.bottom
    }

    pub fn left(&self) -> f64 {
        self.margin.left
    }

    /// Right edge of the content area.
    pub fn right(&self) -> f64 {
        self.page_width - self.margin.right
    }

    pub fn center_x(&self) -> f64 {
        self.margin.left + self.content_width() / 2.0
    }

    /// Height of one line of text at `font_size` points, in millimetres.
    pub fn line_height_for(&self, font_size: f64) -> f64 {
        font_size * self.line_height * PT_TO_MM
    }

    /// Reject geometry that would leave no room to draw.
    pub fn validate(&self) -> Result<(), FolioError> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(FolioError::InvalidInput(
                "page dimensions must be positive".to_string(),
            ));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(FolioError::InvalidInput(
                "margins leave no content area".to_string(),
            ));
        }
        if self.line_height <= 0.0 {
            return Err(FolioError::InvalidInput(
                "line height multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) configuration override from JSON.
    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_resume_page() {
        let config = LayoutConfig::default();
        assert_eq!(config.page_width, 210.0);
        assert_eq!(config.page_height, 300.0);
        assert_eq!(config.margin, Edges::new(10.0, 15.0, 0.0, 15.0));
        assert_eq!(config.content_width(), 180.0);
        assert_eq!(config.content_height(), 290.0);
        assert_eq!(config.bottom_limit(), 300.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_font_table() {
        let fonts = FontRoles::default();
        assert_eq!(fonts.name.size, 20.0);
        assert!(fonts.name.is_bold());
        assert_eq!(fonts.contact.size, 9.0);
        assert!(!fonts.contact.is_bold());
        assert_eq!(fonts.section_title.size, 10.0);
        assert!(fonts.section_title.is_bold());
        assert_eq!(fonts.job_title.size, 9.5);
        assert!(fonts.job_title.is_bold());
        assert_eq!(fonts.body.size, 9.5);
        assert!(!fonts.body.is_bold());
    }

    #[test]
    fn line_height_converts_points_to_mm() {
        let config = LayoutConfig::default();
        let lh = config.line_height_for(10.0);
        assert!((lh - 10.0 * 1.2 * 25.4 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config = LayoutConfig::from_json(r#"{ "pageNumbering": "Corner" }"#).unwrap();
        assert_eq!(config.page_numbering, PageNumbering::Corner);
        assert_eq!(config.page_width, 210.0);
        assert_eq!(config.fonts.body.size, 9.5);
    }

    #[test]
    fn margins_wider_than_page_are_rejected() {
        let json = r#"{ "margin": { "top": 10, "right": 120, "bottom": 0, "left": 120 } }"#;
        assert!(LayoutConfig::from_json(json).is_err());
    }

    #[test]
    fn color_hex_round_trip() {
        assert_eq!(Color::rgb8(0, 70, 160).to_hex(), "#0046a0");
        assert_eq!(Color::BLACK.to_hex(), "#000000");
    }
}
