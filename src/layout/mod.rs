//! # Layout Engine
//!
//! Turns a resume record into positioned elements on fixed-size pages.
//!
//! Layout is a single top-to-bottom pass. A `PageCursor` tracks the current
//! page and the y position where the next block goes. Before a block is drawn
//! its full height is measured; if it does not fit above the bottom margin the
//! page is broken first, so a block never straddles two pages. There is no
//! backtracking: once a page is left it is only revisited by the final
//! page-numbering pass.
//!
//! Coordinates are millimetres from the top-left of the page. For text, `y` is
//! the baseline of the line.

pub mod compose;
pub mod page_break;
pub mod sections;

pub use compose::layout_resume;

use crate::font::FontContext;
use crate::style::{Color, FontSpec, LayoutConfig, PageNumbering, TextAlign};
use crate::text::{BrokenLine, TextLayout};

/// A fully laid-out page ready for serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    /// 1-based page number.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    fn new(number: usize, config: &LayoutConfig) -> Self {
        Self {
            number,
            width: config.page_width,
            height: config.page_height,
            elements: Vec::new(),
        }
    }

    /// Text of every text element, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.elements.iter().filter_map(LayoutElement::text).collect()
    }

    /// First text element whose text equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&LayoutElement> {
        self.elements.iter().find(|e| e.text() == Some(text))
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn rules(&self) -> impl Iterator<Item = &LayoutElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e.draw, DrawCommand::Rule { .. }))
    }
}

/// A positioned element on a page.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Left edge of the element.
    pub x: f64,
    /// Baseline for text, stroke center for rules.
    pub y: f64,
    pub width: f64,
    /// Line height for text, stroke thickness for rules.
    pub height: f64,
    pub draw: DrawCommand,
    /// Optional hyperlink URL for link annotations.
    pub href: Option<String>,
}

impl LayoutElement {
    pub fn text(&self) -> Option<&str> {
        match &self.draw {
            DrawCommand::Text { text, .. } => Some(text),
            DrawCommand::Rule { .. } => None,
        }
    }
}

/// What to draw for a layout element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// One line of text.
    Text { text: String, font: FontSpec },
    /// A horizontal rule spanning the element's width.
    Rule { thickness: f64, color: Color },
}

/// Current page and vertical write position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    /// 1-based index of the page being written.
    pub page_index: usize,
    /// Next baseline, in millimetres from the top of the page.
    pub y: f64,
}

impl PageCursor {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            page_index: 1,
            y: config.margin.top,
        }
    }

    /// True iff a block of `height` fits above the bottom margin.
    pub fn has_space(&self, height: f64, config: &LayoutConfig) -> bool {
        self.y + height <= config.bottom_limit()
    }

    pub fn remaining_height(&self, config: &LayoutConfig) -> f64 {
        (config.bottom_limit() - self.y).max(0.0)
    }

    /// Move down the page. Negative distances are ignored; y never decreases
    /// within a page.
    pub fn advance(&mut self, distance: f64) {
        if distance > 0.0 {
            self.y += distance;
        }
    }

    pub fn next_page(&mut self, config: &LayoutConfig) {
        self.page_index += 1;
        self.y = config.margin.top;
    }

    fn at_page_top(&self, config: &LayoutConfig) -> bool {
        self.y <= config.margin.top
    }
}

/// Options for a wrapped text block.
#[derive(Debug, Clone)]
pub struct TextOptions<'t> {
    pub font: FontSpec,
    pub max_width: f64,
    pub align: TextAlign,
    pub href: Option<&'t str>,
}

impl<'t> TextOptions<'t> {
    pub fn new(font: FontSpec, max_width: f64) -> Self {
        Self {
            font,
            max_width,
            align: TextAlign::Left,
            href: None,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn href(mut self, href: &'t str) -> Self {
        self.href = Some(href);
        self
    }
}

/// Owns the cursor and the pages for one export. Renderers draw through it.
pub struct LayoutContext<'a> {
    config: &'a LayoutConfig,
    fonts: &'a FontContext,
    text_layout: TextLayout,
    cursor: PageCursor,
    pages: Vec<LayoutPage>,
    /// Total vertical distance advanced, across all pages.
    consumed: f64,
}

impl<'a> LayoutContext<'a> {
    pub fn new(config: &'a LayoutConfig, fonts: &'a FontContext) -> Self {
        let cursor = PageCursor::new(config);
        Self {
            config,
            fonts,
            text_layout: TextLayout::new(),
            cursor,
            pages: vec![LayoutPage::new(cursor.page_index, config)],
            consumed: 0.0,
        }
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn consumed(&self) -> f64 {
        self.consumed
    }

    pub fn has_space(&self, height: f64) -> bool {
        self.cursor.has_space(height, self.config)
    }

    pub fn remaining_height(&self) -> f64 {
        self.cursor.remaining_height(self.config)
    }

    /// Height available on an empty page.
    pub fn fresh_page_height(&self) -> f64 {
        self.config.bottom_limit() - self.config.margin.top
    }

    /// Break the page if `height` does not fit. A page with nothing on it yet
    /// is never broken, since the next one would be no roomier.
    /// Returns whether a break happened.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if self.has_space(height) || self.cursor.at_page_top(self.config) {
            return false;
        }
        self.break_page();
        true
    }

    /// Leave the current page and start a new one.
    ///
    /// Unconditional: callers check `has_space` first.
    pub fn break_page(&mut self) {
        if self.config.page_numbering == PageNumbering::Corner {
            self.stamp_corner_label(self.pages.len() - 1);
        }
        log::debug!(
            "page break: leaving page {} at y={:.2}mm",
            self.cursor.page_index,
            self.cursor.y
        );
        self.cursor.next_page(self.config);
        self.pages
            .push(LayoutPage::new(self.cursor.page_index, self.config));
    }

    pub fn advance(&mut self, distance: f64) {
        if distance > 0.0 {
            self.cursor.advance(distance);
            self.consumed += distance;
        }
    }

    pub fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        self.text_layout.measure_width(self.fonts, text, font)
    }

    /// Height `text` would take when wrapped to `max_width`.
    pub fn block_height(&self, text: &str, font: &FontSpec, max_width: f64) -> f64 {
        let lines = self
            .text_layout
            .break_into_lines(self.fonts, text, max_width, font);
        lines.len() as f64 * self.config.line_height_for(font.size)
    }

    /// Wrap and draw a text block at the cursor, breaking the page first if
    /// the whole block does not fit. Returns the height consumed.
    pub fn draw_text(&mut self, text: &str, x: f64, options: &TextOptions) -> f64 {
        self.draw_block(text, x, options).1
    }

    /// `draw_text`, also returning the first line's baseline as
    /// `(baseline, height)`.
    pub fn draw_block(&mut self, text: &str, x: f64, options: &TextOptions) -> (f64, f64) {
        let lines =
            self.text_layout
                .break_into_lines(self.fonts, text, options.max_width, &options.font);
        let line_height = self.config.line_height_for(options.font.size);
        let total = lines.len() as f64 * line_height;

        self.ensure_space(total);

        let top = self.cursor.y;
        for (i, line) in lines.iter().enumerate() {
            self.push_line(
                line,
                x,
                top + i as f64 * line_height,
                line_height,
                options,
            );
        }

        self.advance(total);
        (top, total)
    }

    /// Draw a bullet item: text indented by the bullet indent, with the
    /// bullet glyph on its first line.
    pub fn draw_bullet(&mut self, text: &str, font: &FontSpec) -> f64 {
        let config = self.config;
        let spacing = &config.spacing;
        let left = config.left();
        let options = TextOptions::new(*font, config.content_width() - spacing.bullet_indent);
        let (first_baseline, height) =
            self.draw_block(text, left + spacing.bullet_indent, &options);
        self.place_text(
            "\u{2022}",
            left + spacing.bullet_marker,
            first_baseline,
            font,
            TextAlign::Left,
            None,
        );
        height
    }

    /// Draw `label` followed by `text` on the same line. Continuation lines
    /// start at the left margin, not under the text.
    pub fn draw_hanging(
        &mut self,
        label: &str,
        label_font: &FontSpec,
        text: &str,
        text_font: &FontSpec,
    ) -> f64 {
        let left = self.config.left();
        let content_width = self.config.content_width();
        let label_width = self.text_width(label, label_font);
        let lines = self.text_layout.break_hanging(
            self.fonts,
            text,
            (content_width - label_width).max(0.0),
            content_width,
            text_font,
        );
        let line_height = self
            .config
            .line_height_for(label_font.size.max(text_font.size));
        let total = lines.len() as f64 * line_height;

        self.ensure_space(total);

        let top = self.cursor.y;
        self.place_text(label.trim_end(), left, top, label_font, TextAlign::Left, None);
        let options = TextOptions::new(*text_font, content_width);
        for (i, line) in lines.iter().enumerate() {
            let x = if i == 0 { left + label_width } else { left };
            self.push_line(line, x, top + i as f64 * line_height, line_height, &options);
        }

        self.advance(total);
        total
    }

    /// Place a single unwrapped line at an explicit baseline, without moving
    /// the cursor.
    pub fn place_text(
        &mut self,
        text: &str,
        x: f64,
        baseline: f64,
        font: &FontSpec,
        align: TextAlign,
        href: Option<&str>,
    ) {
        let element = self.text_element(text, x, baseline, font, align, href);
        self.push(element);
    }

    /// Full-width horizontal rule at `y`. Does not move the cursor.
    pub fn draw_rule(&mut self, y: f64, color: Color) {
        let element = LayoutElement {
            x: self.config.left(),
            y,
            width: self.config.content_width(),
            height: self.config.rule_thickness,
            draw: DrawCommand::Rule {
                thickness: self.config.rule_thickness,
                color,
            },
            href: None,
        };
        self.push(element);
    }

    /// Stamp page numbers and hand back the pages.
    ///
    /// Labels are only added when the document runs over one page.
    pub fn finish(mut self) -> Vec<LayoutPage> {
        let total = self.pages.len();
        if total > 1 {
            match self.config.page_numbering {
                PageNumbering::Footer => {
                    let font = self.config.fonts.footer;
                    let x = self.config.center_x();
                    let baseline = self.config.page_height - self.config.spacing.footer_offset;
                    for index in 0..total {
                        let label = format!("Page {} of {}", index + 1, total);
                        let element =
                            self.text_element(&label, x, baseline, &font, TextAlign::Center, None);
                        self.pages[index].elements.push(element);
                    }
                }
                PageNumbering::Corner => self.stamp_corner_label(total - 1),
            }
        }
        self.pages
    }

    fn stamp_corner_label(&mut self, index: usize) {
        let font = self.config.fonts.footer;
        let baseline = self.config.page_height - self.config.spacing.footer_offset;
        let label = format!("Page {}", index + 1);
        let element = self.text_element(
            &label,
            self.config.right(),
            baseline,
            &font,
            TextAlign::Right,
            None,
        );
        if let Some(page) = self.pages.get_mut(index) {
            page.elements.push(element);
        }
    }

    fn push_line(
        &mut self,
        line: &BrokenLine,
        x: f64,
        baseline: f64,
        line_height: f64,
        options: &TextOptions,
    ) {
        if line.text.is_empty() {
            return;
        }
        let element = LayoutElement {
            x: aligned_x(x, line.width, options.align),
            y: baseline,
            width: line.width,
            height: line_height,
            draw: DrawCommand::Text {
                text: line.text.clone(),
                font: options.font,
            },
            href: options.href.map(str::to_string),
        };
        self.push(element);
    }

    fn text_element(
        &self,
        text: &str,
        x: f64,
        baseline: f64,
        font: &FontSpec,
        align: TextAlign,
        href: Option<&str>,
    ) -> LayoutElement {
        let width = self.text_width(text, font);
        LayoutElement {
            x: aligned_x(x, width, align),
            y: baseline,
            width,
            height: self.config.line_height_for(font.size),
            draw: DrawCommand::Text {
                text: text.to_string(),
                font: *font,
            },
            href: href.map(str::to_string),
        }
    }

    fn push(&mut self, element: LayoutElement) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }
}

/// Left edge of a line of `width` anchored at `x`.
fn aligned_x(x: f64, width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontWeight;

    fn body() -> FontSpec {
        FontSpec::new(9.5, FontWeight::Normal, Color::BLACK)
    }

    #[test]
    fn has_space_is_inclusive_at_bottom_margin() {
        let config = LayoutConfig::default();
        let cursor = PageCursor { page_index: 1, y: 290.0 };
        assert!(cursor.has_space(10.0, &config));
        assert!(!cursor.has_space(10.01, &config));
    }

    #[test]
    fn break_page_resets_cursor() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        ctx.advance(123.0);
        ctx.break_page();
        assert_eq!(ctx.cursor().page_index, 2);
        assert_eq!(ctx.cursor().y, config.margin.top);
        assert_eq!(ctx.page_count(), 2);
    }

    #[test]
    fn cursor_never_moves_up() {
        let config = LayoutConfig::default();
        let mut cursor = PageCursor::new(&config);
        cursor.advance(5.0);
        cursor.advance(-3.0);
        assert_eq!(cursor.y, 15.0);
    }

    #[test]
    fn draw_text_returns_wrapped_height() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        let lh = config.line_height_for(9.5);
        let h = ctx.draw_text("one line", config.left(), &TextOptions::new(body(), 180.0));
        assert!((h - lh).abs() < 1e-9);
        assert!((ctx.cursor().y - (config.margin.top + lh)).abs() < 1e-9);
    }

    #[test]
    fn empty_text_consumes_a_line_but_draws_nothing() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        let h = ctx.draw_text("", config.left(), &TextOptions::new(body(), 180.0));
        assert!(h > 0.0);
        let pages = ctx.finish();
        assert!(pages[0].elements.is_empty());
    }

    #[test]
    fn block_that_does_not_fit_moves_whole() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        ctx.advance(config.bottom_limit() - config.margin.top - 1.0);
        ctx.draw_text("needs more than a millimetre", 15.0, &TextOptions::new(body(), 180.0));
        let pages = ctx.finish();
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].contains_text("millimetre"));
        let line = pages[1].find_text("needs more than a millimetre").unwrap();
        assert_eq!(line.y, config.margin.top);
    }

    #[test]
    fn center_and_right_alignment_are_per_line() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        let options = TextOptions::new(body(), 180.0).align(TextAlign::Right);
        ctx.draw_text("2021 - 2024", config.right(), &options);
        let options = TextOptions::new(body(), 180.0).align(TextAlign::Center);
        ctx.draw_text("middle", config.center_x(), &options);
        let pages = ctx.finish();
        let right = pages[0].find_text("2021 - 2024").unwrap();
        assert!((right.x + right.width - config.right()).abs() < 1e-9);
        let mid = pages[0].find_text("middle").unwrap();
        assert!((mid.x + mid.width / 2.0 - config.center_x()).abs() < 1e-9);
    }

    #[test]
    fn single_page_has_no_page_numbers() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let ctx = LayoutContext::new(&config, &fonts);
        let pages = ctx.finish();
        assert!(!pages[0].contains_text("Page"));
    }

    #[test]
    fn footer_numbering_on_every_page() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        ctx.break_page();
        ctx.break_page();
        let pages = ctx.finish();
        for (i, page) in pages.iter().enumerate() {
            assert!(page.find_text(&format!("Page {} of 3", i + 1)).is_some());
        }
    }

    #[test]
    fn corner_numbering_stamps_left_pages_and_last() {
        let config = LayoutConfig {
            page_numbering: PageNumbering::Corner,
            ..Default::default()
        };
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        ctx.break_page();
        let pages = ctx.finish();
        let first = pages[0].find_text("Page 1").unwrap();
        assert!((first.x + first.width - config.right()).abs() < 1e-9);
        assert!(pages[1].find_text("Page 2").is_some());
        assert!(!pages[0].contains_text(" of "));
    }
}
