//! Advance widths for the standard PDF fonts we draw with.
//!
//! Values are in 1/1000 em, taken from the Adobe Core 14 AFM files.
//! `widths[i]` is the advance of ASCII `(i + 32)`, covering space through `~`.
//! The few WinAnsi punctuation marks a resume commonly carries (bullet,
//! dashes, curly quotes) are looked up separately; any other character falls
//! back to `default_width`.

use super::StandardFont;

pub struct StandardFontMetrics {
    widths: [u16; 95],
    default_width: u16,
    bullet: u16,
    single_quote: u16,
    double_quote: u16,
}

impl StandardFontMetrics {
    /// Advance width in 1/1000 em.
    pub fn advance(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            return self.widths[(code - 32) as usize];
        }
        match ch {
            '\u{2022}' => self.bullet,
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2018}' | '\u{2019}' | '\u{201A}' => self.single_quote,
            '\u{201C}' | '\u{201D}' | '\u{201E}' => self.double_quote,
            '\u{00A0}' => self.widths[0],
            _ => self.default_width,
        }
    }

    /// Width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64, letter_spacing: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width(ch, font_size) + letter_spacing)
            .sum()
    }
}

#[rustfmt::skip]
static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    default_width: 556,
    bullet: 350,
    single_quote: 222,
    double_quote: 333,
};

#[rustfmt::skip]
static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A-M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a-m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n-z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    default_width: 611,
    bullet: 350,
    single_quote: 278,
    double_quote: 500,
};

impl StandardFont {
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            StandardFont::Helvetica => &HELVETICA,
            StandardFont::HelveticaBold => &HELVETICA_BOLD,
        }
    }
}
