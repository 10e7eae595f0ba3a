//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Resumes only need the standard
//! Helvetica faces, horizontal rules and link annotations, so the subset of the
//! format we emit is small.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog
//! 2 0 obj ... endobj  <- page tree
//! ...                 <- fonts, content streams, annotations, pages, info
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Layout works in millimetres from the top-left; PDF user space is points
//! from the bottom-left. Every coordinate is converted on the way out.

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::FolioError;
use crate::font::{FontContext, StandardFont};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage};
use crate::model::Metadata;

/// Points per millimetre.
const MM_TO_PT: f64 = 72.0 / 25.4;

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing. Object ids are indices.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
    /// Font -> object id, in resource-name order (/F0, /F1, ...).
    font_objects: Vec<(StandardFont, usize)>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        font_context: &FontContext,
    ) -> Result<Vec<u8>, FolioError> {
        if pages.is_empty() {
            return Err(FolioError::RenderError("no pages to write".to_string()));
        }
        for page in pages {
            Self::check_geometry(page)?;
        }

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
            font_objects: Vec::new(),
        };

        self.register_fonts(&mut builder, pages, font_context);
        let font_resources = self.build_font_resource_dict(&builder.font_objects);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, &builder.font_objects, font_context);
            let compressed = compress_to_vec_zlib(&content, 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let annot_ids: Vec<usize> = page
                .elements
                .iter()
                .filter_map(|element| {
                    let href = element.href.as_deref()?;
                    Some(builder.push(Self::link_annotation(element, href, page.height)))
                })
                .collect();

            let mut page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >>",
                page.width * MM_TO_PT,
                page.height * MM_TO_PT,
                content_obj_id,
                font_resources
            );
            if !annot_ids.is_empty() {
                let refs: Vec<String> = annot_ids.iter().map(|id| format!("{} 0 R", id)).collect();
                let _ = write!(page_dict, " /Annots [{}]", refs.join(" "));
            }
            page_dict.push_str(" >>");
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.push(Self::info_dict(metadata));

        Ok(self.serialize(&builder, info_obj_id))
    }

    /// Reject coordinates no viewer could draw.
    fn check_geometry(page: &LayoutPage) -> Result<(), FolioError> {
        if !(page.width.is_finite() && page.height.is_finite())
            || page.width <= 0.0
            || page.height <= 0.0
        {
            return Err(FolioError::RenderError(format!(
                "page {} has invalid size {}x{}",
                page.number, page.width, page.height
            )));
        }
        let bad = page
            .elements
            .iter()
            .any(|e| !(e.x.is_finite() && e.y.is_finite() && e.width.is_finite()));
        if bad {
            return Err(FolioError::RenderError(format!(
                "page {} has an element with non-finite coordinates",
                page.number
            )));
        }
        Ok(())
    }

    fn info_dict(metadata: &Metadata) -> Vec<u8> {
        let mut info: Vec<u8> = b"<< ".to_vec();
        let entries = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                let _ = write!(info, "/{} (", key);
                info.extend_from_slice(&Self::encode_text(value));
                info.extend_from_slice(b") ");
            }
        }
        let _ = write!(
            info,
            "/Producer (Folio {}) /Creator (Folio) >>",
            env!("CARGO_PKG_VERSION")
        );
        info
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &LayoutPage,
        font_objects: &[(StandardFont, usize)],
        font_context: &FontContext,
    ) -> Vec<u8> {
        let mut stream: Vec<u8> = Vec::new();
        for element in &page.elements {
            self.write_element(&mut stream, element, page.height, font_objects, font_context);
        }
        stream
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut Vec<u8>,
        element: &LayoutElement,
        page_height: f64,
        font_objects: &[(StandardFont, usize)],
        font_context: &FontContext,
    ) {
        let x = element.x * MM_TO_PT;
        let y = (page_height - element.y) * MM_TO_PT;

        match &element.draw {
            DrawCommand::Text { text, font } => {
                let std_font = font_context.resolve(font.weight);
                let idx = Self::font_index(std_font, font_objects);
                let color = &font.color;
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n(",
                    color.r, color.g, color.b, idx, font.size, x, y
                );
                stream.extend_from_slice(&Self::encode_text(text));
                let _ = write!(stream, ") Tj\nET\n");
            }

            DrawCommand::Rule { thickness, color } => {
                let x2 = (element.x + element.width) * MM_TO_PT;
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    color.r,
                    color.g,
                    color.b,
                    thickness * MM_TO_PT,
                    x,
                    y,
                    x2,
                    y
                );
            }
        }
    }

    /// A `/Link` annotation covering a text element, opening `href`.
    fn link_annotation(element: &LayoutElement, href: &str, page_height: f64) -> Vec<u8> {
        let size = match &element.draw {
            DrawCommand::Text { font, .. } => font.size,
            DrawCommand::Rule { .. } => element.height * MM_TO_PT,
        };
        let x1 = element.x * MM_TO_PT;
        let x2 = (element.x + element.width) * MM_TO_PT;
        let baseline = (page_height - element.y) * MM_TO_PT;
        format!(
            "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] /Border [0 0 0] \
             /A << /Type /Action /S /URI /URI ({}) >> >>",
            x1,
            baseline - size * 0.25,
            x2,
            baseline + size * 0.85,
            Self::escape_pdf_string(href)
        )
        .into_bytes()
    }

    /// Register the fonts used across all pages. Helvetica is always present.
    fn register_fonts(
        &self,
        builder: &mut PdfBuilder,
        pages: &[LayoutPage],
        font_context: &FontContext,
    ) {
        let mut fonts: Vec<StandardFont> = pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|element| match &element.draw {
                DrawCommand::Text { font, .. } => Some(font_context.resolve(font.weight)),
                DrawCommand::Rule { .. } => None,
            })
            .collect();
        fonts.push(StandardFont::Helvetica);
        fonts.sort();
        fonts.dedup();

        for font in fonts {
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            let obj_id = builder.push(font_dict.into_bytes());
            builder.font_objects.push((font, obj_id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resource index (/F0, /F1, ...) of a registered font.
    fn font_index(font: StandardFont, font_objects: &[(StandardFont, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode text as an escaped WinAnsi string body for `Tj`.
    fn encode_text(text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut replaced = 0;
        for ch in text.chars() {
            let b = match Self::unicode_to_winansi(ch) {
                Some(b) => b,
                None => {
                    replaced += 1;
                    b'?'
                }
            };
            match b {
                b'\\' | b'(' | b')' => {
                    out.push(b'\\');
                    out.push(b);
                }
                _ => out.push(b),
            }
        }
        if replaced > 0 {
            log::warn!(
                "{} character(s) in {:?} have no WinAnsi encoding; replaced with '?'",
                replaced,
                text
            );
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is Windows-1252: 0x20..=0x7E and 0xA0..=0xFF map
    /// directly, and 0x80..=0x9F holds typographic punctuation.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80),
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85),
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95), // bullet
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            // tab
            0x09 => Some(b' '),
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(obj);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, FontSpec, FontWeight};

    fn page(elements: Vec<LayoutElement>) -> LayoutPage {
        LayoutPage {
            number: 1,
            width: 210.0,
            height: 300.0,
            elements,
        }
    }

    fn text(s: &str, weight: FontWeight, href: Option<&str>) -> LayoutElement {
        LayoutElement {
            x: 15.0,
            y: 20.0,
            width: 30.0,
            height: 4.0,
            draw: DrawCommand::Text {
                text: s.to_string(),
                font: FontSpec::new(9.5, weight, Color::BLACK),
            },
            href: href.map(str::to_string),
        }
    }

    fn write(pages: &[LayoutPage], metadata: &Metadata) -> String {
        let bytes = PdfWriter::new()
            .write(pages, metadata, &FontContext::new())
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(
            PdfWriter::escape_pdf_string("Hello (World)"),
            "Hello \\(World\\)"
        );
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_empty_page_produces_valid_pdf() {
        let text = write(&[page(vec![])], &Metadata::default());
        assert!(text.starts_with("%PDF-1.7"));
        assert!(text.contains("%%EOF"));
        assert!(text.contains("xref"));
        assert!(text.contains("trailer"));
        // 210 x 300 mm in points
        assert!(text.contains("/MediaBox [0 0 595.28 850.39]"));
    }

    #[test]
    fn test_no_pages_is_an_error() {
        let result = PdfWriter::new().write(&[], &Metadata::default(), &FontContext::new());
        assert!(matches!(result, Err(FolioError::RenderError(_))));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut bad = text("x", FontWeight::Normal, None);
        bad.y = f64::NAN;
        let result =
            PdfWriter::new().write(&[page(vec![bad])], &Metadata::default(), &FontContext::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_in_pdf() {
        let metadata = Metadata {
            title: Some("Asha Rao - Resume".to_string()),
            author: Some("Asha Rao".to_string()),
            subject: None,
        };
        let text = write(&[page(vec![])], &metadata);
        assert!(text.contains("/Title (Asha Rao - Resume)"));
        assert!(text.contains("/Author (Asha Rao)"));
        assert!(text.contains("/Producer (Folio"));
    }

    #[test]
    fn test_bold_font_registered_separately() {
        let pages = vec![page(vec![
            text("A", FontWeight::Normal, None),
            text("B", FontWeight::Bold, None),
        ])];
        let text = write(&pages, &Metadata::default());
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn test_link_annotation() {
        let pages = vec![page(vec![text(
            "GitHub",
            FontWeight::Normal,
            Some("https://github.com/a/b"),
        )])];
        let text = write(&pages, &Metadata::default());
        assert!(text.contains("/Annots ["));
        assert!(text.contains("/S /URI /URI (https://github.com/a/b)"));
    }

    #[test]
    fn test_winansi_encoding() {
        assert_eq!(PdfWriter::encode_text("a(b)"), b"a\\(b\\)".to_vec());
        assert_eq!(PdfWriter::encode_text("\u{2022}"), vec![0x95]);
        assert_eq!(PdfWriter::encode_text("caf\u{e9}"), b"caf\xe9".to_vec());
        assert_eq!(PdfWriter::encode_text("\u{4e2d}"), b"?".to_vec());
    }
}
