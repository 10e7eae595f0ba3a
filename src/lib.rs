//! # Folio
//!
//! A page-native resume compositor.
//!
//! A structured resume record goes in; a fixed-geometry PDF (or a Word
//! document) comes out. Layout is a single top-to-bottom pass over the
//! record: every block is measured with real font metrics before it is drawn,
//! and the page is broken *before* a block that would cross the bottom margin,
//! never through it. Multi-page documents get page numbers in a final pass.
//!
//! ## Architecture
//!
//! ```text
//! ResumeRecord (JSON/API)
//!       ↓
//!   [model]    : Record, certification variants, section policy
//!       ↓
//!   [style]    : LayoutConfig: geometry, font roles, spacing
//!       ↓
//!   [layout]   : Cursor, text blocks, section renderers, composer
//!       ↓
//!   [pdf]      : Serialize to PDF bytes
//!   [word]     : Serialize to Word-compatible markup
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;
pub mod word;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::FolioError;
pub use layout::layout_resume;
pub use model::{export_filename, ExportFormat, ResumeRecord, UserType};
pub use style::LayoutConfig;

use font::FontContext;
use pdf::PdfWriter;
use word::WordWriter;

/// Render a resume to PDF bytes with the default page geometry.
///
/// This is the primary entry point. Fails only for records that cannot be
/// exported (a blank name) or if serialization fails; a failed export
/// produces no bytes at all.
pub fn export_pdf(record: &ResumeRecord, user_type: UserType) -> Result<Vec<u8>, FolioError> {
    export_pdf_with(record, user_type, &LayoutConfig::default())
}

/// Render a resume to PDF bytes with an explicit configuration.
pub fn export_pdf_with(
    record: &ResumeRecord,
    user_type: UserType,
    config: &LayoutConfig,
) -> Result<Vec<u8>, FolioError> {
    record.validate()?;
    config.validate()?;

    let font_context = FontContext::new();
    let pages = layout_resume(record, user_type, config, &font_context);
    let bytes = PdfWriter::new().write(&pages, &record.metadata(), &font_context)?;

    log::info!(
        "exported PDF for {:?}: {} page(s), {} bytes",
        user_type,
        pages.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Render a resume as a Word document.
pub fn export_word(record: &ResumeRecord, user_type: UserType) -> Result<Vec<u8>, FolioError> {
    export_word_with(record, user_type, &LayoutConfig::default())
}

pub fn export_word_with(
    record: &ResumeRecord,
    user_type: UserType,
    config: &LayoutConfig,
) -> Result<Vec<u8>, FolioError> {
    record.validate()?;
    config.validate()?;
    let bytes = WordWriter::new().write(record, user_type, config);
    log::info!("exported Word document for {:?}: {} bytes", user_type, bytes.len());
    Ok(bytes)
}

/// Everything needed for one export.
#[derive(Debug, Clone)]
pub struct ExportRequest<'r> {
    pub record: &'r ResumeRecord,
    pub user_type: UserType,
    pub format: ExportFormat,
    /// Included in the filename when present.
    pub target_role: Option<&'r str>,
}

/// A finished document, ready to be saved or downloaded.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Export in the requested format and derive the download filename.
pub fn export(request: &ExportRequest) -> Result<ExportedDocument, FolioError> {
    export_with(request, &LayoutConfig::default())
}

pub fn export_with(
    request: &ExportRequest,
    config: &LayoutConfig,
) -> Result<ExportedDocument, FolioError> {
    let bytes = match request.format {
        ExportFormat::Pdf => export_pdf_with(request.record, request.user_type, config)?,
        ExportFormat::Word => export_word_with(request.record, request.user_type, config)?,
    };
    Ok(ExportedDocument {
        filename: export_filename(&request.record.name, request.target_role, request.format),
        mime_type: request.format.mime_type(),
        bytes,
    })
}

/// Render a resume described as JSON to PDF bytes.
pub fn render_json(json: &str, user_type: UserType) -> Result<Vec<u8>, FolioError> {
    let record: ResumeRecord = serde_json::from_str(json)?;
    export_pdf(&record, user_type)
}
