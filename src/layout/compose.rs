//! # Document Composer
//!
//! Header, contact line and separator, then every present section in the
//! user type's order, then page numbering.

use super::{sections, LayoutContext, LayoutPage, TextOptions};
use crate::font::FontContext;
use crate::model::{ResumeRecord, UserType};
use crate::style::{LayoutConfig, TextAlign};

/// Lay out a resume into pages. Never fails: every record has a rendering.
///
/// The record is assumed to be validated upstream (non-blank name).
pub fn layout_resume(
    record: &ResumeRecord,
    user_type: UserType,
    config: &LayoutConfig,
    fonts: &FontContext,
) -> Vec<LayoutPage> {
    let mut ctx = LayoutContext::new(config, fonts);

    draw_header(&mut ctx, record);

    for &section in user_type.section_order() {
        if !section.is_present(record) {
            log::debug!("skipping empty section {:?}", section);
            continue;
        }
        let height = sections::render(&mut ctx, section, record, user_type);
        log::debug!(
            "{:?}: {:.2}mm, ends on page {}",
            section,
            height,
            ctx.cursor().page_index
        );
    }

    ctx.finish()
}

fn draw_header(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    let fonts = &config.fonts;

    ctx.advance(config.spacing.name_offset);

    let name = record.name.trim().to_uppercase();
    let options = TextOptions::new(fonts.name, config.content_width()).align(TextAlign::Center);
    ctx.draw_text(&name, config.center_x(), &options);

    if let Some(contact) = record.contact_line() {
        let options =
            TextOptions::new(fonts.contact, config.content_width()).align(TextAlign::Center);
        ctx.draw_text(&contact, config.center_x(), &options);
    }

    ctx.draw_rule(ctx.cursor().y, config.colors.header_rule);
    ctx.advance(config.spacing.after_header_rule);
}
