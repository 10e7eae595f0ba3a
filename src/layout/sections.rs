//! # Section Renderers
//!
//! One renderer per resume section. Each maps its part of the record to draw
//! calls on the `LayoutContext` and returns the vertical distance it consumed.
//!
//! Absent sections never reach these functions: the composer filters on
//! `Section::is_present` first. Inside a present section, blank entries are
//! skipped whole and blank fields one at a time.

use super::page_break::{decide_break, BreakDecision};
use super::{LayoutContext, TextOptions};
use crate::model::{non_blank, present, ExtrasBlock, ResumeRecord, Section, UserType};
use crate::style::{BulletListBreak, FontSpec, TextAlign};

/// Render one present section. Returns the height consumed.
pub fn render(
    ctx: &mut LayoutContext,
    section: Section,
    record: &ResumeRecord,
    user_type: UserType,
) -> f64 {
    let start = ctx.consumed();
    draw_section_title(ctx, section.title(user_type));
    match section {
        Section::Summary => render_summary(ctx, record),
        Section::Experience => render_experience(ctx, record),
        Section::Education => render_education(ctx, record),
        Section::Projects => render_projects(ctx, record),
        Section::Skills => render_skills(ctx, record),
        Section::Certifications => render_certifications(ctx, record),
        Section::AchievementsAndExtras => render_extras(ctx, record),
    }
    ctx.consumed() - start
}

/// Section title with a rule beneath it. The title is kept with the first
/// two lines of the section body.
fn draw_section_title(ctx: &mut LayoutContext, title: &str) {
    let config = ctx.config();
    let fonts = &config.fonts;
    let spacing = &config.spacing;

    ctx.advance(spacing.section);

    let title_height = config.line_height_for(fonts.section_title.size);
    let body_height = config.line_height_for(fonts.body.size);
    ctx.ensure_space(title_height + spacing.after_title_rule + 2.0 * body_height);

    let options = TextOptions::new(fonts.section_title, config.content_width());
    let (baseline, _) = ctx.draw_block(title, config.left(), &options);
    ctx.draw_rule(baseline + spacing.title_rule_offset, config.colors.rule);
    ctx.advance(spacing.after_title_rule);
}

fn render_summary(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    if let Some(summary) = present(&record.summary) {
        let options = TextOptions::new(config.fonts.body, config.content_width());
        ctx.draw_text(summary, config.left(), &options);
    }
}

/// A right-aligned label on an entry's first line: a date, or a link.
struct SideLabel<'r> {
    text: &'r str,
    font: FontSpec,
    href: Option<&'r str>,
}

/// Bold title, optional muted subtitle, and a side label right-justified
/// against the content edge.
struct EntryHeader<'r> {
    title: &'r str,
    subtitle: Option<&'r str>,
    label: Option<SideLabel<'r>>,
}

impl<'r> EntryHeader<'r> {
    fn new(title: &'r str, subtitle: Option<&'r str>, label: Option<SideLabel<'r>>) -> Self {
        Self {
            title: title.trim(),
            subtitle: subtitle.map(str::trim).filter(|s| !s.is_empty()),
            label: label
                .map(|l| SideLabel {
                    text: l.text.trim(),
                    ..l
                })
                .filter(|l| !l.text.is_empty()),
        }
    }

    fn has_left_column(&self) -> bool {
        !self.title.is_empty() || self.subtitle.is_some()
    }

    /// Width left for the title and subtitle once the label and its gap are
    /// reserved.
    fn left_width(&self, ctx: &LayoutContext) -> f64 {
        let config = ctx.config();
        let label_room = match &self.label {
            Some(l) => ctx.text_width(l.text, &l.font) + config.spacing.label_gap,
            None => 0.0,
        };
        (config.content_width() - label_room).max(0.0)
    }

    /// Wrapped height of the header as it will be drawn.
    fn height(&self, ctx: &LayoutContext) -> f64 {
        let config = ctx.config();
        let fonts = &config.fonts;
        if !self.has_left_column() {
            return match &self.label {
                Some(l) => ctx.block_height(l.text, &l.font, config.content_width()),
                None => 0.0,
            };
        }
        let width = self.left_width(ctx);
        let mut height = 0.0;
        if !self.title.is_empty() {
            height += ctx.block_height(self.title, &fonts.job_title, width);
        }
        if let Some(subtitle) = self.subtitle {
            height += ctx.block_height(subtitle, &fonts.company, width);
        }
        height
    }

    /// Draw the header, kept on one page with the first body line.
    ///
    /// The label's baseline is the cursor position captured before the left
    /// column is drawn, so it sits on the title's first line even when the
    /// title or subtitle wraps.
    fn draw(self, ctx: &mut LayoutContext) {
        let config = ctx.config();
        let fonts = &config.fonts;

        if !self.has_left_column() {
            if let Some(label) = self.label {
                let mut options =
                    TextOptions::new(label.font, config.content_width()).align(TextAlign::Right);
                options.href = label.href;
                ctx.draw_text(label.text, config.right(), &options);
            }
            return;
        }

        let height = self.height(ctx);
        ctx.ensure_space(height + config.line_height_for(fonts.body.size));

        let left_width = self.left_width(ctx);
        let label_y = ctx.cursor().y;

        if !self.title.is_empty() {
            ctx.draw_text(self.title, config.left(), &TextOptions::new(fonts.job_title, left_width));
        }
        if let Some(subtitle) = self.subtitle {
            ctx.draw_text(subtitle, config.left(), &TextOptions::new(fonts.company, left_width));
        }
        if let Some(label) = self.label {
            ctx.place_text(
                label.text,
                config.right(),
                label_y,
                &label.font,
                TextAlign::Right,
                label.href,
            );
        }
    }
}

/// Heights of bullet items as drawn, each including the gap above it.
fn bullet_heights(ctx: &LayoutContext, items: &[&str]) -> Vec<f64> {
    let config = ctx.config();
    let width = config.content_width() - config.spacing.bullet_indent;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let gap = if i > 0 { config.spacing.bullet } else { 0.0 };
            gap + ctx.block_height(item, &config.fonts.body, width)
        })
        .collect()
}

/// Under `KeepTogether`, move a lead block (an entry header or a label) and
/// the bullet list under it to a fresh page when they do not fit here but
/// do fit there. Call before drawing the lead.
fn keep_with_bullets(ctx: &mut LayoutContext, lead_height: f64, items: &[&str]) {
    let config = ctx.config();
    if config.bullet_list_break != BulletListBreak::KeepTogether || items.is_empty() {
        return;
    }
    let mut heights = vec![lead_height];
    heights.extend(bullet_heights(ctx, items));
    if decide_break(ctx.remaining_height(), ctx.fresh_page_height(), &heights)
        == BreakDecision::MoveToNextPage
    {
        ctx.ensure_space(heights.iter().sum());
    }
}

/// Bullet items with a small gap between them, none after the last. Each
/// bullet is checked on its own, so a list may continue on the next page.
fn draw_bullets(ctx: &mut LayoutContext, items: &[&str]) {
    let config = ctx.config();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ctx.advance(config.spacing.bullet);
        }
        ctx.draw_bullet(item, &config.fonts.body);
    }
}

fn render_experience(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    let jobs = record.experience.iter().filter(|job| job.has_content());
    for (i, job) in jobs.enumerate() {
        if i > 0 {
            ctx.advance(config.spacing.entry);
        }
        let subtitle = [Some(job.company.trim()), present(&job.location)]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let header = EntryHeader::new(
            &job.role,
            Some(subtitle.as_str()),
            Some(SideLabel {
                text: &job.year,
                font: config.fonts.year,
                href: None,
            }),
        );
        let bullets: Vec<&str> = non_blank(&job.bullets).collect();
        let header_height = header.height(ctx);
        keep_with_bullets(ctx, header_height, &bullets);
        header.draw(ctx);
        draw_bullets(ctx, &bullets);
    }
}

fn render_education(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    let body = TextOptions::new(config.fonts.body, config.content_width());
    let entries = record.education.iter().filter(|entry| entry.has_content());
    for (i, entry) in entries.enumerate() {
        if i > 0 {
            ctx.advance(config.spacing.entry);
        }
        let school = match present(&entry.location) {
            Some(location) if !entry.school.trim().is_empty() => {
                format!("{}, {}", entry.school.trim(), location)
            }
            Some(location) => location.to_string(),
            None => entry.school.trim().to_string(),
        };
        EntryHeader::new(
            &entry.degree,
            Some(school.as_str()),
            Some(SideLabel {
                text: &entry.year,
                font: config.fonts.year,
                href: None,
            }),
        )
        .draw(ctx);
        if let Some(cgpa) = present(&entry.cgpa) {
            ctx.draw_text(&format!("CGPA: {}", cgpa), config.left(), &body);
        }
        let coursework: Vec<&str> = non_blank(&entry.coursework).collect();
        if !coursework.is_empty() {
            let line = format!("Relevant Coursework: {}", coursework.join(", "));
            ctx.draw_text(&line, config.left(), &body);
        }
    }
}

fn render_projects(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    let projects = record.projects.iter().filter(|project| project.has_content());
    for (i, project) in projects.enumerate() {
        if i > 0 {
            ctx.advance(config.spacing.entry);
        }
        let link = present(&project.github_url).map(|url| SideLabel {
            text: "GitHub",
            font: config.fonts.link,
            href: Some(url),
        });
        let header = EntryHeader::new(&project.title, None, link);
        let bullets: Vec<&str> = non_blank(&project.bullets).collect();
        let header_height = header.height(ctx);
        keep_with_bullets(ctx, header_height, &bullets);
        header.draw(ctx);
        draw_bullets(ctx, &bullets);
    }
}

fn render_skills(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    let fonts = &config.fonts;
    let groups: Vec<(&str, String)> = record
        .skills
        .iter()
        .filter_map(|group| {
            let list: Vec<&str> = non_blank(&group.list).collect();
            if list.is_empty() {
                None
            } else {
                Some((group.category.trim(), list.join(", ")))
            }
        })
        .collect();

    for (i, (category, list)) in groups.iter().enumerate() {
        if i > 0 {
            ctx.advance(config.spacing.bullet);
        }
        if category.is_empty() {
            let options = TextOptions::new(fonts.body, config.content_width());
            ctx.draw_text(list, config.left(), &options);
        } else {
            ctx.draw_hanging(&format!("{}: ", category), &fonts.job_title, list, &fonts.body);
        }
    }
}

fn render_certifications(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let shown: Vec<String> = record
        .certifications
        .iter()
        .map(|c| c.display().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let items: Vec<&str> = shown.iter().map(String::as_str).collect();
    keep_with_bullets(ctx, 0.0, &items);
    draw_bullets(ctx, &items);
}

fn render_extras(ctx: &mut LayoutContext, record: &ResumeRecord) {
    let config = ctx.config();
    let fonts = &config.fonts;
    let blocks = ExtrasBlock::ALL.iter().filter(|b| b.is_present(record));

    for (i, block) in blocks.enumerate() {
        if i > 0 {
            ctx.advance(config.spacing.entry);
        }
        let label_height = config.line_height_for(fonts.job_title.size);
        let items = block.items(record);
        keep_with_bullets(ctx, label_height, &items);
        ctx.ensure_space(label_height + config.line_height_for(fonts.body.size));
        let options = TextOptions::new(fonts.job_title, config.content_width());
        ctx.draw_text(block.label(), config.left(), &options);

        match block {
            ExtrasBlock::PersonalDetails => {
                if let Some(details) = present(&record.personal_details) {
                    let options = TextOptions::new(fonts.body, config.content_width());
                    ctx.draw_text(details, config.left(), &options);
                }
            }
            _ => draw_bullets(ctx, &items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::layout::{LayoutElement, LayoutPage};
    use crate::model::{Education, Project, SkillGroup, WorkExperience};
    use crate::style::LayoutConfig;

    fn record() -> ResumeRecord {
        ResumeRecord {
            name: "Asha Rao".to_string(),
            ..Default::default()
        }
    }

    fn render_one(record: &ResumeRecord, section: Section) -> Vec<LayoutPage> {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        let consumed = render(&mut ctx, section, record, UserType::Experienced);
        assert!(consumed > 0.0);
        ctx.finish()
    }

    #[test]
    fn year_is_right_aligned_on_title_baseline() {
        let mut r = record();
        r.experience.push(WorkExperience {
            role: "Senior Engineer".to_string(),
            company: "Acme".to_string(),
            location: Some("Pune".to_string()),
            year: "2021 - Present".to_string(),
            bullets: vec!["Built things".to_string()],
        });
        let pages = render_one(&r, Section::Experience);
        let config = LayoutConfig::default();
        let role = pages[0].find_text("Senior Engineer").unwrap();
        let year = pages[0].find_text("2021 - Present").unwrap();
        assert_eq!(role.y, year.y);
        assert!((year.x + year.width - config.right()).abs() < 1e-9);
        assert!(pages[0].find_text("Acme, Pune").is_some());
    }

    #[test]
    fn bullets_are_indented_with_marker() {
        let mut r = record();
        r.projects.push(Project {
            title: "Folio".to_string(),
            bullets: vec!["Wrote a PDF writer".to_string()],
            github_url: None,
        });
        let pages = render_one(&r, Section::Projects);
        let config = LayoutConfig::default();
        let text = pages[0].find_text("Wrote a PDF writer").unwrap();
        let marker = pages[0].find_text("\u{2022}").unwrap();
        assert_eq!(text.x, config.left() + config.spacing.bullet_indent);
        assert_eq!(marker.y, text.y);
    }

    #[test]
    fn project_link_carries_href() {
        let mut r = record();
        r.projects.push(Project {
            title: "Folio".to_string(),
            bullets: vec![],
            github_url: Some("https://github.com/asha/folio".to_string()),
        });
        let pages = render_one(&r, Section::Projects);
        let link = pages[0].find_text("GitHub").unwrap();
        assert_eq!(link.href.as_deref(), Some("https://github.com/asha/folio"));
    }

    #[test]
    fn skills_hang_after_bold_category() {
        let mut r = record();
        r.skills.push(SkillGroup {
            category: "Languages".to_string(),
            list: vec!["Rust".to_string(), "Go".to_string()],
        });
        let pages = render_one(&r, Section::Skills);
        let config = LayoutConfig::default();
        let label = pages[0].find_text("Languages:").unwrap();
        let list = pages[0].find_text("Rust, Go").unwrap();
        assert_eq!(label.x, config.left());
        assert!(list.x > label.x + label.width);
        assert_eq!(label.y, list.y);
    }

    #[test]
    fn education_optional_lines() {
        let mut r = record();
        r.education.push(Education {
            degree: "B.Tech".to_string(),
            school: "IIT Bombay".to_string(),
            location: None,
            year: "2024".to_string(),
            cgpa: Some("8.7".to_string()),
            coursework: vec!["Compilers".to_string(), "Databases".to_string()],
        });
        let pages = render_one(&r, Section::Education);
        assert!(pages[0].find_text("CGPA: 8.7").is_some());
        assert!(pages[0].find_text("Relevant Coursework: Compilers, Databases").is_some());
    }

    fn bullets_near_bottom(policy: BulletListBreak) -> Vec<LayoutPage> {
        let config = LayoutConfig {
            bullet_list_break: policy,
            ..Default::default()
        };
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        // Leave 10mm: room for two one-line bullets, not three.
        ctx.advance(config.bottom_limit() - config.margin.top - 10.0);
        let items = ["alpha", "beta", "gamma"];
        keep_with_bullets(&mut ctx, 0.0, &items);
        draw_bullets(&mut ctx, &items);
        ctx.finish()
    }

    #[test]
    fn bullet_list_splits_between_bullets_by_default() {
        let pages = bullets_near_bottom(BulletListBreak::BetweenBullets);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].find_text("alpha").is_some());
        assert!(pages[0].find_text("beta").is_some());
        assert!(pages[1].find_text("gamma").is_some());
    }

    #[test]
    fn keep_together_moves_the_whole_list() {
        let pages = bullets_near_bottom(BulletListBreak::KeepTogether);
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].contains_text("alpha"));
        for item in ["alpha", "beta", "gamma"] {
            assert!(pages[1].find_text(item).is_some());
        }
    }

    fn first_line<'p>(page: &'p LayoutPage, prefix: &str) -> Option<&'p LayoutElement> {
        page.elements
            .iter()
            .find(|e| e.text().is_some_and(|t| t.starts_with(prefix)))
    }

    #[test]
    fn wrapped_header_moves_with_its_year() {
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        ctx.advance(config.bottom_limit() - config.margin.top - 12.5);

        let header = EntryHeader::new(
            "Bachelor of Technology in Computer Science and Engineering with a Minor in \
             Applied Mathematics and Statistics",
            Some(
                "Vellore Institute of Technology, School of Computer Science and Engineering, \
                 Vellore Campus, Tamil Nadu, India",
            ),
            Some(SideLabel {
                text: "2019 - 2023",
                font: config.fonts.year,
                href: None,
            }),
        );
        let line = config.line_height_for(config.fonts.body.size);
        assert!(header.height(&ctx) > 3.0 * line, "degree and school should both wrap");
        header.draw(&mut ctx);
        let pages = ctx.finish();

        assert_eq!(pages.len(), 2);
        assert!(first_line(&pages[0], "Bachelor").is_none());
        let degree = first_line(&pages[1], "Bachelor").unwrap();
        let school = first_line(&pages[1], "Vellore").unwrap();
        let year = pages[1].find_text("2019 - 2023").unwrap();
        assert_eq!(degree.y, config.margin.top);
        assert_eq!(year.y, degree.y, "year should sit on the degree's first line");
        assert!(school.y > degree.y + line, "degree should take two lines");
    }

    fn job_near_bottom(policy: BulletListBreak) -> Vec<LayoutPage> {
        let config = LayoutConfig {
            bullet_list_break: policy,
            ..Default::default()
        };
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        // Room for the header and one bullet, not the whole entry.
        ctx.advance(config.bottom_limit() - config.margin.top - 14.0);
        let mut r = record();
        r.experience.push(WorkExperience {
            role: "Senior Engineer".to_string(),
            company: "Acme".to_string(),
            year: "2021 - Present".to_string(),
            bullets: vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()],
            ..Default::default()
        });
        render_experience(&mut ctx, &r);
        ctx.finish()
    }

    #[test]
    fn keep_together_moves_the_header_with_its_bullets() {
        let pages = job_near_bottom(BulletListBreak::KeepTogether);
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].contains_text("Senior Engineer"));
        for text in ["Senior Engineer", "Acme", "2021 - Present", "alpha", "gamma"] {
            assert!(pages[1].contains_text(text), "{} should be on page 2", text);
        }
    }

    #[test]
    fn between_bullets_leaves_the_header_in_place() {
        let pages = job_near_bottom(BulletListBreak::BetweenBullets);
        assert!(pages[0].find_text("Senior Engineer").is_some());
        assert!(pages[0].find_text("alpha").is_some());
    }

    #[test]
    fn blank_entries_are_skipped() {
        let mut r = record();
        r.experience.push(WorkExperience::default());
        r.experience.push(WorkExperience {
            role: "Engineer".to_string(),
            ..Default::default()
        });
        let config = LayoutConfig::default();
        let fonts = FontContext::new();
        let mut ctx = LayoutContext::new(&config, &fonts);
        render_experience(&mut ctx, &r);
        let pages = ctx.finish();
        let role = pages[0].find_text("Engineer").unwrap();
        assert_eq!(role.y, config.margin.top, "no entry gap above the first shown entry");
    }

    #[test]
    fn entries_keep_their_order() {
        let mut r = record();
        for role in ["First", "Second", "Third"] {
            r.experience.push(WorkExperience {
                role: role.to_string(),
                company: "Co".to_string(),
                year: "2020".to_string(),
                ..Default::default()
            });
        }
        let pages = render_one(&r, Section::Experience);
        let ys: Vec<f64> = ["First", "Second", "Third"]
            .iter()
            .map(|t| pages[0].find_text(t).unwrap().y)
            .collect();
        assert!(ys[0] < ys[1] && ys[1] < ys[2]);
    }
}
