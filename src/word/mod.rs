//! # Word Export
//!
//! Writes a resume as Office-flavoured HTML, which Word opens as a `.doc`.
//!
//! Word does its own pagination, so there is no cursor here: the document is
//! the same sections in the same order under the same titles, styled with the
//! page size, margins and font sizes from the `LayoutConfig`. Every piece of
//! record text goes through XML escaping.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::model::{non_blank, present, ExtrasBlock, ResumeRecord, Section, UserType};
use crate::style::{FontSpec, LayoutConfig};

pub struct WordWriter;

impl Default for WordWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn font_css(font: &FontSpec) -> String {
    format!(
        "font-size: {}pt; font-weight: {}; color: {};",
        font.size,
        if font.is_bold() { "bold" } else { "normal" },
        font.color.to_hex()
    )
}

impl WordWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the whole document as UTF-8 bytes.
    pub fn write(&self, record: &ResumeRecord, user_type: UserType, config: &LayoutConfig) -> Vec<u8> {
        let mut doc = String::new();
        self.write_head(&mut doc, record, config);

        let _ = write!(doc, "<h1>{}</h1>\n", escape(&record.name.trim().to_uppercase()));
        if let Some(contact) = record.contact_line() {
            let _ = write!(doc, "<p class=\"contact\">{}</p>\n", escape(&contact));
        }
        doc.push_str("<hr class=\"header\">\n");

        for &section in user_type.section_order() {
            if !section.is_present(record) {
                continue;
            }
            let _ = write!(doc, "<h2>{}</h2>\n", escape(section.title(user_type)));
            self.write_section(&mut doc, section, record);
        }

        doc.push_str("</div>\n</body>\n</html>\n");
        doc.into_bytes()
    }

    fn write_head(&self, doc: &mut String, record: &ResumeRecord, config: &LayoutConfig) {
        let fonts = &config.fonts;
        let margin = &config.margin;
        let _ = write!(
            doc,
            "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
             xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
             xmlns=\"http://www.w3.org/TR/REC-html40\">\n\
             <head>\n<meta charset=\"utf-8\">\n<title>{} - Resume</title>\n\
             <!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View>\
             <w:Zoom>100</w:Zoom></w:WordDocument></xml><![endif]-->\n",
            escape(record.name.trim())
        );
        let _ = write!(
            doc,
            "<style>\n\
             @page Section1 {{ size: {w}mm {h}mm; margin: {t}mm {r}mm {b}mm {l}mm; }}\n\
             div.Section1 {{ page: Section1; }}\n\
             body {{ font-family: Helvetica, Arial, sans-serif; line-height: {lh}; {body} }}\n\
             h1 {{ text-align: center; margin: 0; {name} }}\n\
             p.contact {{ text-align: center; margin: 0; {contact} }}\n\
             hr.header {{ border: none; border-top: {rule}mm solid {header_rule}; }}\n\
             h2 {{ margin: {section}mm 0 {after}mm 0; border-bottom: {rule}mm solid {rule_color}; {title} }}\n\
             table.entry {{ width: 100%; border-collapse: collapse; }}\n\
             td {{ padding: 0; vertical-align: top; }}\n\
             td.side {{ text-align: right; white-space: nowrap; {year} }}\n\
             p {{ margin: 0; }}\n\
             .title {{ {job} }}\n\
             .sub {{ {company} }}\n\
             ul {{ margin: 0 0 0 {indent}mm; padding: 0; }}\n\
             a {{ {link} }}\n\
             </style>\n</head>\n<body>\n<div class=\"Section1\">\n",
            w = config.page_width,
            h = config.page_height,
            t = margin.top,
            r = margin.right,
            b = margin.bottom,
            l = margin.left,
            lh = config.line_height,
            body = font_css(&fonts.body),
            name = font_css(&fonts.name),
            contact = font_css(&fonts.contact),
            rule = config.rule_thickness,
            header_rule = config.colors.header_rule.to_hex(),
            rule_color = config.colors.rule.to_hex(),
            section = config.spacing.section,
            after = config.spacing.after_title_rule,
            title = font_css(&fonts.section_title),
            year = font_css(&fonts.year),
            job = font_css(&fonts.job_title),
            company = font_css(&fonts.company),
            indent = config.spacing.bullet_indent,
            link = font_css(&fonts.link),
        );
    }

    fn write_section(&self, doc: &mut String, section: Section, record: &ResumeRecord) {
        match section {
            Section::Summary => {
                if let Some(summary) = present(&record.summary) {
                    let _ = write!(doc, "<p>{}</p>\n", escape(summary));
                }
            }
            Section::Experience => {
                for job in record.experience.iter().filter(|job| job.has_content()) {
                    let sub = [Some(job.company.trim()), present(&job.location)]
                        .into_iter()
                        .flatten()
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.write_entry_header(doc, &job.role, &sub, &escape(job.year.trim()));
                    self.write_list(doc, non_blank(&job.bullets));
                }
            }
            Section::Education => {
                for entry in record.education.iter().filter(|entry| entry.has_content()) {
                    let sub = [Some(entry.school.trim()), present(&entry.location)]
                        .into_iter()
                        .flatten()
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.write_entry_header(doc, &entry.degree, &sub, &escape(entry.year.trim()));
                    if let Some(cgpa) = present(&entry.cgpa) {
                        let _ = write!(doc, "<p>CGPA: {}</p>\n", escape(cgpa));
                    }
                    let coursework: Vec<&str> = non_blank(&entry.coursework).collect();
                    if !coursework.is_empty() {
                        let _ = write!(
                            doc,
                            "<p>Relevant Coursework: {}</p>\n",
                            escape(&coursework.join(", "))
                        );
                    }
                }
            }
            Section::Projects => {
                for project in record.projects.iter().filter(|project| project.has_content()) {
                    let side = match present(&project.github_url) {
                        Some(url) => format!("<a href=\"{}\">GitHub</a>", escape(url)),
                        None => String::new(),
                    };
                    self.write_entry_header(doc, &project.title, "", &side);
                    self.write_list(doc, non_blank(&project.bullets));
                }
            }
            Section::Skills => {
                for group in &record.skills {
                    let list: Vec<&str> = non_blank(&group.list).collect();
                    if list.is_empty() {
                        continue;
                    }
                    let category = group.category.trim();
                    if category.is_empty() {
                        let _ = write!(doc, "<p>{}</p>\n", escape(&list.join(", ")));
                    } else {
                        let _ = write!(
                            doc,
                            "<p><b>{}:</b> {}</p>\n",
                            escape(category),
                            escape(&list.join(", "))
                        );
                    }
                }
            }
            Section::Certifications => {
                let shown: Vec<String> = record
                    .certifications
                    .iter()
                    .map(|c| c.display().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                self.write_list(doc, shown.iter().map(String::as_str));
            }
            Section::AchievementsAndExtras => {
                for block in ExtrasBlock::ALL.iter().filter(|b| b.is_present(record)) {
                    let _ = write!(doc, "<p class=\"title\">{}</p>\n", escape(block.label()));
                    match block {
                        ExtrasBlock::PersonalDetails => {
                            if let Some(details) = present(&record.personal_details) {
                                let _ = write!(doc, "<p>{}</p>\n", escape(details));
                            }
                        }
                        _ => self.write_list(doc, block.items(record)),
                    }
                }
            }
        }
    }

    /// Title and subtitle on the left, `side` (already escaped markup) on
    /// the right of the first row.
    fn write_entry_header(&self, doc: &mut String, title: &str, subtitle: &str, side: &str) {
        let _ = write!(
            doc,
            "<table class=\"entry\"><tr><td class=\"title\">{}</td><td class=\"side\">{}</td></tr>",
            escape(title.trim()),
            side
        );
        if !subtitle.trim().is_empty() {
            let _ = write!(
                doc,
                "<tr><td class=\"sub\" colspan=\"2\">{}</td></tr>",
                escape(subtitle.trim())
            );
        }
        doc.push_str("</table>\n");
    }

    fn write_list<'r>(&self, doc: &mut String, items: impl IntoIterator<Item = &'r str>) {
        let items: Vec<&str> = items.into_iter().collect();
        if items.is_empty() {
            return;
        }
        doc.push_str("<ul>\n");
        for item in items {
            let _ = write!(doc, "<li>{}</li>\n", escape(item));
        }
        doc.push_str("</ul>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Certification, Project, WorkExperience};

    fn render(record: &ResumeRecord, user_type: UserType) -> String {
        let bytes = WordWriter::new().write(record, user_type, &LayoutConfig::default());
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn markup_is_escaped() {
        let record = ResumeRecord {
            name: "Asha <Rao>".to_string(),
            summary: Some("R&D lead".to_string()),
            ..Default::default()
        };
        let doc = render(&record, UserType::Experienced);
        assert!(doc.contains("<h1>ASHA &lt;RAO&gt;</h1>"));
        assert!(doc.contains("R&amp;D lead"));
        assert!(doc.contains("xmlns:w=\"urn:schemas-microsoft-com:office:word\""));
    }

    #[test]
    fn section_order_follows_user_type() {
        let record = ResumeRecord {
            name: "Asha".to_string(),
            experience: vec![WorkExperience {
                role: "Engineer".to_string(),
                ..Default::default()
            }],
            projects: vec![Project {
                title: "Folio".to_string(),
                github_url: Some("https://github.com/a/folio".to_string()),
                ..Default::default()
            }],
            certifications: vec![Certification::Plain("CKA".to_string())],
            ..Default::default()
        };
        let doc = render(&record, UserType::Fresher);
        let work = doc.find("WORK EXPERIENCE").unwrap();
        let projects = doc.find("ACADEMIC PROJECTS").unwrap();
        let certs = doc.find("CERTIFICATIONS").unwrap();
        assert!(work < projects && projects < certs);
        assert!(!doc.contains("<h2>EDUCATION</h2>"));
        assert!(doc.contains("<a href=\"https://github.com/a/folio\">GitHub</a>"));
        assert!(doc.contains("<li>CKA</li>"));
    }

    #[test]
    fn page_geometry_in_stylesheet() {
        let doc = render(
            &ResumeRecord {
                name: "A".to_string(),
                ..Default::default()
            },
            UserType::Experienced,
        );
        assert!(doc.contains("size: 210mm 300mm; margin: 10mm 15mm 0mm 15mm;"));
    }
}
