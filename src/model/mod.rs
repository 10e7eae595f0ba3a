//! # Resume Model
//!
//! The input representation for the exporter: one structured resume record,
//! produced upstream (usually by an AI rewrite step) and treated as read-only
//! from here on. Every section is optional. Lists keep the order they arrive
//! in; nothing here sorts.
//!
//! The model also owns the domain policy that is shared by every output
//! format: which sections a user type gets, in which order, under which
//! titles, and how the loosely-shaped certification entries are displayed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::FolioError;

/// A complete resume ready for export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    /// The only required field. Validated before layout, never by it.
    pub name: String,
    #[serde(deserialize_with = "optional_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub github: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub summary: Option<String>,
    #[serde(alias = "workExperience")]
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub skills: Vec<SkillGroup>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<String>,
    pub extra_curricular: Vec<String>,
    pub languages: Vec<String>,
    #[serde(deserialize_with = "optional_text")]
    pub personal_details: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub role: String,
    pub company: String,
    #[serde(deserialize_with = "optional_text")]
    pub location: Option<String>,
    #[serde(alias = "duration")]
    pub year: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    #[serde(alias = "institution")]
    pub school: String,
    #[serde(deserialize_with = "optional_text")]
    pub location: Option<String>,
    pub year: String,
    /// Grades arrive as text ("8.7/10") or bare numbers.
    #[serde(deserialize_with = "optional_text")]
    pub cgpa: Option<String>,
    pub coursework: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub bullets: Vec<String>,
    #[serde(deserialize_with = "optional_text")]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGroup {
    pub category: String,
    #[serde(alias = "skills")]
    pub list: Vec<String>,
}

impl WorkExperience {
    /// Whether any field would put text on the page.
    pub fn has_content(&self) -> bool {
        !self.role.trim().is_empty()
            || !self.company.trim().is_empty()
            || !self.year.trim().is_empty()
            || present(&self.location).is_some()
            || non_blank(&self.bullets).next().is_some()
    }
}

impl Education {
    pub fn has_content(&self) -> bool {
        !self.degree.trim().is_empty()
            || !self.school.trim().is_empty()
            || !self.year.trim().is_empty()
            || present(&self.location).is_some()
            || present(&self.cgpa).is_some()
            || non_blank(&self.coursework).next().is_some()
    }
}

impl Project {
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty()
            || present(&self.github_url).is_some()
            || non_blank(&self.bullets).next().is_some()
    }
}

/// Accept a string, a number, or null/absent. Blank strings count as absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Trimmed, non-empty view of an optional field.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl ResumeRecord {
    /// Contact fields in display order: location, phone, email, linkedin, github.
    pub fn contact_fields(&self) -> Vec<&str> {
        [
            &self.location,
            &self.phone,
            &self.email,
            &self.linkedin,
            &self.github,
        ]
        .into_iter()
        .filter_map(present)
        .collect()
    }

    /// The pipe-separated contact line, or `None` when no field is set.
    pub fn contact_line(&self) -> Option<String> {
        let fields = self.contact_fields();
        if fields.is_empty() {
            None
        } else {
            Some(fields.join(" | "))
        }
    }

    /// Upstream check run by the export entry points before layout.
    pub fn validate(&self) -> Result<(), FolioError> {
        if self.name.trim().is_empty() {
            return Err(FolioError::InvalidInput(
                "resume name is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn metadata(&self) -> Metadata {
        let name = self.name.trim();
        Metadata {
            title: Some(format!("{} - Resume", name)),
            author: Some(name.to_string()),
            subject: Some("Resume".to_string()),
        }
    }
}

/// Document metadata embedded in the output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

// ─── Certifications ─────────────────────────────────────────────

/// A certification entry. Upstream data mixes plain strings with objects
/// carrying any subset of `title`, `issuer`, `description` and `name`; each
/// recognized shape gets its own variant so display is an exhaustive match.
#[derive(Debug, Clone, PartialEq)]
pub enum Certification {
    Plain(String),
    Issued { title: String, issuer: String },
    Described { title: String, description: String },
    Named(String),
    Titled(String),
    DescriptionOnly(String),
    /// An object with none of the recognized keys set, but some other
    /// non-empty values. Displayed as those values joined.
    Fields(Map<String, Value>),
    /// Anything else: empty objects, numbers, arrays, null.
    Other(Value),
}

/// The text of a value when it is "truthy": a non-blank string, a non-zero
/// number or `true`.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

impl From<Value> for Certification {
    fn from(value: Value) -> Self {
        let map = match value {
            Value::String(s) => return Certification::Plain(s),
            Value::Object(map) => map,
            other => return Certification::Other(other),
        };

        let field = |key: &str| map.get(key).and_then(truthy_text);
        let title = field("title");
        let issuer = field("issuer");
        let description = field("description");
        let name = field("name");

        match (title, issuer, description, name) {
            (Some(title), Some(issuer), _, _) => Certification::Issued { title, issuer },
            (Some(title), None, Some(description), _) => {
                Certification::Described { title, description }
            }
            (_, _, _, Some(name)) => Certification::Named(name),
            (Some(title), _, _, _) => Certification::Titled(title),
            (None, _, Some(description), _) => Certification::DescriptionOnly(description),
            (None, _, None, None) => {
                if map.values().any(|v| truthy_text(v).is_some()) {
                    Certification::Fields(map)
                } else {
                    Certification::Other(Value::Object(map))
                }
            }
        }
    }
}

impl From<Certification> for Value {
    fn from(cert: Certification) -> Self {
        let object = |pairs: &[(&str, String)]| {
            Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                    .collect(),
            )
        };
        match cert {
            Certification::Plain(s) => Value::String(s),
            Certification::Issued { title, issuer } => {
                object(&[("title", title), ("issuer", issuer)])
            }
            Certification::Described { title, description } => {
                object(&[("title", title), ("description", description)])
            }
            Certification::Named(name) => object(&[("name", name)]),
            Certification::Titled(title) => object(&[("title", title)]),
            Certification::DescriptionOnly(d) => object(&[("description", d)]),
            Certification::Fields(map) => Value::Object(map),
            Certification::Other(v) => v,
        }
    }
}

impl Serialize for Certification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Certification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Certification::from)
    }
}

impl Certification {
    /// The single line shown for this entry. Total: never fails, and only
    /// empty-shaped input produces an empty string.
    pub fn display(&self) -> String {
        match self {
            Certification::Plain(s) => s.trim().to_string(),
            Certification::Issued { title, issuer } => format!("{} - {}", title, issuer),
            Certification::Described { title, description } => {
                format!("{} - {}", title, description)
            }
            Certification::Named(name) => name.clone(),
            Certification::Titled(title) => title.clone(),
            Certification::DescriptionOnly(description) => description.clone(),
            Certification::Fields(map) => map
                .values()
                .filter_map(truthy_text)
                .collect::<Vec<_>>()
                .join(" - "),
            Certification::Other(Value::Null) => String::new(),
            Certification::Other(Value::String(s)) => s.clone(),
            Certification::Other(value) => value.to_string(),
        }
    }
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

// ─── User type & section policy ─────────────────────────────────

/// Who the resume is for. Selects section order and a couple of titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Experienced,
    Fresher,
}

impl FromStr for UserType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "experienced" => Ok(UserType::Experienced),
            "fresher" => Ok(UserType::Fresher),
            other => Err(FolioError::InvalidInput(format!(
                "unknown user type '{}' (expected 'experienced' or 'fresher')",
                other
            ))),
        }
    }
}

/// One named, independently omittable block of the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Projects,
    Skills,
    Certifications,
    AchievementsAndExtras,
}

const EXPERIENCED_ORDER: &[Section] = &[
    Section::Summary,
    Section::Experience,
    Section::Projects,
    Section::Skills,
    Section::Certifications,
    Section::Education,
];

// Freshers lead with education.
const FRESHER_ORDER: &[Section] = &[
    Section::Summary,
    Section::Education,
    Section::Experience,
    Section::Projects,
    Section::Skills,
    Section::Certifications,
    Section::AchievementsAndExtras,
];

impl UserType {
    /// Sections below the header, in drawing order.
    pub fn section_order(&self) -> &'static [Section] {
        match self {
            UserType::Experienced => EXPERIENCED_ORDER,
            UserType::Fresher => FRESHER_ORDER,
        }
    }
}

impl Section {
    pub fn title(&self, user_type: UserType) -> &'static str {
        match (self, user_type) {
            (Section::Summary, _) => "PROFESSIONAL SUMMARY",
            (Section::Experience, UserType::Fresher) => "WORK EXPERIENCE",
            (Section::Experience, UserType::Experienced) => "EXPERIENCE",
            (Section::Education, _) => "EDUCATION",
            (Section::Projects, UserType::Fresher) => "ACADEMIC PROJECTS",
            (Section::Projects, UserType::Experienced) => "PROJECTS",
            (Section::Skills, _) => "TECHNICAL SKILLS",
            (Section::Certifications, _) => "CERTIFICATIONS",
            (Section::AchievementsAndExtras, _) => "ACHIEVEMENTS & ACTIVITIES",
        }
    }

    /// Whether the record has anything to show for this section.
    pub fn is_present(&self, record: &ResumeRecord) -> bool {
        match self {
            Section::Summary => present(&record.summary).is_some(),
            Section::Experience => record.experience.iter().any(WorkExperience::has_content),
            Section::Education => record.education.iter().any(Education::has_content),
            Section::Projects => record.projects.iter().any(Project::has_content),
            Section::Skills => record
                .skills
                .iter()
                .any(|g| non_blank(&g.list).next().is_some()),
            Section::Certifications => record
                .certifications
                .iter()
                .any(|c| !c.display().trim().is_empty()),
            Section::AchievementsAndExtras => {
                ExtrasBlock::ALL.iter().any(|b| b.is_present(record))
            }
        }
    }
}

/// The labeled sub-blocks of the achievements section, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrasBlock {
    Achievements,
    ExtraCurricular,
    Languages,
    PersonalDetails,
}

impl ExtrasBlock {
    pub const ALL: [ExtrasBlock; 4] = [
        ExtrasBlock::Achievements,
        ExtrasBlock::ExtraCurricular,
        ExtrasBlock::Languages,
        ExtrasBlock::PersonalDetails,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExtrasBlock::Achievements => "Achievements",
            ExtrasBlock::ExtraCurricular => "Extra-curricular Activities",
            ExtrasBlock::Languages => "Languages Known",
            ExtrasBlock::PersonalDetails => "Personal Details",
        }
    }

    /// Bullet items for the list blocks; empty for the paragraph block.
    pub fn items<'r>(&self, record: &'r ResumeRecord) -> Vec<&'r str> {
        match self {
            ExtrasBlock::Achievements => non_blank(&record.achievements).collect(),
            ExtrasBlock::ExtraCurricular => non_blank(&record.extra_curricular).collect(),
            ExtrasBlock::Languages => non_blank(&record.languages).collect(),
            ExtrasBlock::PersonalDetails => Vec::new(),
        }
    }

    pub fn is_present(&self, record: &ResumeRecord) -> bool {
        match self {
            ExtrasBlock::PersonalDetails => present(&record.personal_details).is_some(),
            _ => !self.items(record).is_empty(),
        }
    }
}

// ─── Export formats & filenames ─────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Word,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "doc",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Word => "application/msword",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "word" | "doc" | "docx" => Ok(ExportFormat::Word),
            other => Err(FolioError::InvalidInput(format!(
                "unknown export format '{}' (expected 'pdf' or 'word')",
                other
            ))),
        }
    }
}

fn underscored(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `<Name>[_<TargetRole>]_Resume.<ext>`, with whitespace runs turned into
/// underscores.
pub fn export_filename(name: &str, target_role: Option<&str>, format: ExportFormat) -> String {
    let mut parts = Vec::new();
    let name = underscored(name);
    if !name.is_empty() {
        parts.push(name);
    }
    if let Some(role) = target_role.map(underscored).filter(|r| !r.is_empty()) {
        parts.push(role);
    }
    parts.push("Resume".to_string());
    format!("{}.{}", parts.join("_"), format.extension())
}
