//! # Folio CLI
//!
//! Usage:
//!   folio resume.json -o resume.pdf
//!   cat resume.json | folio --user-type fresher --format word
//!   folio --example > resume.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use folio::{export_with, ExportFormat, ExportRequest, FolioError, LayoutConfig, ResumeRecord, UserType};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Lay out a structured resume as PDF or Word", long_about = None)]
struct Cli {
    /// Resume JSON file (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (derived from the name and target role if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Section order and titles
    #[arg(long, value_enum, default_value = "experienced")]
    user_type: UserTypeArg,

    /// Output format
    #[arg(long, value_enum, default_value = "pdf")]
    format: FormatArg,

    /// Role the resume targets; included in the default filename
    #[arg(long, value_name = "ROLE")]
    target_role: Option<String>,

    /// JSON file overriding parts of the page layout
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Print a sample resume JSON and exit
    #[arg(long)]
    example: bool,

    /// Log page breaks and section heights
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum UserTypeArg {
    Experienced,
    Fresher,
}

impl From<UserTypeArg> for UserType {
    fn from(arg: UserTypeArg) -> Self {
        match arg {
            UserTypeArg::Experienced => UserType::Experienced,
            UserTypeArg::Fresher => UserType::Fresher,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Pdf,
    Word,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Word => ExportFormat::Word,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.example {
        print!("{}", example_resume_json());
        return;
    }

    if let Err(e) = run(&cli) {
        log::debug!("export failed: {:?}", e);
        eprintln!("✗ {}", e.user_message());
        eprintln!("  {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), FolioError> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let record: ResumeRecord = serde_json::from_str(&input)?;

    let config = match &cli.layout {
        Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };

    let request = ExportRequest {
        record: &record,
        user_type: cli.user_type.into(),
        format: cli.format.into(),
        target_role: cli.target_role.as_deref(),
    };
    let document = export_with(&request, &config)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&document.filename));
    fs::write(&output, &document.bytes)?;
    eprintln!(
        "✓ Written {} bytes to {}",
        document.bytes.len(),
        output.display()
    );
    Ok(())
}

fn example_resume_json() -> &'static str {
    r##"{
  "name": "Asha Rao",
  "location": "Pune, India",
  "phone": "+91 98765 43210",
  "email": "asha.rao@example.com",
  "linkedin": "linkedin.com/in/asharao",
  "github": "github.com/asharao",
  "summary": "Backend engineer with five years of experience building data pipelines and payment systems in Rust and Go. Comfortable owning services end to end, from schema design to on-call.",
  "experience": [
    {
      "role": "Senior Software Engineer",
      "company": "Finch Payments",
      "location": "Bengaluru",
      "year": "2022 - Present",
      "bullets": [
        "Rebuilt the settlement ledger in Rust, cutting nightly reconciliation from 4 hours to 20 minutes.",
        "Designed an idempotent webhook delivery service handling 30M events per day with at-least-once guarantees.",
        "Mentored four engineers and ran the team's design review process."
      ]
    },
    {
      "role": "Software Engineer",
      "company": "Kestrel Analytics",
      "location": "Pune",
      "year": "2019 - 2022",
      "bullets": [
        "Built a streaming ingestion pipeline on Kafka and ClickHouse serving dashboards for 200 customers.",
        "Introduced contract tests between services, reducing integration incidents by 60%."
      ]
    }
  ],
  "projects": [
    {
      "title": "Tiny Raft",
      "githubUrl": "https://github.com/asharao/tiny-raft",
      "bullets": [
        "Raft consensus in 2k lines of Rust with a deterministic network simulator for fault injection."
      ]
    }
  ],
  "skills": [
    { "category": "Languages", "list": ["Rust", "Go", "Python", "SQL"] },
    { "category": "Infrastructure", "list": ["Kafka", "PostgreSQL", "ClickHouse", "Kubernetes", "Terraform"] }
  ],
  "certifications": [
    { "title": "Certified Kubernetes Administrator", "issuer": "CNCF" },
    "AWS Certified Developer - Associate"
  ],
  "education": [
    {
      "degree": "B.Tech, Computer Science",
      "school": "College of Engineering Pune",
      "year": "2015 - 2019",
      "cgpa": "8.6/10"
    }
  ]
}
"##
}
