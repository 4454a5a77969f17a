use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;

use ward_report_pdf::{
    LookupError, NoteEntry, NotesSource, ReportOptions, ReportRecord, ReportScope,
    report_file_name, write_report,
};

#[derive(Parser)]
#[command(name = "ward-report-pdf", version, about = "Generate a paginated ward report PDF")]
struct Args {
    /// JSON file with patient records and their notes
    input: PathBuf,

    /// Output path; defaults to long-stay-report-<DD-MM-YYYY-HHmm>.pdf
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report title
    #[arg(long, default_value = "Long Stay Patient Report")]
    title: String,

    /// Scope the report to a specialty (shown in the header)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    specialty: Option<String>,

    /// Period start (YYYY-MM-DD, shown in the header)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Period end (YYYY-MM-DD, shown in the header)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Include the summary roster table before the per-patient sections
    #[arg(long)]
    summary: bool,

    /// PNG logo for the header
    #[arg(long)]
    logo: Option<PathBuf>,
}

#[derive(serde::Deserialize)]
struct InputFile {
    patients: Vec<InputPatient>,
}

#[derive(serde::Deserialize)]
struct InputPatient {
    #[serde(flatten)]
    record: ReportRecord,
    #[serde(default)]
    notes: Vec<NoteEntry>,
}

/// Notes bundled in the input file, keyed by record id.
struct FileNotes {
    notes: HashMap<i64, Vec<NoteEntry>>,
}

impl NotesSource for FileNotes {
    fn fetch_notes(&self, record_id: i64) -> Result<Vec<NoteEntry>, LookupError> {
        Ok(self.notes.get(&record_id).cloned().unwrap_or_default())
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let data = std::fs::read_to_string(&args.input)?;
    let input: InputFile = serde_json::from_str(&data)?;

    let generated_at = Local::now().naive_local();
    let mut options = ReportOptions::new(args.title, generated_at);
    options.summary = args.summary;
    options.scope = match (args.specialty, args.from, args.to) {
        (Some(name), _, _) => Some(ReportScope::Specialty(name)),
        (None, Some(start), Some(end)) => Some(ReportScope::DateRange { start, end }),
        _ => None,
    };
    if let Some(path) = args.logo {
        options.logo_png = Some(std::fs::read(path)?);
    }

    let mut records = Vec::with_capacity(input.patients.len());
    let mut notes = HashMap::new();
    for patient in input.patients {
        notes.insert(patient.record.id, patient.notes);
        records.push(patient.record);
    }
    let source = FileNotes { notes };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(report_file_name("long-stay-report", generated_at)));

    let report = write_report(&output, &records, &source, &options)?;

    if !report.failures.is_empty() {
        eprintln!("warning: {} record(s) skipped or incomplete:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {failure}");
        }
    }
    println!("{} ({} pages)", output.display(), report.page_count);

    Ok(())
}
