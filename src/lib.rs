mod error;
mod fonts;
mod model;
mod pdf;
mod style;
mod tables;
mod validate;

pub use error::{Error, FailureKind, LayoutError, LookupError, RecordFailure};
pub use model::{
    Admission, Align, Cell, CellStyle, Cursor, HeaderCell, NoteAuthor, NoteEntry, NotesSource,
    ReportOptions, ReportRecord, ReportScope, Row, Table, TextCell, VAlign,
};
pub use pdf::RenderedReport;
pub use style::Rgb;
pub use tables::{notes_table, patient_info_table, summary_table};
pub use validate::{Validation, validate};

use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;

/// Assemble a report document from the given records, fetching each
/// record's notes through `source`. Succeeds as long as at least one
/// section renders; per-record problems are returned in
/// [`RenderedReport::failures`].
pub fn assemble(
    records: &[ReportRecord],
    source: &dyn NotesSource,
    options: &ReportOptions,
) -> Result<RenderedReport, Error> {
    let t0 = Instant::now();

    let report = pdf::render(records, source, options)?;

    log::info!(
        "Timing: assemble={:.1}ms ({} pages, {} of {} records, {} bytes)",
        t0.elapsed().as_secs_f64() * 1000.0,
        report.page_count,
        report.rendered,
        records.len(),
        report.bytes.len(),
    );

    Ok(report)
}

/// Assemble and write the artifact to `output`.
pub fn write_report(
    output: &Path,
    records: &[ReportRecord],
    source: &dyn NotesSource,
    options: &ReportOptions,
) -> Result<RenderedReport, Error> {
    let t0 = Instant::now();

    let report = assemble(records, source, options)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &report.bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.bytes.len(),
    );

    Ok(report)
}

/// Conventional artifact name: `<kind>-<DD-MM-YYYY-HHmm>.pdf`.
pub fn report_file_name(kind: &str, at: NaiveDateTime) -> String {
    format!("{kind}-{}.pdf", at.format("%d-%m-%Y-%H%M"))
}
