use chrono::{NaiveDate, NaiveDateTime};

use crate::error::LookupError;
use crate::style::Rgb;

/// One patient record eligible for a report section.
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
#[derive(Clone, Debug, Default)]
pub struct ReportRecord {
    pub id: i64,
    pub mrn: String,
    pub name: String,
    pub admission: Option<Admission>,
}

/// Admission context for a record. Fields are optional so validation can
/// name each missing one individually.
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
#[derive(Clone, Debug, Default)]
pub struct Admission {
    pub admission_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub diagnosis: Option<String>,
    pub doctor: Option<String>,
}

/// A clinical note. Caller-supplied order is preserved in the rendered
/// table (typically chronological).
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct NoteEntry {
    pub created_at: NaiveDateTime,
    pub author: NoteAuthor,
    pub content: String,
}

#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
#[derive(Clone, Debug, Default)]
pub struct NoteAuthor {
    pub name: String,
    pub medical_code: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

/// Read-side capability for note retrieval. Called once per record, in
/// input order; a failure renders that record without notes instead of
/// aborting the document.
pub trait NotesSource {
    fn fetch_notes(&self, record_id: i64) -> Result<Vec<NoteEntry>, LookupError>;
}

/// Scope label shown in the report header.
#[derive(Clone, Debug)]
pub enum ReportScope {
    Specialty(String),
    DateRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub title: String,
    pub scope: Option<ReportScope>,
    /// Stamped into the header and used for stay-duration arithmetic.
    /// Output bytes are a pure function of the inputs including this value.
    pub generated_at: NaiveDateTime,
    /// Render the summary roster table before the per-record sections.
    pub summary: bool,
    /// Optional PNG logo for the header; decode failure falls back to the
    /// centered title.
    pub logo_png: Option<Vec<u8>>,
}

impl ReportOptions {
    pub fn new(title: impl Into<String>, generated_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            scope: None,
            generated_at,
            summary: false,
            logo_png: None,
        }
    }
}

/// Abstract table description produced by the builders and consumed by the
/// page flow engine.
#[derive(Clone, Debug)]
pub struct Table {
    pub col_widths: Vec<f32>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.col_widths.len()
    }
}

#[derive(Clone, Debug)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// Cell content is a closed set: a section banner or a styled text cell.
#[derive(Clone, Debug)]
pub enum Cell {
    Header(HeaderCell),
    Text(TextCell),
}

impl Cell {
    pub fn span(&self) -> usize {
        match self {
            Cell::Header(h) => h.span,
            Cell::Text(t) => t.span,
        }
    }
}

/// Section banner: accent fill, inverted bold text, spans the whole grid.
#[derive(Clone, Debug)]
pub struct HeaderCell {
    pub text: String,
    pub span: usize,
}

#[derive(Clone, Debug)]
pub struct TextCell {
    pub text: String,
    pub span: usize,
    pub style: CellStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VAlign {
    Top,
    Middle,
}

#[derive(Clone, Debug)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: f32,
    pub align: Align,
    pub valign: VAlign,
    /// Explicit fill; `None` leaves the parity tint to the flow engine.
    pub fill: Option<Rgb>,
    /// Text color; `None` means the default body color.
    pub color: Option<Rgb>,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            bold: false,
            font_size: crate::style::FONT_SIZE_BODY,
            align: Align::Left,
            valign: VAlign::Middle,
            fill: None,
            color: None,
        }
    }
}

/// Layout position: vertical offset on the current page (PDF coordinates,
/// y grows upward) and the zero-based page index. Owned by exactly one
/// in-flight assembly; the flow engine is the only mutator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
}
