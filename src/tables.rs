use chrono::NaiveDateTime;

use crate::model::{
    Align, Cell, CellStyle, HeaderCell, NoteEntry, ReportRecord, Row, Table, TextCell, VAlign,
};
use crate::style::{
    self, ACCENT, FONT_SIZE_BODY, FONT_SIZE_SMALL, WHITE,
};

const PLACEHOLDER: &str = "N/A";
const TRUNCATION_MARKER: &str = "...";

const INFO_FIELD_MAX: usize = 100;
const AUTHOR_MAX: usize = 50;
const NOTE_MAX: usize = 500;

/// Substitute a placeholder for absent values and bound the length so a
/// single field cannot blow up a row height.
fn sanitize(text: Option<&str>, max_len: usize) -> String {
    match text {
        None => PLACEHOLDER.to_string(),
        Some(t) if t.is_empty() => PLACEHOLDER.to_string(),
        Some(t) => {
            if t.chars().count() > max_len {
                let truncated: String = t.chars().take(max_len).collect();
                format!("{truncated}{TRUNCATION_MARKER}")
            } else {
                t.to_string()
            }
        }
    }
}

fn banner(title: &str, span: usize) -> Row {
    Row {
        cells: vec![Cell::Header(HeaderCell {
            text: title.to_string(),
            span,
        })],
    }
}

fn label(text: &str) -> Cell {
    Cell::Text(TextCell {
        text: text.to_string(),
        span: 1,
        style: CellStyle {
            bold: true,
            ..CellStyle::default()
        },
    })
}

fn value(text: String) -> Cell {
    Cell::Text(TextCell {
        text,
        span: 1,
        style: CellStyle::default(),
    })
}

/// Info block for one record: a banner row followed by label/value pairs
/// arranged two per row. Returns an empty table when the record has no
/// admission context: nothing to render, not an error.
pub fn patient_info_table(record: &ReportRecord) -> Table {
    let col_widths = style::section_col_widths();
    let Some(admission) = record.admission.as_ref() else {
        return Table {
            col_widths,
            rows: Vec::new(),
        };
    };

    let mut rows = vec![
        banner("Patient Information", 4),
        Row {
            cells: vec![
                label("MRN:"),
                value(sanitize(Some(&record.mrn), INFO_FIELD_MAX)),
                label("Department:"),
                value(sanitize(admission.department.as_deref(), INFO_FIELD_MAX)),
            ],
        },
        Row {
            cells: vec![
                label("Patient:"),
                value(sanitize(Some(&record.name), INFO_FIELD_MAX)),
                label("Doctor:"),
                value(sanitize(
                    Some(admission.doctor.as_deref().unwrap_or("Not assigned")),
                    INFO_FIELD_MAX,
                )),
            ],
        },
    ];

    if let Some(date) = admission.admission_date {
        rows.push(Row {
            cells: vec![
                label("Admission:"),
                value(date.format("%d/%m/%Y").to_string()),
                label("Diagnosis:"),
                value(sanitize(admission.diagnosis.as_deref(), INFO_FIELD_MAX)),
            ],
        });
    }

    Table { col_widths, rows }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `name - (code) - Role - department`, dropping absent parts.
fn author_descriptor(note: &NoteEntry) -> String {
    let author = &note.author;
    let mut parts = Vec::new();
    if !author.name.is_empty() {
        parts.push(author.name.clone());
    }
    if let Some(code) = author.medical_code.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("({code})"));
    }
    if let Some(role) = author.role.as_deref().filter(|r| !r.is_empty()) {
        parts.push(capitalize(role));
    }
    if let Some(dept) = author.department.as_deref().filter(|d| !d.is_empty()) {
        parts.push(dept.to_string());
    }
    parts.join(" - ")
}

fn small_cell(text: String, bold: bool, span: usize) -> Cell {
    Cell::Text(TextCell {
        text,
        span,
        style: CellStyle {
            bold,
            font_size: FONT_SIZE_SMALL,
            align: Align::Left,
            valign: VAlign::Top,
            fill: None,
            color: None,
        },
    })
}

/// Notes block: a banner, a Date / Author / Note column-header row, and one
/// row per note with bounded field lengths. Empty input yields an empty
/// table.
pub fn notes_table(notes: &[NoteEntry]) -> Table {
    let col_widths = style::section_col_widths();
    if notes.is_empty() {
        return Table {
            col_widths,
            rows: Vec::new(),
        };
    }

    let mut rows = vec![
        banner("Clinical Notes", 4),
        Row {
            cells: vec![
                small_cell("Date".to_string(), true, 1),
                small_cell("Author".to_string(), true, 1),
                small_cell("Note".to_string(), true, 2),
            ],
        },
    ];

    for note in notes {
        rows.push(Row {
            cells: vec![
                small_cell(note.created_at.format("%d/%m/%Y %H:%M").to_string(), false, 1),
                small_cell(sanitize(Some(&author_descriptor(note)), AUTHOR_MAX), false, 1),
                Cell::Text(TextCell {
                    text: sanitize(Some(&note.content), NOTE_MAX),
                    span: 2,
                    style: CellStyle {
                        font_size: FONT_SIZE_BODY,
                        valign: VAlign::Top,
                        ..CellStyle::default()
                    },
                }),
            ],
        });
    }

    Table { col_widths, rows }
}

/// Stay duration in whole days (ceiling) from midnight of the admission
/// date to the generation instant.
fn stay_days(admitted: chrono::NaiveDate, generated_at: NaiveDateTime) -> i64 {
    let elapsed = generated_at - admitted.and_hms_opt(0, 0, 0).unwrap_or_default();
    let secs = elapsed.num_seconds().max(0);
    (secs + 86_400 - 1) / 86_400
}

fn roster_head(text: &str) -> Cell {
    Cell::Text(TextCell {
        text: text.to_string(),
        span: 1,
        style: CellStyle {
            bold: true,
            font_size: FONT_SIZE_SMALL,
            align: Align::Left,
            valign: VAlign::Middle,
            fill: Some(ACCENT),
            color: Some(WHITE),
        },
    })
}

/// Summary roster across all valid records: one row per record with stay
/// duration relative to the generation timestamp.
pub fn summary_table(records: &[&ReportRecord], generated_at: NaiveDateTime) -> Table {
    let col_widths = style::summary_col_widths();
    if records.is_empty() {
        return Table {
            col_widths,
            rows: Vec::new(),
        };
    }

    let mut rows = vec![Row {
        cells: vec![
            roster_head("Patient Name"),
            roster_head("MRN"),
            roster_head("Department"),
            roster_head("Attending Doctor"),
            roster_head("Admitted"),
            roster_head("Stay"),
        ],
    }];

    for record in records {
        let admission = record.admission.as_ref();
        let admitted = admission.and_then(|a| a.admission_date);
        rows.push(Row {
            cells: vec![
                small_cell(sanitize(Some(&record.name), INFO_FIELD_MAX), false, 1),
                small_cell(sanitize(Some(&record.mrn), INFO_FIELD_MAX), false, 1),
                small_cell(
                    sanitize(admission.and_then(|a| a.department.as_deref()), INFO_FIELD_MAX),
                    false,
                    1,
                ),
                small_cell(
                    sanitize(
                        Some(
                            admission
                                .and_then(|a| a.doctor.as_deref())
                                .unwrap_or("Not assigned"),
                        ),
                        INFO_FIELD_MAX,
                    ),
                    false,
                    1,
                ),
                small_cell(
                    admitted
                        .map(|d| d.format("%d/%m/%Y").to_string())
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                    false,
                    1,
                ),
                small_cell(
                    admitted
                        .map(|d| format!("{} days", stay_days(d, generated_at)))
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                    false,
                    1,
                ),
            ],
        });
    }

    Table { col_widths, rows }
}
