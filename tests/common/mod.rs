#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};

use ward_report_pdf::{
    Admission, LookupError, NoteAuthor, NoteEntry, NotesSource, ReportOptions, ReportRecord,
};

pub fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 7)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn record(id: i64, mrn: &str, name: &str) -> ReportRecord {
    ReportRecord {
        id,
        mrn: mrn.to_string(),
        name: name.to_string(),
        admission: Some(Admission {
            admission_date: NaiveDate::from_ymd_opt(2026, 8, 1),
            department: Some("Internal Medicine".to_string()),
            diagnosis: Some("Community-acquired pneumonia".to_string()),
            doctor: Some("Dr. Amina Hassan".to_string()),
        }),
    }
}

pub fn note(day: u32, content: &str) -> NoteEntry {
    NoteEntry {
        created_at: NaiveDate::from_ymd_opt(2026, 8, day)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap(),
        author: NoteAuthor {
            name: "J. Doe".to_string(),
            medical_code: None,
            role: None,
            department: None,
        },
        content: content.to_string(),
    }
}

pub fn options() -> ReportOptions {
    ReportOptions::new("Long Stay Patient Report", generated_at())
}

/// In-memory notes store; ids listed in `fail` error out like an
/// unavailable backend.
pub struct MapNotes {
    pub notes: HashMap<i64, Vec<NoteEntry>>,
    pub fail: HashSet<i64>,
}

impl MapNotes {
    pub fn empty() -> Self {
        Self {
            notes: HashMap::new(),
            fail: HashSet::new(),
        }
    }

    pub fn with(notes: Vec<(i64, Vec<NoteEntry>)>) -> Self {
        Self {
            notes: notes.into_iter().collect(),
            fail: HashSet::new(),
        }
    }
}

impl NotesSource for MapNotes {
    fn fetch_notes(&self, record_id: i64) -> Result<Vec<NoteEntry>, LookupError> {
        if self.fail.contains(&record_id) {
            return Err(LookupError::new("note store unavailable"));
        }
        Ok(self.notes.get(&record_id).cloned().unwrap_or_default())
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Inflate every Flate stream in the document, in file order. Page content
/// streams come out in page order.
pub fn content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut i = 0;
    while let Some(pos) = find(pdf, b"stream\n", i) {
        // skip matches inside the "endstream" keyword
        if pos >= 3 && &pdf[pos - 3..pos] == b"end" {
            i = pos + 7;
            continue;
        }
        let start = pos + 7;
        let Some(end_kw) = find(pdf, b"endstream", start) else {
            break;
        };
        let mut end = end_kw;
        while end > start && (pdf[end - 1] == b'\n' || pdf[end - 1] == b'\r') {
            end -= 1;
        }
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[start..end]) {
            out.push(raw);
        }
        i = end_kw + 9;
    }
    out
}

/// Pull every string out of one content stream, both `(...)` literal
/// strings and `<...>` hex strings (pdf-writer emits the latter for text
/// containing bytes that would need escaping, e.g. the copyright sign).
pub fn stream_text(stream: &[u8]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < stream.len() {
        if stream[i] == b'(' {
            i += 1;
            let mut s = Vec::new();
            while i < stream.len() && stream[i] != b')' {
                if stream[i] == b'\\' && i + 1 < stream.len() {
                    i += 1;
                }
                s.push(stream[i]);
                i += 1;
            }
            out.push_str(&String::from_utf8_lossy(&s));
            out.push('\n');
        } else if stream[i] == b'<'
            && stream.get(i + 1) != Some(&b'<')
            && (i == 0 || stream[i - 1] != b'<')
        {
            // Hex string literal: collect hex digits until '>'.
            i += 1;
            let mut hex = String::new();
            while i < stream.len() && stream[i] != b'>' {
                if stream[i].is_ascii_hexdigit() {
                    hex.push(stream[i] as char);
                }
                i += 1;
            }
            if hex.len() % 2 == 1 {
                hex.push('0');
            }
            let bytes: Vec<u8> = (0..hex.len())
                .step_by(2)
                .map(|k| u8::from_str_radix(&hex[k..k + 2], 16).unwrap_or(0))
                .collect();
            out.push_str(&String::from_utf8_lossy(&bytes));
            out.push('\n');
        }
        i += 1;
    }
    out
}

/// All text in the document, page streams concatenated.
pub fn extract_text(pdf: &[u8]) -> String {
    content_streams(pdf)
        .iter()
        .map(|s| stream_text(s))
        .collect()
}

/// Text per page, in page order.
pub fn page_texts(pdf: &[u8]) -> Vec<String> {
    content_streams(pdf)
        .iter()
        .map(|s| stream_text(s))
        .collect()
}

pub fn count_occurrences(text: &str, needle: &str) -> usize {
    text.match_indices(needle).count()
}
