use std::error;
use std::fmt;
use std::io;

/// Fatal assembly errors. Per-record problems are accumulated as
/// [`RecordFailure`]s instead and only become fatal when nothing at all
/// can be rendered.
#[derive(Debug)]
pub enum Error {
    /// The caller supplied an empty record slice.
    NoRecords,
    /// Every supplied record failed validation.
    NoValidRecords(Vec<RecordFailure>),
    /// Validation passed for some records but every section render failed.
    NothingRendered(Vec<RecordFailure>),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoRecords => write!(f, "no patient data provided for the report"),
            Error::NoValidRecords(failures) => {
                writeln!(f, "no valid patients could be processed for the report")?;
                write!(f, "validation errors:")?;
                for failure in failures {
                    write!(f, "\n{failure}")?;
                }
                Ok(())
            }
            Error::NothingRendered(failures) => {
                writeln!(f, "failed to process any patients")?;
                write!(f, "errors:")?;
                for failure in failures {
                    write!(f, "\n{failure}")?;
                }
                Ok(())
            }
            Error::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// A non-fatal problem with one record, reported alongside the artifact.
#[derive(Clone, Debug)]
pub struct RecordFailure {
    pub record_id: i64,
    /// MRN if the record carried one, for human-readable messages.
    pub mrn: String,
    pub kind: FailureKind,
}

#[derive(Clone, Debug)]
pub enum FailureKind {
    /// Missing required fields, e.g. "Missing diagnosis".
    Validation(Vec<&'static str>),
    Lookup(LookupError),
    Layout(LayoutError),
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mrn = if self.mrn.is_empty() { "Unknown" } else { &self.mrn };
        match &self.kind {
            FailureKind::Validation(missing) => {
                write!(f, "Patient {mrn}: {}", missing.join(", "))
            }
            FailureKind::Lookup(err) => {
                write!(f, "Patient {mrn}: note lookup failed: {err}")
            }
            FailureKind::Layout(err) => {
                write!(f, "Patient {mrn}: section layout failed: {err}")
            }
        }
    }
}

/// Note retrieval failure reported by a [`NotesSource`](crate::NotesSource)
/// implementation.
#[derive(Clone, Debug)]
pub struct LookupError {
    pub message: String,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for LookupError {}

/// Malformed table description or cursor state. Fatal for the affected
/// section only; the assembler records it and continues.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutError {
    SpanMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },
    InvalidCursor {
        y: f32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::SpanMismatch { row, expected, got } => write!(
                f,
                "row {row}: cell spans sum to {got}, table declares {expected} columns"
            ),
            LayoutError::InvalidCursor { y } => write!(f, "invalid layout cursor y={y}"),
        }
    }
}

impl error::Error for LayoutError {}
