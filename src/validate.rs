use crate::model::ReportRecord;

/// Outcome of validating one record ahead of layout.
#[derive(Clone, Debug)]
pub struct Validation {
    pub valid: bool,
    pub missing: Vec<&'static str>,
}

/// Checks the fields a report section cannot be laid out without. Failing
/// records are excluded from the document, not fatal, unless every record
/// fails, which the assembler turns into an aggregated error.
pub fn validate(record: &ReportRecord) -> Validation {
    let mut missing = Vec::new();

    if record.id <= 0 {
        missing.push("Missing patient ID");
    }
    if record.name.trim().is_empty() {
        missing.push("Missing patient name");
    }
    if record.mrn.trim().is_empty() {
        missing.push("Missing MRN");
    }

    let admission = record.admission.as_ref();
    if admission.and_then(|a| a.admission_date).is_none() {
        missing.push("Missing admission date");
    }
    if admission
        .and_then(|a| a.department.as_deref())
        .is_none_or(|d| d.trim().is_empty())
    {
        missing.push("Missing department");
    }
    if admission
        .and_then(|a| a.diagnosis.as_deref())
        .is_none_or(|d| d.trim().is_empty())
    {
        missing.push("Missing diagnosis");
    }

    Validation {
        valid: missing.is_empty(),
        missing,
    }
}
