mod common;

use common::MapNotes;
use ward_report_pdf::{Error, FailureKind, ReportScope, assemble, report_file_name};

#[test]
fn single_record_produces_numbered_document() {
    let records = vec![common::record(1, "MRN-001", "Sara Ahmed")];
    let source = MapNotes::empty();

    let report = assemble(&records, &source, &common::options()).expect("assemble");

    assert!(report.bytes.starts_with(b"%PDF-"));
    assert_eq!(report.page_count, 1);
    assert_eq!(report.rendered, 1);
    assert!(report.failures.is_empty());

    let text = common::extract_text(&report.bytes);
    assert!(text.contains("Long Stay Patient Report"));
    assert!(text.contains("Generated on: 07/08/2026 09:30"));
    assert!(text.contains("Patient Information"));
    assert!(text.contains("Sara Ahmed"));
    assert!(text.contains("MRN-001"));
    assert!(text.contains("Page 1 of 1"));
    assert!(text.contains("IMD-Care. All rights reserved."));
    assert!(text.contains("This is a computer-generated document."));
}

#[test]
fn footer_numbering_is_consistent_across_pages() {
    let records: Vec<_> = (1..=4)
        .map(|i| common::record(i, &format!("MRN-{i:03}"), &format!("Patient {i}")))
        .collect();
    let notes = records
        .iter()
        .map(|r| {
            let entries = (1..=12)
                .map(|d| common::note(1 + d % 20, &format!("Daily review {d} for record {}.", r.id)))
                .collect();
            (r.id, entries)
        })
        .collect();
    let source = MapNotes::with(notes);

    let report = assemble(&records, &source, &common::options()).expect("assemble");
    assert!(report.page_count >= 2, "expected multi-page, got {}", report.page_count);

    let pages = common::page_texts(&report.bytes);
    assert_eq!(pages.len(), report.page_count);
    for (idx, page) in pages.iter().enumerate() {
        let stamp = format!("Page {} of {}", idx + 1, report.page_count);
        assert!(page.contains(&stamp), "page {} missing footer '{stamp}'", idx + 1);
    }
}

#[test]
fn record_missing_diagnosis_is_excluded_but_others_render() {
    let mut bad = common::record(7, "MRN-BAD", "Excluded Patient");
    bad.admission.as_mut().unwrap().diagnosis = None;
    let records = vec![bad, common::record(8, "MRN-OK", "Included Patient")];
    let source = MapNotes::empty();

    let report = assemble(&records, &source, &common::options()).expect("assemble");

    assert_eq!(report.rendered, 1);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.record_id, 7);
    match &failure.kind {
        FailureKind::Validation(missing) => assert_eq!(missing, &vec!["Missing diagnosis"]),
        other => panic!("unexpected failure kind: {other:?}"),
    }

    let text = common::extract_text(&report.bytes);
    assert!(text.contains("Included Patient"));
    assert!(!text.contains("Excluded Patient"));
}

#[test]
fn all_invalid_records_fail_with_aggregated_reasons() {
    let mut no_mrn = common::record(1, "", "First Patient");
    no_mrn.mrn.clear();
    let mut no_dept = common::record(2, "MRN-002", "Second Patient");
    no_dept.admission.as_mut().unwrap().department = None;
    let source = MapNotes::empty();

    let err = assemble(&[no_mrn, no_dept], &source, &common::options()).unwrap_err();
    let message = err.to_string();
    match err {
        Error::NoValidRecords(failures) => assert_eq!(failures.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(message.contains("no valid patients could be processed"));
    assert!(message.contains("Patient Unknown: Missing MRN"));
    assert!(message.contains("Patient MRN-002: Missing department"));
}

#[test]
fn lookup_failure_renders_record_without_notes() {
    let failing = common::record(10, "MRN-010", "Notes Unavailable");
    let healthy = common::record(11, "MRN-011", "Notes Present");
    let mut source = MapNotes::with(vec![(11, vec![common::note(3, "Responding well to treatment.")])]);
    source.fail.insert(10);

    let report = assemble(
        &[failing, healthy],
        &source,
        &common::options(),
    )
    .expect("assemble");

    assert_eq!(report.rendered, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].record_id, 10);
    assert!(matches!(report.failures[0].kind, FailureKind::Lookup(_)));

    let text = common::extract_text(&report.bytes);
    assert!(text.contains("Notes Unavailable"));
    assert!(text.contains("Responding well to treatment."));
    // only the healthy record gets a notes table
    assert_eq!(common::count_occurrences(&text, "Clinical Notes"), 1);
}

#[test]
fn empty_input_is_rejected() {
    let source = MapNotes::empty();
    let err = assemble(&[], &source, &common::options()).unwrap_err();
    assert!(matches!(err, Error::NoRecords));
}

#[test]
fn output_is_deterministic_for_identical_inputs() {
    let records = vec![
        common::record(1, "MRN-001", "Sara Ahmed"),
        common::record(2, "MRN-002", "Omar Khalil"),
    ];
    let source = MapNotes::with(vec![
        (1, vec![common::note(2, "Stable overnight."), common::note(3, "Afebrile.")]),
        (2, vec![common::note(4, "Awaiting imaging.")]),
    ]);

    let first = assemble(&records, &source, &common::options()).expect("first run");
    let second = assemble(&records, &source, &common::options()).expect("second run");

    assert_eq!(first.page_count, second.page_count);
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn summary_roster_lists_every_valid_record() {
    let records = vec![
        common::record(1, "MRN-001", "Sara Ahmed"),
        common::record(2, "MRN-002", "Omar Khalil"),
    ];
    let source = MapNotes::empty();
    let mut options = common::options();
    options.summary = true;

    let report = assemble(&records, &source, &options).expect("assemble");
    let text = common::extract_text(&report.bytes);

    assert!(text.contains("Patient Name"));
    assert!(text.contains("Attending Doctor"));
    // admitted 01/08, generated 07/08 09:30, so 7 days with the ceiling
    assert_eq!(common::count_occurrences(&text, "7 days"), 2);
}

#[test]
fn specialty_scope_appears_in_header() {
    let records = vec![common::record(1, "MRN-001", "Sara Ahmed")];
    let source = MapNotes::empty();
    let mut options = common::options();
    options.scope = Some(ReportScope::Specialty("Internal Medicine".to_string()));

    let report = assemble(&records, &source, &options).expect("assemble");
    let text = common::extract_text(&report.bytes);
    assert!(text.contains("Specialty: Internal Medicine"));
}

#[test]
fn artifact_name_follows_convention() {
    assert_eq!(
        report_file_name("long-stay-report", common::generated_at()),
        "long-stay-report-07-08-2026-0930.pdf"
    );
}
