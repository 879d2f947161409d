//! Event pipeline scenarios driven with synthetic events
//!
//! These replay the event sequences a watcher would deliver, without waiting
//! on the OS notification backend.

use std::fs;
use std::path::PathBuf;

use dateindex::{
    EventOutcome, FailurePolicy, FileEvent, FileEventKind, IndexError, LinkOutcome, RemoveOutcome,
};

use crate::common::IndexFixture;

// ============================================================================
// CREATE / MODIFY
// ============================================================================

#[test]
fn test_created_report_is_indexed_by_year_and_month() {
    let fx = IndexFixture::new();
    let source = fx.add_file("report-20230714-final.csv", "a,b\n");

    let outcome = fx
        .pipeline(FailurePolicy::FailFast)
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap();

    assert_eq!(outcome, EventOutcome::Linked(LinkOutcome::Created));
    assert!(fx.is_linked("2023/7/report-20230714-final.csv", &source));
    assert_eq!(
        fx.index_entries(),
        vec![PathBuf::from("2023/7/report-20230714-final.csv")]
    );
}

#[test]
fn test_create_then_modify_is_a_no_op() {
    let fx = IndexFixture::new();
    let source = fx.add_file("report-20230714-final.csv", "a,b\n");
    let pipeline = fx.pipeline(FailurePolicy::FailFast);

    pipeline
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap();
    fs::write(&source, "a,b\n1,2\n").unwrap();
    let outcome = pipeline
        .handle(&FileEvent::new(&source, FileEventKind::Modify))
        .unwrap();

    assert_eq!(outcome, EventOutcome::Linked(LinkOutcome::AlreadyIndexed));
    assert_eq!(fx.index_entries().len(), 1);
}

#[test]
fn test_day_first_names_are_indexed() {
    let fx = IndexFixture::new();
    let source = fx.add_file("invoice_28112014.pdf", "%PDF");

    fx.pipeline(FailurePolicy::FailFast)
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap();

    assert!(fx.is_linked("2014/11/invoice_28112014.pdf", &source));
}

#[test]
fn test_nested_source_file_uses_base_name() {
    let fx = IndexFixture::new();
    let source = fx.add_file("2022/scans/receipt-20220105.jpg", "jpg");

    fx.pipeline(FailurePolicy::FailFast)
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap();

    assert!(fx.is_linked("2022/1/receipt-20220105.jpg", &source));
}

#[test]
fn test_same_name_from_other_source_takes_over_entry() {
    let fx = IndexFixture::new();
    let first = fx.add_file("a/report-20230714.csv", "first");
    let second = fx.add_file("b/report-20230714.csv", "second");
    let pipeline = fx.pipeline(FailurePolicy::FailFast);

    pipeline
        .handle(&FileEvent::new(&first, FileEventKind::Create))
        .unwrap();
    let outcome = pipeline
        .handle(&FileEvent::new(&second, FileEventKind::Create))
        .unwrap();

    assert_eq!(outcome, EventOutcome::Linked(LinkOutcome::Replaced));
    assert!(fx.is_linked("2023/7/report-20230714.csv", &second));
}

// ============================================================================
// DELETE / RENAME
// ============================================================================

#[test]
fn test_rename_away_removes_index_entry() {
    let fx = IndexFixture::new();
    let source = fx.add_file("report-20230714-final.csv", "a,b\n");
    let pipeline = fx.pipeline(FailurePolicy::FailFast);
    pipeline
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap();

    let moved = fx.root().join("report-20230714-final.csv");
    fs::rename(&source, &moved).unwrap();
    let rename = notify::Event::new(notify::EventKind::Modify(notify::event::ModifyKind::Name(
        notify::event::RenameMode::From,
    )))
    .add_path(source.clone());

    let outcomes: Vec<_> = FileEvent::from_notify(rename)
        .iter()
        .map(|event| pipeline.handle(event).unwrap())
        .collect();

    assert_eq!(outcomes, vec![EventOutcome::Unlinked(RemoveOutcome::Removed)]);
    assert!(!fx.has_entry("2023/7/report-20230714-final.csv"));
}

#[test]
fn test_rename_within_source_moves_entry() {
    let fx = IndexFixture::new();
    let old = fx.add_file("draft-20230714.txt", "x");
    let pipeline = fx.pipeline(FailurePolicy::FailFast);
    pipeline
        .handle(&FileEvent::new(&old, FileEventKind::Create))
        .unwrap();

    let new = fx.src_file("final-20230801.txt");
    fs::rename(&old, &new).unwrap();
    let rename = notify::Event::new(notify::EventKind::Modify(notify::event::ModifyKind::Name(
        notify::event::RenameMode::Both,
    )))
    .add_path(old.clone())
    .add_path(new.clone());

    for event in FileEvent::from_notify(rename) {
        pipeline.handle(&event).unwrap();
    }

    assert!(!fx.has_entry("2023/7/draft-20230714.txt"));
    assert!(fx.is_linked("2023/8/final-20230801.txt", &new));
}

#[test]
fn test_delete_without_entry_is_harmless() {
    let fx = IndexFixture::new();
    let outcome = fx
        .pipeline(FailurePolicy::FailFast)
        .handle(&FileEvent::new(
            fx.src_file("never-20230714.txt"),
            FileEventKind::Delete,
        ))
        .unwrap();
    assert_eq!(outcome, EventOutcome::Unlinked(RemoveOutcome::Missing));
}

// ============================================================================
// IGNORED / DROPPED
// ============================================================================

#[test]
fn test_undated_file_is_not_indexed() {
    let fx = IndexFixture::new();
    let source = fx.add_file("notes.txt", "hello");

    let outcome = fx
        .pipeline(FailurePolicy::FailFast)
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap();

    assert_eq!(outcome, EventOutcome::NoDate);
    assert!(fx.index_entries().is_empty());
}

#[test]
fn test_impossible_date_is_dropped_and_processing_continues() {
    let fx = IndexFixture::new();
    let bad = fx.add_file("scan-31022023.pdf", "x");
    let good = fx.add_file("scan-20230228.pdf", "y");
    let pipeline = fx.pipeline(FailurePolicy::FailFast);

    let first = pipeline
        .handle(&FileEvent::new(&bad, FileEventKind::Create))
        .unwrap();
    let second = pipeline
        .handle(&FileEvent::new(&good, FileEventKind::Create))
        .unwrap();

    assert_eq!(first, EventOutcome::InvalidDate);
    assert_eq!(second, EventOutcome::Linked(LinkOutcome::Created));
    assert_eq!(
        fx.index_entries(),
        vec![PathBuf::from("2023/2/scan-20230228.pdf")]
    );
}

#[test]
fn test_fail_fast_surfaces_filesystem_error() {
    let fx = IndexFixture::new();
    fs::write(fx.idx(), "blocks the index root").unwrap();
    let source = fx.add_file("a-20230714.txt", "x");

    let err = fx
        .pipeline(FailurePolicy::FailFast)
        .handle(&FileEvent::new(&source, FileEventKind::Create))
        .unwrap_err();

    assert!(matches!(err, IndexError::Filesystem { .. }));
}
