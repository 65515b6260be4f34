use std::io::{Cursor, Write};

use chapter_model::{AnnotatedRow, ChunkParams, DocumentInfo, ParagraphFeatures};
use chunker_service::{
    accept_detected, run_pipeline, PipelineError, ReviewSession, RunConfig, EMPTY_RESULT_WARNING,
};
use doc_chunker::csv_export::CsvEncoding;
use zip::write::FileOptions;

fn docx_bytes(document_xml: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", FileOptions::default()).expect("start document.xml");
    zip.write_all(document_xml.as_bytes()).expect("write document.xml");
    zip.finish().expect("finish zip").into_inner()
}

fn paragraph(text: &str, style: Option<&str>) -> String {
    let ppr = style
        .map(|s| format!("<w:pPr><w:pStyle w:val=\"{s}\"/></w:pPr>"))
        .unwrap_or_default();
    format!("<w:p>{ppr}<w:r><w:t>{text}</w:t></w:r></w:p>")
}

fn document(paragraphs: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        paragraphs.concat()
    )
}

fn small_chunks() -> ChunkParams {
    ChunkParams { min_words: 1, max_words: 50, overlap: 0.0 }
}

fn body_row(idx: usize, text: &str) -> AnnotatedRow {
    AnnotatedRow::body(idx, text, ParagraphFeatures::default())
}

#[test]
fn review_edits_propagate_and_resync_is_header() {
    let rows = vec![body_row(0, "Part I"), body_row(1, "some body text")];
    let mut session = ReviewSession::from_rows(DocumentInfo::default(), rows);

    session.review(|edits| {
        edits[0].is_h1 = true;
    });

    assert!(session.rows()[0].is_h1);
    assert!(session.rows()[0].is_header, "is_header is re-derived after review");
    assert_eq!(session.header_count(), 1);

    let mut config = RunConfig::default();
    config.chunk = small_chunks();
    let chunks = session.build_chunks(&config);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chapter_name, "Part I");
    assert_eq!(chunks[0].text_chunk, "some body text");
}

#[test]
fn review_can_also_clear_detected_headers() {
    let mut header = body_row(0, "False positive");
    header.is_h2 = true;
    header.sync_header_flag();
    let rows = vec![header, body_row(1, "body")];
    let mut session = ReviewSession::from_rows(DocumentInfo::default(), rows);

    session.review(|edits| {
        for e in edits.iter_mut() {
            e.is_h2 = false;
        }
    });
    assert_eq!(session.header_count(), 0);

    let mut config = RunConfig::default();
    config.chunk = small_chunks();
    let chunks = session.build_chunks(&config);
    assert_eq!(chunks.len(), 1, "the former header is now body text");
    assert_eq!(chunks[0].chapter_name, "Introduction");
    assert_eq!(chunks[0].text_chunk, "False positive body");
}

#[test]
fn pipeline_writes_chapter_tagged_csv() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let doc_path = dir.path().join("book.docx");
    let out_path = dir.path().join("book.csv");

    let xml = document(&[
        paragraph("Part I", Some("Heading1")),
        paragraph("Alpha beta gamma.", None),
        paragraph("Chapter 1", Some("Heading2")),
        paragraph("Delta epsilon.", None),
    ]);
    std::fs::write(&doc_path, docx_bytes(&xml)).expect("write docx");

    let mut config = RunConfig::default();
    config.book_name = "My Book".into();
    config.author_name = "Someone".into();
    config.chunk = small_chunks();

    let report = run_pipeline(
        doc_path.to_str().expect("utf-8 path"),
        out_path.to_str().expect("utf-8 path"),
        &config,
        CsvEncoding::Utf8Bom,
        accept_detected,
    )
    .expect("pipeline succeeds");

    assert_eq!(report.rows_scanned, 4);
    assert_eq!(report.headers_detected, 2);
    assert_eq!(report.chunks_written, 2);
    assert!(report.warnings.is_empty());
    assert!(!report.finished_at.is_empty());

    let bytes = std::fs::read(&out_path).expect("output exists");
    assert_eq!(&bytes[..3], b"\xef\xbb\xbf");
    let text = String::from_utf8(bytes[3..].to_vec()).expect("valid UTF-8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("book_name,author_name,chapter_name,text_chunk"));
    assert_eq!(lines.next(), Some("My Book,Someone,Part I,Alpha beta gamma."));
    assert_eq!(lines.next(), Some("My Book,Someone,Part I | Chapter 1,Delta epsilon."));
}

#[test]
fn review_function_runs_between_scan_and_chunking() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let doc_path = dir.path().join("book.docx");
    let out_path = dir.path().join("book.csv");

    let xml = document(&[
        paragraph("Part I", Some("Heading1")),
        paragraph("Alpha beta gamma.", None),
    ]);
    std::fs::write(&doc_path, docx_bytes(&xml)).expect("write docx");

    let mut config = RunConfig::default();
    config.chunk = small_chunks();

    // the reviewer rejects the detected header
    let report = run_pipeline(
        doc_path.to_str().expect("utf-8 path"),
        out_path.to_str().expect("utf-8 path"),
        &config,
        CsvEncoding::Utf8Bom,
        |edits| {
            for e in edits.iter_mut() {
                e.is_h1 = false;
            }
        },
    )
    .expect("pipeline succeeds");

    assert_eq!(report.headers_detected, 0);
    let text = String::from_utf8(std::fs::read(&out_path).expect("output exists")[3..].to_vec())
        .expect("valid UTF-8");
    assert!(text.contains("Introduction"), "without headers everything is the Introduction");
    assert!(text.contains("Part I Alpha beta gamma."), "the rejected header joins the body");
}

#[test]
fn empty_chunking_is_a_warning_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let doc_path = dir.path().join("headers-only.docx");
    let out_path = dir.path().join("headers-only.csv");

    let xml = document(&[paragraph("Lonely heading", Some("Heading1"))]);
    std::fs::write(&doc_path, docx_bytes(&xml)).expect("write docx");

    let report = run_pipeline(
        doc_path.to_str().expect("utf-8 path"),
        out_path.to_str().expect("utf-8 path"),
        &RunConfig::default(),
        CsvEncoding::Utf8Bom,
        accept_detected,
    )
    .expect("an empty result is not an error");

    assert_eq!(report.chunks_written, 0);
    assert_eq!(report.warnings, vec![EMPTY_RESULT_WARNING.to_string()]);
    assert!(!out_path.exists(), "no partial output on an empty result");
}

#[test]
fn unreadable_document_aborts_the_run() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let doc_path = dir.path().join("broken.docx");
    let out_path = dir.path().join("broken.csv");
    std::fs::write(&doc_path, b"not a zip archive").expect("write junk");

    let err = run_pipeline(
        doc_path.to_str().expect("utf-8 path"),
        out_path.to_str().expect("utf-8 path"),
        &RunConfig::default(),
        CsvEncoding::Utf8Bom,
        accept_detected,
    )
    .expect_err("junk input must abort");

    assert!(matches!(err, PipelineError::Parse(_)), "unexpected error: {err:?}");
    assert!(!out_path.exists(), "aborted runs leave no partial output");
}

#[test]
fn run_config_round_trips_through_json() {
    let mut config = RunConfig::default();
    config.book_name = "Spirit of Islam".into();
    config.rules.h1.min_size = 15.5;
    config.chunk.overlap = 0.35;

    let json = config.to_json_pretty();
    let parsed = RunConfig::from_json(&json).expect("round trip parses");
    assert_eq!(parsed.book_name, config.book_name);
    assert_eq!(parsed.rules, config.rules);
    assert_eq!(parsed.chunk, config.chunk);
}
