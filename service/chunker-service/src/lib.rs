//! One-shot pipeline over a single document: scan -> review -> chunk -> export.
//!
//! The session object makes the ownership explicit: the scanner creates it,
//! the review step mutates only the header flags, the chunk builder reads it.

use chapter_model::{AnnotatedRow, ChunkParams, ChunkRow, DocumentInfo, RuleSet};
use chrono::Utc;
use doc_chunker::chunk_builder::build_chunk_rows;
use doc_chunker::csv_export::{write_chunk_csv, CsvEncoding, CsvExportError};
use doc_chunker::reader_docx::DocxError;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] DocxError),
    #[error("failed to export CSV: {0}")]
    Export(#[from] CsvExportError),
}

/// Everything a run needs besides the document itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub book_name: String,
    pub author_name: String,
    pub rules: RuleSet,
    pub chunk: ChunkParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            book_name: String::new(),
            author_name: String::new(),
            rules: RuleSet::default(),
            chunk: ChunkParams::default(),
        }
    }
}

impl RunConfig {
    /// Parse a saved run preset (rules + chunk bounds + book/author).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Editable view of one row handed to the review step. The review step sees
/// nothing else, so it cannot touch text, features or ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEdit {
    pub idx: usize,
    pub is_h1: bool,
    pub is_h2: bool,
    pub is_h3: bool,
}

/// Request-scoped pipeline state between scan and export.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    info: DocumentInfo,
    rows: Vec<AnnotatedRow>,
}

impl ReviewSession {
    /// Scan a .docx file into a fresh session.
    pub fn scan(path: &str, config: &RunConfig) -> Result<Self, PipelineError> {
        let output = doc_chunker::scan_docx_file(path, &config.rules)?;
        Ok(Self { info: output.info, rows: output.rows })
    }

    /// Build a session from pre-scanned rows (non-file sources, tests).
    pub fn from_rows(info: DocumentInfo, rows: Vec<AnnotatedRow>) -> Self {
        Self { info, rows }
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    pub fn header_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_header).count()
    }

    /// Run one review edit over the session. The edit function receives flag
    /// proxies only; changed flags are copied back and `is_header` re-derived.
    pub fn review<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut [HeaderEdit]),
    {
        let mut edits: Vec<HeaderEdit> = self
            .rows
            .iter()
            .map(|r| HeaderEdit { idx: r.idx, is_h1: r.is_h1, is_h2: r.is_h2, is_h3: r.is_h3 })
            .collect();
        edit(&mut edits);
        for (row, e) in self.rows.iter_mut().zip(edits.iter()) {
            row.is_h1 = e.is_h1;
            row.is_h2 = e.is_h2;
            row.is_h3 = e.is_h3;
            row.sync_header_flag();
        }
        self.info.header_count = self.rows.iter().filter(|r| r.is_header).count();
    }

    /// Read-only pass over the rows producing the chunk table.
    pub fn build_chunks(&self, config: &RunConfig) -> Vec<ChunkRow> {
        build_chunk_rows(&self.rows, &config.book_name, &config.author_name, config.chunk)
    }
}

/// Outcome summary for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub info: DocumentInfo,
    pub rows_scanned: usize,
    pub headers_detected: usize,
    pub chunks_written: usize,
    /// RFC 3339 timestamp of run completion.
    pub finished_at: String,
    pub warnings: Vec<String>,
}

/// Advice attached to the report when chunking produced nothing.
pub const EMPTY_RESULT_WARNING: &str =
    "no chunks produced; lower the chunk word minimum or loosen the header rules";

/// Identity review step for headless runs: keep the detected flags as-is.
pub fn accept_detected(_rows: &mut [HeaderEdit]) {}

/// Full pipeline over one document. The review function runs between scan and
/// chunking; pass [`accept_detected`] to skip the interactive step. An empty
/// chunk table is a warning, not an error, and writes no file.
pub fn run_pipeline<F>(
    doc_path: &str,
    out_path: &str,
    config: &RunConfig,
    encoding: CsvEncoding,
    review: F,
) -> Result<RunReport, PipelineError>
where
    F: FnOnce(&mut [HeaderEdit]),
{
    let mut session = ReviewSession::scan(doc_path, config)?;
    session.review(review);
    let chunks = session.build_chunks(config);

    let mut warnings = Vec::new();
    if chunks.is_empty() {
        warnings.push(EMPTY_RESULT_WARNING.to_string());
    } else {
        write_chunk_csv(out_path, &chunks, encoding)?;
    }

    Ok(RunReport {
        rows_scanned: session.rows().len(),
        headers_detected: session.header_count(),
        chunks_written: chunks.len(),
        finished_at: Utc::now().to_rfc3339(),
        warnings,
        info: session.info,
    })
}
