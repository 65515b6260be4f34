pub mod paragraphs;
pub mod reader_docx;
pub mod features;
pub mod classifier;
pub mod scanner;
pub mod word_chunker;
pub mod chunk_builder;
pub mod csv_export;

use std::fs::File;
use std::io::{BufReader, Read};

use chapter_model::{AnnotatedRow, DocumentInfo, RuleSet};
use chrono::{DateTime, Utc};
use sha2::Digest;

use reader_docx::DocxError;

/// Result bundle for one scanned document: file-level metadata plus the
/// annotated rows handed to the review step.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub info: DocumentInfo,
    pub rows: Vec<AnnotatedRow>,
}

/// High-level entry: read a .docx by path, scan it under the given rules and
/// return annotated rows plus document metadata.
pub fn scan_docx_file(path: &str, rules: &RuleSet) -> Result<ScanOutput, DocxError> {
    let paragraphs = reader_docx::read_docx(path)?;
    let rows = scanner::scan_paragraphs(&paragraphs, rules);
    let info = document_info(path, &rows);
    Ok(ScanOutput { info, rows })
}

// --- Metadata enrichment helpers --------------------------------------------------------------

/// File-level metadata for a completed scan: size, content hash, timestamps
/// and row counts. Missing pieces stay `None` rather than failing the scan.
pub fn document_info(path: &str, rows: &[AnnotatedRow]) -> DocumentInfo {
    let mut info = DocumentInfo {
        source_path: path.to_string(),
        extracted_at: Utc::now().to_rfc3339(),
        paragraph_count: rows.len(),
        header_count: rows.iter().filter(|r| r.is_header).count(),
        ..DocumentInfo::default()
    };
    if let Ok(md) = std::fs::metadata(path) {
        info.file_size_bytes = Some(md.len());
        if let Ok(mt) = md.modified() {
            info.modified_at = Some(system_time_to_rfc3339(mt));
        }
    }
    if let Some(hex) = compute_sha256_hex(path) {
        info.content_sha256 = Some(hex);
    }
    info
}

fn compute_sha256_hex(path: &str) -> Option<String> {
    let f = File::open(path).ok()?;
    let mut reader = BufReader::new(f);
    let mut hasher = sha2::Sha256::new();
    let mut buf = [0u8; 32 * 1024];
    loop {
        let n = reader.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Some(hex::encode(hasher.finalize()))
}

fn system_time_to_rfc3339(t: std::time::SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.to_rfc3339()
}
