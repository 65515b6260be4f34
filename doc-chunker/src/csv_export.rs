use std::fs;
use std::path::Path;

use chapter_model::ChunkRow;
use csv::WriterBuilder;
use encoding_rs::SHIFT_JIS;

/// Byte-order marker prepended to UTF-8 output so spreadsheets pick the right
/// encoding on open.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Output encoding for the chunk CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvEncoding {
    #[default]
    Utf8Bom,
    ShiftJis,
}

impl CsvEncoding {
    pub fn label(self) -> &'static str {
        match self {
            CsvEncoding::Utf8Bom => "UTF-8 (BOM)",
            CsvEncoding::ShiftJis => "Shift_JIS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CsvExportError {
    #[error("failed to serialize chunk rows: {0}")]
    Serialize(String),
    #[error("output contains characters not representable in {0}")]
    Encode(&'static str),
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize chunk rows to CSV bytes in the default UTF-8-with-BOM encoding.
/// The header row comes from the `ChunkRow` field order:
/// book_name, author_name, chapter_name, text_chunk.
pub fn chunk_rows_to_csv(rows: &[ChunkRow]) -> Result<Vec<u8>, CsvExportError> {
    chunk_rows_to_csv_encoded(rows, CsvEncoding::Utf8Bom)
}

/// Serialize chunk rows to CSV bytes in the given encoding.
pub fn chunk_rows_to_csv_encoded(
    rows: &[ChunkRow],
    encoding: CsvEncoding,
) -> Result<Vec<u8>, CsvExportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CsvExportError::Serialize(e.to_string()))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| CsvExportError::Serialize(e.to_string()))?;

    match encoding {
        CsvEncoding::Utf8Bom => {
            let mut out = Vec::with_capacity(UTF8_BOM.len() + data.len());
            out.extend_from_slice(UTF8_BOM);
            out.extend_from_slice(&data);
            Ok(out)
        }
        CsvEncoding::ShiftJis => {
            // csv wrote valid UTF-8; re-encode the whole buffer
            let text = String::from_utf8(data).map_err(|e| CsvExportError::Serialize(e.to_string()))?;
            let (encoded, _, had_errors) = SHIFT_JIS.encode(&text);
            if had_errors {
                return Err(CsvExportError::Encode(CsvEncoding::ShiftJis.label()));
            }
            Ok(encoded.into_owned())
        }
    }
}

/// Write the chunk CSV for one run to `path`.
pub fn write_chunk_csv(
    path: impl AsRef<Path>,
    rows: &[ChunkRow],
    encoding: CsvEncoding,
) -> Result<(), CsvExportError> {
    let path = path.as_ref();
    let bytes = chunk_rows_to_csv_encoded(rows, encoding)?;
    fs::write(path, bytes).map_err(|source| CsvExportError::Write {
        path: path.display().to_string(),
        source,
    })
}
