use chapter_model::{AnnotatedRow, ChunkParams, ChunkRow, HeaderLevel};

use crate::word_chunker::WordWindows;

/// Chapter label for body text appearing before any header.
pub const DEFAULT_CHAPTER: &str = "Introduction";
pub const DEFAULT_BOOK: &str = "Unknown Book";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
/// Separator between the active H1/H2/H3 labels in a chapter name.
pub const CHAPTER_SEPARATOR: &str = " | ";

/// Active heading context while walking the row sequence.
#[derive(Debug, Clone, Default)]
struct HeadingContext {
    h1: Option<String>,
    h2: Option<String>,
    h3: Option<String>,
}

impl HeadingContext {
    /// A new H1 starts a fresh subtree; a new H2 starts a fresh H3 subtree;
    /// H3 changes touch nothing else.
    fn enter(&mut self, level: HeaderLevel, text: &str) {
        match level {
            HeaderLevel::H1 => {
                self.h1 = Some(text.to_string());
                self.h2 = None;
                self.h3 = None;
            }
            HeaderLevel::H2 => {
                self.h2 = Some(text.to_string());
                self.h3 = None;
            }
            HeaderLevel::H3 => self.h3 = Some(text.to_string()),
        }
    }

    fn chapter_name(&self) -> String {
        let parts: Vec<&str> = [&self.h1, &self.h2, &self.h3]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if parts.is_empty() {
            DEFAULT_CHAPTER.to_string()
        } else {
            parts.join(CHAPTER_SEPARATOR)
        }
    }
}

/// Group body rows under their nearest enclosing headers and split each group
/// into word-bounded, overlapping chunk rows. Rows are read-only here; any
/// review edits must already be applied.
pub fn build_chunk_rows(
    rows: &[AnnotatedRow],
    book_name: &str,
    author_name: &str,
    params: ChunkParams,
) -> Vec<ChunkRow> {
    let book = non_empty_or(book_name, DEFAULT_BOOK);
    let author = non_empty_or(author_name, DEFAULT_AUTHOR);

    let mut out: Vec<ChunkRow> = Vec::new();
    let mut context = HeadingContext::default();
    let mut body: Vec<&str> = Vec::new();

    for row in rows {
        if let Some(level) = row.level() {
            flush(&mut out, &mut body, &context, book, author, params);
            context.enter(level, &row.text);
        } else {
            body.push(row.text.as_str());
        }
    }
    flush(&mut out, &mut body, &context, book, author, params);
    out
}

/// Finalize accumulated body text into chunk rows at a context boundary.
fn flush(
    out: &mut Vec<ChunkRow>,
    body: &mut Vec<&str>,
    context: &HeadingContext,
    book: &str,
    author: &str,
    params: ChunkParams,
) {
    if body.is_empty() {
        return;
    }
    let text = body.join(" ");
    body.clear();
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return;
    }
    let chapter_name = context.chapter_name();
    for text_chunk in WordWindows::new(&words, params) {
        out.push(ChunkRow {
            book_name: book.to_string(),
            author_name: author.to_string(),
            chapter_name: chapter_name.clone(),
            text_chunk,
        });
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}
