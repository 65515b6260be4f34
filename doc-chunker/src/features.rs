use chapter_model::{ParagraphFeatures, RuleSet};
use crate::paragraphs::{SourceParagraph, StyledRun};

/// A header candidate must also stay under this many characters.
pub const SHORT_PHRASE_MAX_CHARS: usize = 120;
/// At or above this many words a line counts as sentence-like.
pub const SENTENCE_WORD_FLOOR: usize = 10;
/// Quoted lines up to this many words count as quoted one-liners.
pub const QUOTED_ONELINER_MAX_WORDS: usize = 12;

/// Compute the full feature record for one non-empty paragraph.
/// `text` is the trimmed paragraph text; formatting comes from the runs.
pub fn extract_features(text: &str, para: &SourceParagraph, rules: &RuleSet) -> ParagraphFeatures {
    let word_count = text.split_whitespace().count();
    let (avg_font_size, max_font_size) = font_sizes(&para.runs);

    ParagraphFeatures {
        all_caps: is_all_caps(text),
        short_phrase: is_short_phrase(text, word_count, rules.max_header_words),
        avg_font_size,
        max_font_size,
        bold_fraction: bold_fraction(&para.runs),
        any_bold: para.runs.iter().any(|r| r.bold && !r.text.is_empty()),
        align: para.align.unwrap_or_default(),
        style: para.style.to_lowercase(),
        sentence_like: rules.suppress_sentences && looks_sentence_like(text),
        quoted_oneliner: rules.suppress_quotes && is_quoted_oneliner(text),
        word_count,
    }
}

/// Text-derived features only, for scans with auto-detection disabled.
/// Font, alignment and style stay at their defaults.
pub fn minimal_features(text: &str, rules: &RuleSet) -> ParagraphFeatures {
    let word_count = text.split_whitespace().count();
    ParagraphFeatures {
        all_caps: is_all_caps(text),
        short_phrase: is_short_phrase(text, word_count, rules.max_header_words),
        word_count,
        ..ParagraphFeatures::default()
    }
}

fn is_all_caps(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic()) && text.to_uppercase() == text
}

fn is_short_phrase(text: &str, word_count: usize, max_header_words: usize) -> bool {
    word_count <= max_header_words && text.chars().count() <= SHORT_PHRASE_MAX_CHARS
}

/// Mean and max of the declared run sizes; `None` when no run declares one.
fn font_sizes(runs: &[StyledRun]) -> (Option<f32>, Option<f32>) {
    let sizes: Vec<f32> = runs.iter().filter_map(|r| r.size_pt).collect();
    if sizes.is_empty() {
        return (None, None);
    }
    let avg = sizes.iter().sum::<f32>() / sizes.len() as f32;
    let max = sizes.iter().cloned().fold(f32::MIN, f32::max);
    (Some(avg), Some(max))
}

/// Bold characters over total characters across all runs; 0.0 when there are
/// no runs or no text at all.
fn bold_fraction(runs: &[StyledRun]) -> f32 {
    let total: usize = runs.iter().map(|r| r.text.chars().count()).sum();
    if total == 0 {
        return 0.0;
    }
    let bold: usize = runs.iter().filter(|r| r.bold).map(|r| r.text.chars().count()).sum();
    bold as f32 / total as f32
}

/// Deliberately loose: prose paragraphs almost always trigger this.
fn looks_sentence_like(text: &str) -> bool {
    let t = text.trim();
    if t.is_empty() {
        return true;
    }
    let end_punct = t.ends_with('.')
        || t.ends_with('!')
        || t.ends_with('?')
        || t.ends_with('"')
        || t.ends_with('\'');
    let has_punct = t.chars().any(|c| matches!(c, '.' | '!' | '?'));
    end_punct || has_punct || t.split_whitespace().count() >= SENTENCE_WORD_FLOOR
}

fn is_quoted_oneliner(text: &str) -> bool {
    let t = text.trim();
    if t.split_whitespace().count() > QUOTED_ONELINER_MAX_WORDS {
        return false;
    }
    (t.starts_with('"') && t.ends_with('"')) || (t.starts_with('\'') && t.ends_with('\''))
}
