//! Shared models used across crates

use serde::{Deserialize, Serialize};

/// Paragraph alignment as exposed by document readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Hierarchical rank of a structural heading, H1 outermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLevel {
    H1,
    H2,
    H3,
}

impl HeaderLevel {
    /// Levels in priority order: an H1 claim beats H2 beats H3.
    pub const ALL: [HeaderLevel; 3] = [HeaderLevel::H1, HeaderLevel::H2, HeaderLevel::H3];

    pub fn key(self) -> &'static str {
        match self {
            HeaderLevel::H1 => "h1",
            HeaderLevel::H2 => "h2",
            HeaderLevel::H3 => "h3",
        }
    }
}

/// Detection thresholds for one header level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRule {
    pub enabled: bool,
    /// Minimum font size in points; a paragraph with no declared size never matches.
    pub min_size: f32,
    pub require_bold: bool,
    pub allowed_align: Vec<Alignment>,
    pub require_short_phrase: bool,
}

impl LevelRule {
    pub fn new(min_size: f32, require_bold: bool) -> Self {
        Self {
            enabled: true,
            min_size,
            require_bold,
            allowed_align: vec![Alignment::Left, Alignment::Center, Alignment::Right],
            require_short_phrase: true,
        }
    }
}

/// Heuristic constants used by the classifier's scoring pass.
///
/// The exact values are dataset-specific tuning; they are kept here with the
/// original defaults instead of being buried as literals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicTuning {
    /// A `require_bold` rule also accepts this bold-character fraction.
    pub bold_fraction_floor: f32,
    /// Bold-character fraction that earns the bold score point on its own.
    pub bold_fraction_strong: f32,
    /// Score penalty for sentence-like paragraphs.
    pub sentence_penalty: i32,
    /// Score penalty for quoted one-liners.
    pub quote_penalty: i32,
}

impl Default for HeuristicTuning {
    fn default() -> Self {
        Self {
            bold_fraction_floor: 0.4,
            bold_fraction_strong: 0.6,
            sentence_penalty: 2,
            quote_penalty: 2,
        }
    }
}

/// Full header-detection configuration supplied once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub auto_detect: bool,
    pub max_header_words: usize,
    pub suppress_sentences: bool,
    pub suppress_quotes: bool,
    pub h1: LevelRule,
    pub h2: LevelRule,
    pub h3: LevelRule,
    #[serde(default)]
    pub tuning: HeuristicTuning,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            auto_detect: true,
            max_header_words: 15,
            suppress_sentences: true,
            suppress_quotes: true,
            h1: LevelRule::new(14.0, true),
            h2: LevelRule::new(13.0, false),
            h3: LevelRule::new(13.0, false),
            tuning: HeuristicTuning::default(),
        }
    }
}

impl RuleSet {
    pub fn level(&self, level: HeaderLevel) -> &LevelRule {
        match level {
            HeaderLevel::H1 => &self.h1,
            HeaderLevel::H2 => &self.h2,
            HeaderLevel::H3 => &self.h3,
        }
    }

    /// Parse a rule preset from JSON (missing `tuning` falls back to defaults).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Derived formatting features for one non-empty paragraph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParagraphFeatures {
    pub all_caps: bool,
    pub short_phrase: bool,
    pub avg_font_size: Option<f32>,
    pub max_font_size: Option<f32>,
    pub bold_fraction: f32,
    pub any_bold: bool,
    pub align: Alignment,
    /// Lowercased paragraph style name; empty when unavailable.
    pub style: String,
    pub sentence_like: bool,
    pub quoted_oneliner: bool,
    pub word_count: usize,
}

/// One scanned paragraph with its classification flags, as shown to the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// Dense 0-based position among non-empty paragraphs.
    pub idx: usize,
    pub text: String,
    pub is_h1: bool,
    pub is_h2: bool,
    pub is_h3: bool,
    pub is_header: bool,
    pub score: i32,
    #[serde(flatten)]
    pub features: ParagraphFeatures,
}

impl AnnotatedRow {
    /// A plain body row with no header claims.
    pub fn body(idx: usize, text: impl Into<String>, features: ParagraphFeatures) -> Self {
        Self {
            idx,
            text: text.into(),
            is_h1: false,
            is_h2: false,
            is_h3: false,
            is_header: false,
            score: 0,
            features,
        }
    }

    /// Strongest level claimed by this row; H1 wins over H2 wins over H3.
    pub fn level(&self) -> Option<HeaderLevel> {
        if self.is_h1 {
            Some(HeaderLevel::H1)
        } else if self.is_h2 {
            Some(HeaderLevel::H2)
        } else if self.is_h3 {
            Some(HeaderLevel::H3)
        } else {
            None
        }
    }

    /// Re-derive `is_header` after the review step has toggled level flags.
    pub fn sync_header_flag(&mut self) {
        self.is_header = self.is_h1 || self.is_h2 || self.is_h3;
    }
}

/// One exported chunk with its book/author/chapter labels.
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRow {
    pub book_name: String,
    pub author_name: String,
    pub chapter_name: String,
    pub text_chunk: String,
}

/// Word-window bounds for the chunk splitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkParams {
    pub min_words: usize,
    pub max_words: usize,
    /// Fraction of a window re-included at the start of the next one; [0,1).
    pub overlap: f64,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self { min_words: 200, max_words: 250, overlap: 0.2 }
    }
}

/// File-level metadata captured alongside a scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub source_path: String,
    pub file_size_bytes: Option<u64>,
    pub content_sha256: Option<String>,
    /// Filesystem modification time, RFC 3339, when available.
    pub modified_at: Option<String>,
    /// RFC 3339 timestamp of the scan.
    pub extracted_at: String,
    /// Non-empty paragraphs surviving the scan.
    pub paragraph_count: usize,
    pub header_count: usize,
}
