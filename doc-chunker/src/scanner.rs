use chapter_model::{AnnotatedRow, RuleSet};

use crate::classifier::{classify, StyleProbe, WordHeadingProbe};
use crate::features::{extract_features, minimal_features};
use crate::paragraphs::SourceParagraph;

/// Walk paragraphs in document order, skip blanks, and classify the rest into
/// annotated rows. Row `idx` is dense over the surviving paragraphs.
pub fn scan_paragraphs(paragraphs: &[SourceParagraph], rules: &RuleSet) -> Vec<AnnotatedRow> {
    scan_paragraphs_with_probe(paragraphs, rules, &WordHeadingProbe)
}

/// Same as [`scan_paragraphs`] with a caller-supplied style probe.
pub fn scan_paragraphs_with_probe(
    paragraphs: &[SourceParagraph],
    rules: &RuleSet,
    probe: &dyn StyleProbe,
) -> Vec<AnnotatedRow> {
    let mut rows: Vec<AnnotatedRow> = Vec::new();
    for para in paragraphs {
        let text = para.text.trim();
        if text.is_empty() {
            continue;
        }
        let idx = rows.len();
        if rules.auto_detect {
            let features = extract_features(text, para, rules);
            let flags = classify(&features, rules, probe);
            rows.push(AnnotatedRow {
                idx,
                text: text.to_string(),
                is_h1: flags.is_h1,
                is_h2: flags.is_h2,
                is_h3: flags.is_h3,
                is_header: flags.is_header(),
                score: flags.score,
                features,
            });
        } else {
            // Manual mode: the reviewer assigns levels by hand.
            rows.push(AnnotatedRow::body(idx, text, minimal_features(text, rules)));
        }
    }
    rows
}
