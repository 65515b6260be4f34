use chapter_model::{Alignment, HeaderLevel, ParagraphFeatures, RuleSet};
use doc_chunker::classifier::{classify, StyleProbe, WordHeadingProbe};
use doc_chunker::features::{extract_features, minimal_features};
use doc_chunker::paragraphs::{SourceParagraph, StyledRun};
use doc_chunker::scanner::scan_paragraphs;

fn features_for(para: &SourceParagraph, rules: &RuleSet) -> ParagraphFeatures {
    extract_features(para.text.trim(), para, rules)
}

fn para_with_runs(text: &str, runs: Vec<StyledRun>) -> SourceParagraph {
    SourceParagraph { text: text.to_string(), align: None, style: String::new(), runs }
}

#[test]
fn bold_fraction_stays_in_range() {
    let rules = RuleSet::default();

    let empty = SourceParagraph::new("no runs at all");
    let f = features_for(&empty, &rules);
    assert_eq!(f.bold_fraction, 0.0);
    assert!(!f.any_bold);

    let zero_len = para_with_runs("x", vec![StyledRun::new("", true, None)]);
    assert_eq!(features_for(&zero_len, &rules).bold_fraction, 0.0);

    let mixed = para_with_runs(
        "Bold Text",
        vec![StyledRun::new("Bold ", true, None), StyledRun::new("Text", false, None)],
    );
    let f = features_for(&mixed, &rules);
    assert!((0.0..=1.0).contains(&f.bold_fraction));
    assert!(f.any_bold);
    assert!(f.bold_fraction > 0.5, "5 of 9 chars are bold: {}", f.bold_fraction);
}

#[test]
fn all_caps_requires_a_letter() {
    let rules = RuleSet::default();
    assert!(features_for(&SourceParagraph::new("CHAPTER ONE"), &rules).all_caps);
    assert!(!features_for(&SourceParagraph::new("Chapter One"), &rules).all_caps);
    assert!(!features_for(&SourceParagraph::new("1234 5678"), &rules).all_caps);
}

#[test]
fn short_phrase_checks_words_and_chars() {
    let rules = RuleSet::default();
    assert!(features_for(&SourceParagraph::new("A Short Title"), &rules).short_phrase);

    let many_words = "word ".repeat(16);
    assert!(!features_for(&SourceParagraph::new(many_words.trim()), &rules).short_phrase);

    // under the word cap but over 120 characters
    let long_words = "supercalifragilistic ".repeat(7);
    let f = features_for(&SourceParagraph::new(long_words.trim()), &rules);
    assert!(f.word_count <= rules.max_header_words);
    assert!(!f.short_phrase);
}

#[test]
fn sentence_heuristic_is_deliberately_loose() {
    let rules = RuleSet::default();
    // ends with punctuation
    assert!(features_for(&SourceParagraph::new("It was a dark night."), &rules).sentence_like);
    // punctuation anywhere
    assert!(features_for(&SourceParagraph::new("Mr. Brown"), &rules).sentence_like);
    // ten words or more, no punctuation
    let ten = "one two three four five six seven eight nine ten";
    assert!(features_for(&SourceParagraph::new(ten), &rules).sentence_like);
    // a plain title is not
    assert!(!features_for(&SourceParagraph::new("Chapter One"), &rules).sentence_like);

    let mut off = RuleSet::default();
    off.suppress_sentences = false;
    assert!(!features_for(&SourceParagraph::new("It was a dark night."), &off).sentence_like);
}

#[test]
fn quoted_oneliner_needs_matching_quotes_and_few_words() {
    let rules = RuleSet::default();
    assert!(features_for(&SourceParagraph::new("\"A quoted line\""), &rules).quoted_oneliner);
    assert!(features_for(&SourceParagraph::new("'Single quoted'"), &rules).quoted_oneliner);
    assert!(!features_for(&SourceParagraph::new("\"Unbalanced"), &rules).quoted_oneliner);

    let long_quote = format!("\"{}\"", "word ".repeat(13).trim());
    assert!(!features_for(&SourceParagraph::new(long_quote), &rules).quoted_oneliner);

    let mut off = RuleSet::default();
    off.suppress_quotes = false;
    assert!(!features_for(&SourceParagraph::new("\"A quoted line\""), &off).quoted_oneliner);
}

#[test]
fn missing_font_size_never_matches_on_size() {
    let rules = RuleSet::default();
    let para = SourceParagraph::with_run("A Title", true, None);
    let f = features_for(&para, &rules);
    assert_eq!(f.avg_font_size, None);
    assert_eq!(f.max_font_size, None);

    let flags = classify(&f, &rules, &WordHeadingProbe);
    assert!(!flags.is_header(), "no declared size must reject every level");
}

#[test]
fn style_override_bypasses_size_check() {
    let rules = RuleSet::default();
    let mut para = para_with_runs("Ch 1", vec![StyledRun::new("Ch 1", false, Some(10.0))]);
    para.style = "Heading 2".to_string();

    let f = features_for(&para, &rules);
    let flags = classify(&f, &rules, &WordHeadingProbe);
    assert!(flags.is_h2, "style override must win despite 10pt < 13pt rule");
    assert!(!flags.is_h1);
    assert!(!flags.is_h3);
    assert_eq!(flags.score, 0, "style overrides skip the scoring pass");
}

#[test]
fn disabled_level_rejected_but_multiple_levels_can_match() {
    let mut rules = RuleSet::default();
    rules.h1.enabled = false;

    let mut para = para_with_runs("INTRO", vec![StyledRun::new("INTRO", true, Some(20.0))]);
    para.align = Some(Alignment::Center);

    let f = features_for(&para, &rules);
    let flags = classify(&f, &rules, &WordHeadingProbe);
    assert!(!flags.is_h1, "disabled level must never match in the rule pass");
    assert!(flags.is_h2 && flags.is_h3, "both remaining thresholds are exceeded");
}

#[test]
fn style_override_ignores_disabled_levels() {
    let mut rules = RuleSet::default();
    rules.h1.enabled = false;
    let mut para = para_with_runs("Intro", vec![StyledRun::new("Intro", false, None)]);
    para.style = "Heading 1".to_string();

    let flags = classify(&features_for(&para, &rules), &rules, &WordHeadingProbe);
    assert!(flags.is_h1, "style overrides are independent of rule enablement");
}

#[test]
fn rule_pass_scores_add_up() {
    let rules = RuleSet::default();
    let mut para = para_with_runs("CHAPTER ONE", vec![StyledRun::new("CHAPTER ONE", true, Some(16.0))]);
    para.align = Some(Alignment::Center);

    let f = features_for(&para, &rules);
    let flags = classify(&f, &rules, &WordHeadingProbe);
    assert!(flags.is_h1 && flags.is_h2 && flags.is_h3);
    // bold + all caps + centered + short phrase
    assert_eq!(flags.score, 4);
}

#[test]
fn sentence_penalty_lowers_the_score() {
    let rules = RuleSet::default();
    let para = para_with_runs(
        "This line ends with a period.",
        vec![StyledRun::new("This line ends with a period.", true, Some(16.0))],
    );
    let f = features_for(&para, &rules);
    assert!(f.sentence_like);

    let flags = classify(&f, &rules, &WordHeadingProbe);
    assert!(flags.is_h1);
    // bold + short phrase - sentence penalty
    assert_eq!(flags.score, 0);
}

#[test]
fn bold_fraction_floor_satisfies_require_bold() {
    let rules = RuleSet::default();
    // half the characters bold, no run fully bold-marked with text? any_bold is
    // true whenever a bold run has text, so use fraction just under the floor
    let below = para_with_runs(
        "abcdefghij",
        vec![StyledRun::new("abc", true, Some(16.0)), StyledRun::new("defghij", false, Some(16.0))],
    );
    let f = features_for(&below, &rules);
    assert!(f.bold_fraction < rules.tuning.bold_fraction_floor);
    // any_bold still true, so H1 accepts; drop the bold run text to verify the floor
    assert!(classify(&f, &rules, &WordHeadingProbe).is_h1);

    let unbold = para_with_runs("abcdefghij", vec![StyledRun::new("abcdefghij", false, Some(16.0))]);
    let f = features_for(&unbold, &rules);
    let flags = classify(&f, &rules, &WordHeadingProbe);
    assert!(!flags.is_h1, "H1 requires bold and this paragraph has none");
    assert!(flags.is_h2 && flags.is_h3, "H2/H3 do not require bold by default");
}

#[test]
fn custom_probe_plugs_into_the_classifier() {
    struct TitleProbe;
    impl StyleProbe for TitleProbe {
        fn matches(&self, style: &str, level: HeaderLevel) -> bool {
            level == HeaderLevel::H1 && style.contains("title")
        }
    }

    let rules = RuleSet::default();
    let mut para = SourceParagraph::new("Opening");
    para.style = "Book Title".to_string();

    let f = features_for(&para, &rules);
    assert!(classify(&f, &rules, &TitleProbe).is_h1);
    assert!(!classify(&f, &rules, &WordHeadingProbe).is_header());
}

#[test]
fn scanner_skips_blanks_and_keeps_idx_dense() {
    let rules = RuleSet::default();
    let paragraphs = vec![
        SourceParagraph::new(""),
        SourceParagraph::new("   "),
        SourceParagraph::new("Title"),
        SourceParagraph::new(""),
        SourceParagraph::new("Body text"),
    ];
    let rows = scan_paragraphs(&paragraphs, &rules);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].idx, rows[0].text.as_str()), (0, "Title"));
    assert_eq!((rows[1].idx, rows[1].text.as_str()), (1, "Body text"));
}

#[test]
fn manual_mode_emits_unclassified_rows_with_minimal_features() {
    let mut rules = RuleSet::default();
    rules.auto_detect = false;

    let para = para_with_runs("BIG TITLE", vec![StyledRun::new("BIG TITLE", true, Some(20.0))]);
    let rows = scan_paragraphs(&[para], &rules);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert!(!row.is_header && !row.is_h1 && !row.is_h2 && !row.is_h3);
    assert_eq!(row.score, 0);
    // text-derived features only
    assert!(row.features.all_caps);
    assert_eq!(row.features.word_count, 2);
    assert_eq!(row.features.avg_font_size, None);
    assert!(!row.features.any_bold);

    let direct = minimal_features("BIG TITLE", &rules);
    assert_eq!(row.features, direct);
}
