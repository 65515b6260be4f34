use chapter_model::{Alignment, HeaderLevel, LevelRule, ParagraphFeatures, RuleSet};

/// Classification outcome for one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderFlags {
    pub is_h1: bool,
    pub is_h2: bool,
    pub is_h3: bool,
    pub score: i32,
}

impl HeaderFlags {
    pub fn is_header(&self) -> bool {
        self.is_h1 || self.is_h2 || self.is_h3
    }

    fn set(&mut self, level: HeaderLevel) {
        match level {
            HeaderLevel::H1 => self.is_h1 = true,
            HeaderLevel::H2 => self.is_h2 = true,
            HeaderLevel::H3 => self.is_h3 = true,
        }
    }
}

/// Decides whether a style name explicitly claims a heading level.
/// Style names encode authoring intent and are trusted unconditionally, so
/// alternate style taxonomies plug in here without touching the classifier.
pub trait StyleProbe {
    fn matches(&self, style: &str, level: HeaderLevel) -> bool;
}

/// Default probe for Word's built-in "Heading N" style names.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordHeadingProbe;

impl StyleProbe for WordHeadingProbe {
    fn matches(&self, style: &str, level: HeaderLevel) -> bool {
        let (phrase, compact) = match level {
            HeaderLevel::H1 => ("heading 1", "heading1"),
            HeaderLevel::H2 => ("heading 2", "heading2"),
            HeaderLevel::H3 => ("heading 3", "heading3"),
        };
        style.contains(phrase) || style.trim() == compact
    }
}

/// Classify one paragraph's features against the rule set.
///
/// Style overrides win outright: when the style names a heading level, the
/// rule-based pass is skipped entirely and the score stays 0. Otherwise each
/// level is evaluated independently; a paragraph may match several levels at
/// once, and the row score is the maximum over the matching levels.
pub fn classify(features: &ParagraphFeatures, rules: &RuleSet, probe: &dyn StyleProbe) -> HeaderFlags {
    let mut flags = HeaderFlags::default();

    for level in HeaderLevel::ALL {
        if probe.matches(&features.style, level) {
            flags.set(level);
        }
    }
    if flags.is_header() {
        return flags;
    }

    for level in HeaderLevel::ALL {
        if let Some(score) = level_match(rules.level(level), features, rules) {
            flags.set(level);
            flags.score = flags.score.max(score);
        }
    }
    flags
}

/// Evaluate one level rule; `Some(score)` on match, `None` on rejection.
fn level_match(rule: &LevelRule, f: &ParagraphFeatures, rules: &RuleSet) -> Option<i32> {
    if !rule.enabled {
        return None;
    }
    let size_ok = f.avg_font_size.map_or(false, |s| s >= rule.min_size)
        || f.max_font_size.map_or(false, |s| s >= rule.min_size);
    if !size_ok {
        return None;
    }
    if !rule.allowed_align.contains(&f.align) {
        return None;
    }
    let tuning = &rules.tuning;
    if rule.require_bold && !f.any_bold && f.bold_fraction < tuning.bold_fraction_floor {
        return None;
    }
    if rule.require_short_phrase && !f.short_phrase {
        return None;
    }

    let mut score = 0;
    if f.any_bold || f.bold_fraction >= tuning.bold_fraction_strong {
        score += 1;
    }
    if f.all_caps {
        score += 1;
    }
    if f.align == Alignment::Center {
        score += 1;
    }
    if f.short_phrase {
        score += 1;
    }
    if f.style.contains("heading") {
        score += 2;
    }
    if f.sentence_like {
        score -= tuning.sentence_penalty;
    }
    if f.quoted_oneliner {
        score -= tuning.quote_penalty;
    }
    Some(score)
}
