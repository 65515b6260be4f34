use chapter_model::Alignment;

/// A contiguous span of equally formatted text inside a paragraph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    /// Declared font size in points; absent when the run declares none.
    pub size_pt: Option<f32>,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, bold: bool, size_pt: Option<f32>) -> Self {
        Self { text: text.into(), bold, size_pt }
    }
}

/// A reader-agnostic paragraph as exposed by document readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceParagraph {
    pub text: String,
    /// Explicit paragraph alignment; `None` when the document omits one.
    pub align: Option<Alignment>,
    /// Style name as found in the document; empty when unknown.
    pub style: String,
    pub runs: Vec<StyledRun>,
}

impl SourceParagraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    /// Single-run paragraph, convenient for tests and plain-text sources.
    pub fn with_run(text: impl Into<String>, bold: bool, size_pt: Option<f32>) -> Self {
        let text = text.into();
        let runs = vec![StyledRun::new(text.clone(), bold, size_pt)];
        Self { text, align: None, style: String::new(), runs }
    }
}
