use chapter_model::ChunkParams;

/// Lazy word-window splitter over a fixed word list.
///
/// Windows are `max_words` wide and advance by `step = max(1,
/// floor(max_words * (1 - overlap)))`. A window shorter than `min_words` is
/// dropped unless it is the very first one, so a short document still yields
/// one chunk. The trailing window may therefore be silently dropped; uniform
/// chunk size wins over completeness here.
pub struct WordWindows<'a> {
    words: &'a [&'a str],
    min_words: usize,
    max_words: usize,
    step: usize,
    pos: usize,
}

impl<'a> WordWindows<'a> {
    pub fn new(words: &'a [&'a str], params: ChunkParams) -> Self {
        let min_words = params.min_words;
        let max_words = params.max_words.max(min_words);
        let overlap = if params.overlap < 0.0 || params.overlap >= 1.0 { 0.0 } else { params.overlap };
        let step = ((max_words as f64) * (1.0 - overlap)).floor() as usize;
        Self { words, min_words, max_words, step: step.max(1), pos: 0 }
    }

    /// Window advance in words after normalization; always >= 1.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl<'a> Iterator for WordWindows<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.words.len() {
            let start = self.pos;
            let end = usize::min(start + self.max_words, self.words.len());
            self.pos += self.step;
            let window = &self.words[start..end];
            if window.len() >= self.min_words || start == 0 {
                return Some(window.join(" "));
            }
        }
        None
    }
}
