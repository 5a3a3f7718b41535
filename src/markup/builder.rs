//! Output accumulator for the rich-text walker.
//!
//! Collapses whitespace the way a browser would, defers line breaks until
//! the next visible content (so leading and trailing breaks never appear),
//! and supports scoped word capture used to collect link text.
//!
//! Opening emphasis markers are held back until the first word inside them,
//! so a space at the start of the element lands before the marker.

use super::slack_escape;

pub(crate) struct TextBuilder {
    out: String,
    escape: bool,
    pending_space: bool,
    pending_breaks: usize,
    pending_open: String,
    preformatted: usize,
    captures: Vec<Vec<String>>,
}

impl TextBuilder {
    /// Create a builder; `escape` applies [`slack_escape`] to every word.
    pub(crate) fn new(escape: bool) -> Self {
        Self {
            out: String::new(),
            escape,
            pending_space: false,
            pending_breaks: 0,
            pending_open: String::new(),
            preformatted: 0,
            captures: Vec::new(),
        }
    }

    /// Add a run of text-node content.
    pub(crate) fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.preformatted > 0 {
            self.add_preformatted(text);
            return;
        }
        if text.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        for (index, word) in text.split_whitespace().enumerate() {
            if index > 0 {
                self.pending_space = true;
            }
            self.add_word(word);
        }
        if text.ends_with(char::is_whitespace) {
            self.pending_space = true;
        }
    }

    /// Emit a literal that takes the place of a word (link markup, list
    /// bullets). Ignored while capturing.
    pub(crate) fn add_inline(&mut self, literal: &str) {
        if self.is_capturing() {
            return;
        }
        self.flush_before_content();
        self.out.push_str(literal);
    }

    /// Open an emphasis marker; it is emitted right before the next word.
    pub(crate) fn open_inline(&mut self, marker: &str) {
        if !self.is_capturing() {
            self.pending_open.push_str(marker);
        }
    }

    /// Emit a closing marker glued to the preceding word. An element that
    /// produced no words emits neither marker.
    pub(crate) fn close_inline(&mut self, marker: &str) {
        if self.is_capturing() {
            return;
        }
        if self.pending_open.ends_with(marker) {
            let len = self.pending_open.len() - marker.len();
            self.pending_open.truncate(len);
        } else {
            self.out.push_str(marker);
        }
    }

    /// Keep newlines and spaces of text until the matching [`exit_pre`](Self::exit_pre).
    pub(crate) fn enter_pre(&mut self) {
        self.preformatted += 1;
    }

    pub(crate) fn exit_pre(&mut self) {
        self.preformatted = self.preformatted.saturating_sub(1);
    }

    /// Force a line break (`<br>`); consecutive breaks accumulate.
    pub(crate) fn line_break(&mut self) {
        if !self.is_capturing() {
            self.pending_breaks += 1;
        }
    }

    /// Require at least `lines` line breaks before the next content.
    pub(crate) fn block_boundary(&mut self, lines: usize) {
        if !self.is_capturing() {
            self.pending_breaks = self.pending_breaks.max(lines);
        }
    }

    /// Start capturing words instead of emitting them.
    pub(crate) fn push_capture(&mut self) {
        self.captures.push(Vec::new());
    }

    /// Stop the innermost capture and return its words.
    pub(crate) fn pop_capture(&mut self) -> Vec<String> {
        self.captures.pop().unwrap_or_default()
    }

    pub(crate) fn is_capturing(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Consume the builder, dropping trailing whitespace and breaks.
    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn add_preformatted(&mut self, text: &str) {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.line_break();
            }
            if !line.is_empty() {
                self.add_word(line);
            }
        }
    }

    fn add_word(&mut self, word: &str) {
        if let Some(capture) = self.captures.last_mut() {
            capture.push(word.to_owned());
            return;
        }
        self.flush_before_content();
        if self.escape {
            self.out.push_str(&slack_escape(word));
        } else {
            self.out.push_str(word);
        }
    }

    fn flush_before_content(&mut self) {
        self.flush_breaks();
        self.flush_space();
        let open = std::mem::take(&mut self.pending_open);
        self.out.push_str(&open);
    }

    fn flush_breaks(&mut self) {
        if self.pending_breaks > 0 && !self.out.is_empty() {
            for _ in 0..self.pending_breaks {
                self.out.push('\n');
            }
            self.pending_space = false;
        }
        self.pending_breaks = 0;
    }

    fn flush_space(&mut self) {
        if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push(' ');
        }
        self.pending_space = false;
    }
}
