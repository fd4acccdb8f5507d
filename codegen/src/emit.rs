//! Line-oriented C++ text builder.
//!
//! Every artifact is rendered through a [`CppFile`], which tracks the current
//! nesting depth and indents each line by four spaces per level.

/// Indentation unit.
const INDENT: &str = "    ";

/// An in-progress C++ source file.
#[derive(Debug, Default)]
pub struct CppFile {
    /// Text emitted so far.
    pub buf: String,
    depth: usize,
}

impl CppFile {
    /// Creates an empty file with the given capacity hint.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            depth: 0,
        }
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Emits `text` at the current depth plus `extra` levels.
    pub fn line_at(&mut self, extra: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth + extra {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Emits `text` at the current depth.
    pub fn line(&mut self, text: &str) {
        self.line_at(0, text);
    }

    /// Emits each line of `text` at the current depth, keeping the relative
    /// indentation already present in `text`.
    pub fn lines(&mut self, text: &str) {
        for l in text.lines() {
            self.line(l);
        }
    }

    /// Emits an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Increases the depth by one level.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decreases the depth by one level, saturating at zero.
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns the text, with exactly one trailing newline.
    #[must_use]
    pub fn finish(mut self) -> String {
        let trimmed = self.buf.trim_end().len();
        self.buf.truncate(trimmed);
        self.buf.push('\n');
        self.buf
    }
}
