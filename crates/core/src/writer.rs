//! Indentation-aware text builder used by every generator.
//!
//! The writer is purely textual: it tracks block nesting and indentation and
//! knows nothing about the code it renders.

use crate::naming;

/// Quote character used for string literals and property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// `'text'`
    #[default]
    Single,
    /// `"text"`
    Double,
}

impl QuoteStyle {
    /// The delimiter character.
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Layout settings for a [`CodeWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Quote style for string literals.
    pub quote_style: QuoteStyle,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            quote_style: QuoteStyle::Single,
        }
    }
}

/// Accumulates lines, blocks and blank lines into source text.
///
/// Every [`begin_block`](CodeWriter::begin_block) must be closed by exactly
/// one [`end_block`](CodeWriter::end_block) (or
/// [`end_block_with`](CodeWriter::end_block_with)) before
/// [`render`](CodeWriter::render).
#[derive(Debug)]
pub struct CodeWriter {
    config: WriterConfig,
    buf: String,
    depth: usize,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

impl CodeWriter {
    /// Create an empty writer.
    pub fn new(config: WriterConfig) -> Self {
        Self {
            config,
            buf: String::new(),
            depth: 0,
        }
    }

    /// The writer's quote style.
    pub fn quote_style(&self) -> QuoteStyle {
        self.config.quote_style
    }

    /// Quote `text` as a string literal in the configured style.
    pub fn quote(&self, text: &str) -> String {
        naming::quote(text, self.config.quote_style)
    }

    fn push_indent(&mut self) {
        let width = self.depth * self.config.indent_width;
        self.buf.extend(std::iter::repeat_n(' ', width));
    }

    /// Write one line at the current indentation. Embedded newlines produce
    /// several lines, each indented; empty lines stay empty.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for line in text.as_ref().split('\n') {
            if !line.is_empty() {
                self.push_indent();
                self.buf.push_str(line);
            }
            self.buf.push('\n');
        }
        self
    }

    /// Write an empty line, unless the output is empty or already ends with
    /// one.
    pub fn blank_line(&mut self) -> &mut Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
        self
    }

    /// Open a block: writes `header {` and indents what follows.
    ///
    /// Headers ending in `(` or `[` are joined to the brace without a space,
    /// so `return build(` opens `return build({`.
    pub fn begin_block(&mut self, header: impl AsRef<str>) -> &mut Self {
        let header = header.as_ref();
        self.push_indent();
        self.buf.push_str(header);
        if !header.is_empty() && !header.ends_with(['(', '[', ' ']) {
            self.buf.push(' ');
        }
        self.buf.push_str("{\n");
        self.depth += 1;
        self
    }

    /// Close the innermost block with `}`.
    pub fn end_block(&mut self) -> &mut Self {
        self.end_block_with("")
    }

    /// Close the innermost block with `}` followed by `suffix` (e.g. `)`).
    pub fn end_block_with(&mut self, suffix: &str) -> &mut Self {
        debug_assert!(self.depth > 0, "end_block without matching begin_block");
        self.depth = self.depth.saturating_sub(1);
        self.push_indent();
        self.buf.push('}');
        self.buf.push_str(suffix);
        self.buf.push('\n');
        self
    }

    /// Finish and return the accumulated text.
    pub fn render(self) -> String {
        debug_assert_eq!(self.depth, 0, "unclosed block at render");
        self.buf
    }
}
