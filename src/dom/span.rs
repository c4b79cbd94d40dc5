//! TextSpan - byte range into the document text
//!
//! Spans are only valid for the exact text they were computed from; every
//! rewrite step re-parses and recomputes them.

/// A half-open byte range `[start, end)` in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Extract the covered text, or `""` if the span is out of bounds
    /// or splits a UTF-8 sequence
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.start..self.end).unwrap_or("")
    }
}
