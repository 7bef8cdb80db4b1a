use std::borrow::Cow;

/// A byte range in the input buffer.
///
/// Spans never own text; the text is recovered on demand from the buffer that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,

    /// Offset one past the last byte.
    pub end: usize,
}
impl Span {
    /// Create a new span. An inverted range is collapsed to an empty span at `start`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Returns the length of the span.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Return true if len == 0
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the bytes covered by this span.
    /// Out of range spans are clamped to the end of the buffer.
    #[must_use]
    pub fn bytes<'src>(&self, src: &'src [u8]) -> &'src [u8] {
        let end = self.end.min(src.len());
        let start = self.start.min(end);
        &src[start..end]
    }

    /// Returns the text covered by this span, decoded lossily as UTF-8.
    #[must_use]
    pub fn text<'src>(&self, src: &'src [u8]) -> Cow<'src, str> {
        String::from_utf8_lossy(self.bytes(src))
    }

    /// Shrink the span so it excludes leading and trailing ASCII whitespace.
    #[must_use]
    pub fn trim(self, src: &[u8]) -> Self {
        let bytes = self.bytes(src);
        let Some(first) = bytes.iter().position(|b| !b.is_ascii_whitespace()) else {
            return Self::new(self.start, self.start);
        };
        let last = bytes
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .unwrap_or(first);

        Self::new(self.start + first, self.start + last + 1)
    }

    /// Calculates the row and column of the span in the input.
    ///
    /// Warning: This is an expensive operation, and should be used for error reporting only.
    #[must_use]
    pub fn position(&self, src: &[u8]) -> (usize, usize) {
        position_in_text(self.start, src)
    }
}

/// 1-based row and column of a byte offset.
pub(crate) fn position_in_text(offset: usize, src: &[u8]) -> (usize, usize) {
    let mut row = 1;
    let mut col = 1;
    for &b in src.iter().take(offset) {
        if b == b'\n' {
            row += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (row, col)
}

/// The full source line containing `offset`, without its line terminator.
pub(crate) fn line_at(offset: usize, src: &[u8]) -> Cow<'_, str> {
    let offset = offset.min(src.len());
    let start = memchr::memrchr(b'\n', &src[..offset]).map_or(0, |i| i + 1);
    let end = memchr::memchr(b'\n', &src[offset..]).map_or(src.len(), |i| offset + i);

    let line = String::from_utf8_lossy(&src[start..end]);
    match line {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim_end_matches('\r')),
        Cow::Owned(s) => Cow::Owned(s.trim_end_matches('\r').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        let src = b"<a>  hello world \n</a>";
        let span = Span::new(3, 18).trim(src);
        assert_eq!(span.text(src), "hello world");
    }

    #[test]
    fn test_trim_blank() {
        let src = b"<a>   </a>";
        let span = Span::new(3, 6).trim(src);
        assert!(span.is_empty());
        assert_eq!(span.text(src), "");
    }

    #[test]
    fn test_inverted_span_is_empty() {
        let span = Span::new(10, 4);
        assert!(span.is_empty());
        assert_eq!(span.bytes(b"0123456789abc"), b"");
    }

    #[test]
    fn test_bytes_clamped() {
        let span = Span::new(2, 100);
        assert_eq!(span.bytes(b"abcd"), b"cd");
    }

    #[test]
    fn test_position() {
        let src = b"<a>\n  <b>\n</a>";
        assert_eq!(position_in_text(0, src), (1, 1));
        assert_eq!(position_in_text(6, src), (2, 3));
        assert_eq!(line_at(6, src), "  <b>");
    }
}
