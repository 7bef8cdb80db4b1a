//! Tag scanner
//!
//! Finds the next `<...>` declaration in a byte buffer. Everything between declarations is
//! skipped here; the builder recovers element text later by slicing between tag offsets.
use crate::{
    Span, Tag, TagKind, TagName,
    token::lex_attributes,
};
use memchr::{memchr, memmem};

pub(crate) const CDATA_OPEN: &[u8] = b"<![CDATA[";
pub(crate) const CDATA_CLOSE: &[u8] = b"]]>";

/// Iterator over the tags of a buffer, in document order.
///
/// ```rust
/// use xmlbind::{Scanner, TagKind};
///
/// let kinds: Vec<_> = Scanner::new(b"<a><b/></a>").map(|t| t.kind()).collect();
/// assert_eq!(kinds, [TagKind::Open, TagKind::SelfClosed, TagKind::Close]);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    src: &'src [u8],
    cursor: usize,
}
impl<'src> Scanner<'src> {
    /// Create a scanner positioned at the start of the buffer.
    #[must_use]
    pub fn new(src: &'src [u8]) -> Self {
        Self { src, cursor: 0 }
    }

    /// Offset the next scan starts from.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The buffer being scanned.
    #[must_use]
    pub fn source(&self) -> &'src [u8] {
        self.src
    }
}
impl<'src> Iterator for Scanner<'src> {
    type Item = Tag<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = next_tag(self.src, self.cursor)?;
        self.cursor = tag.end();
        Some(tag)
    }
}

/// Scan for the next tag at or after `cursor`.
///
/// Returns `None` when no further complete tag exists; that is the normal end of input.
/// The returned tag's [`Tag::end`] is the cursor for the following call.
#[must_use]
pub fn next_tag(src: &[u8], cursor: usize) -> Option<Tag<'_>> {
    let mut pos = cursor;
    let mut decl: Option<Declaration> = None;
    let mut cdata = false;

    while pos < src.len() {
        if decl.is_none() {
            pos += memchr(b'<', &src[pos..])?;
        }

        // A `<` always starts over: either a CDATA block, or a new declaration
        if src[pos] == b'<' {
            if src[pos..].starts_with(CDATA_OPEN) {
                cdata = true;
                let content = pos + CDATA_OPEN.len();
                let close = memmem::find(&src[content..], CDATA_CLOSE)?;
                pos = content + close + CDATA_CLOSE.len();
                continue;
            }

            let next = Declaration::at(src, pos);
            pos = next.name_start;
            decl = Some(next);
            continue;
        }

        let Some(current) = decl.as_mut() else {
            pos += 1;
            continue;
        };

        let terminator = match src[pos] {
            b'>' => Some((pos, pos + 1, current.kind)),

            b'/' if src.get(pos + 1) == Some(&b'>') => {
                let kind = match current.kind {
                    TagKind::Open => TagKind::SelfClosed,
                    kind => kind,
                };
                Some((pos, pos + 2, kind))
            }

            b'=' => {
                current.has_attributes = true;
                None
            }

            b':' if current.name_end.is_none() => {
                current.colon = Some(pos);
                None
            }

            b if b.is_ascii_whitespace() => {
                if current.name_end.is_none() && pos > current.name_start {
                    current.name_end = Some(pos);
                }
                None
            }

            _ => None,
        };

        if let Some((terminator, end, kind)) = terminator {
            return decl.map(|d| d.finish(src, terminator, end, kind, cdata));
        }

        pos += 1;
    }

    None
}

/// Markers recorded while walking one declaration.
#[derive(Debug, Clone, Copy)]
struct Declaration {
    kind: TagKind,

    /// Offset of the `<`
    start: usize,

    /// First byte after `<` or `</`
    name_start: usize,

    /// Namespace separator, if seen before the end of the name
    colon: Option<usize>,

    /// First whitespace after the name
    name_end: Option<usize>,

    /// A `=` was seen, so the declaration carries attributes
    has_attributes: bool,
}
impl Declaration {
    fn at(src: &[u8], start: usize) -> Self {
        let (kind, name_start) = if src.get(start + 1) == Some(&b'/') {
            (TagKind::Close, start + 2)
        } else {
            (TagKind::Open, start + 1)
        };

        Self {
            kind,
            start,
            name_start,
            colon: None,
            name_end: None,
            has_attributes: false,
        }
    }

    fn finish(self, src: &[u8], terminator: usize, end: usize, kind: TagKind, cdata: bool) -> Tag<'_> {
        let name_end = self.name_end.unwrap_or(terminator);

        let (namespace, local) = match self.colon {
            Some(colon) if colon < name_end => (
                Some(Span::new(self.name_start, colon).trim(src)),
                Span::new(colon + 1, name_end),
            ),
            _ => (None, Span::new(self.name_start, name_end)),
        };

        let name = TagName::new(src, namespace, local.trim(src));
        let tag = Tag::new(kind, Span::new(self.start, end), name).with_cdata(cdata);

        if self.has_attributes {
            tag.with_attributes(lex_attributes(src, Span::new(name_end, terminator)))
        } else {
            tag
        }
    }
}
