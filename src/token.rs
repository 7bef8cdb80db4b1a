//! The lexical units produced by the scanner.
use crate::Span;
use std::borrow::Cow;

mod name;
pub use name::TagName;

mod attribute;
pub use attribute::Attribute;
pub(crate) use attribute::lex_attributes;

/// The three shapes of tag the scanner produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<name ...>`
    Open,

    /// `</name>`
    Close,

    /// `<name .../>`
    SelfClosed,
}
impl TagKind {
    /// True for tags that open an element: `Open` and `SelfClosed`.
    #[must_use]
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Open | Self::SelfClosed)
    }

    /// True for tags that close an element: `Close` and `SelfClosed`.
    #[must_use]
    pub fn is_closing(self) -> bool {
        matches!(self, Self::Close | Self::SelfClosed)
    }
}
impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
            Self::SelfClosed => write!(f, "self-closed"),
        }
    }
}

/// One `<...>` unit of the document:
/// `<ns:name attr="value">`, `</ns:name>` or `<ns:name attr="value"/>`
///
/// `start` is the offset of the `<`; `end` is the offset just past the terminating `>`.
/// Text content between two tags is `end` of the first up to `start` of the second.
///
/// If a CDATA block was crossed while looking for this tag, [`Tag::has_cdata`] is set; for a close
/// tag this means the element's text content is (or contains) the CDATA block.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag<'src> {
    kind: TagKind,
    span: Span,
    name: TagName<'src>,
    attributes: Vec<Attribute<'src>>,
    cdata: bool,
}
impl<'src> Tag<'src> {
    pub(crate) fn new(kind: TagKind, span: Span, name: TagName<'src>) -> Self {
        Self {
            kind,
            span,
            name,
            attributes: vec![],
            cdata: false,
        }
    }

    pub(crate) fn with_attributes(mut self, attributes: Vec<Attribute<'src>>) -> Self {
        self.attributes = attributes;
        self
    }

    pub(crate) fn with_cdata(mut self, cdata: bool) -> Self {
        self.cdata = cdata;
        self
    }

    /// The kind of tag.
    #[must_use]
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// The local name of the tag, decoded from the source.
    #[must_use]
    pub fn name(&self) -> Cow<'src, str> {
        self.name.local()
    }

    /// The full name of the tag, including its namespace prefix.
    #[must_use]
    pub fn tag_name(&self) -> &TagName<'src> {
        &self.name
    }

    /// The namespace prefix, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<Cow<'src, str>> {
        self.name.namespace()
    }

    /// The attributes of the tag, in source order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute<'src>] {
        &self.attributes
    }

    /// Get an attribute by name. If duplicated, the last one wins.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute<'src>> {
        self.attributes.iter().rev().find(|a| a.name() == name)
    }

    /// True if a CDATA block was crossed while scanning for this tag.
    #[must_use]
    pub fn has_cdata(&self) -> bool {
        self.cdata
    }

    /// Byte range of the declaration, from `<` to just past `>`.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Offset of the `<` that starts this tag.
    #[must_use]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Offset just past the `>` that ends this tag. Scanning resumes here.
    #[must_use]
    pub fn end(&self) -> usize {
        self.span.end
    }
}
