use crate::Span;
use std::borrow::Cow;

/// The name of a tag, with an optional namespace prefix:
/// `namespace:local`
///
/// Only the byte ranges are stored; the text is decoded from the source on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagName<'src> {
    src: &'src [u8],
    namespace: Option<Span>,
    local: Span,
}
impl<'src> TagName<'src> {
    pub(crate) fn new(src: &'src [u8], namespace: Option<Span>, local: Span) -> Self {
        Self {
            src,
            namespace,
            local,
        }
    }

    /// Compare the name with a namespace and local name.
    #[must_use]
    pub fn equals(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace().as_deref() == namespace && self.local() == local
    }

    /// Returns the namespace prefix, if the tag declared one.
    #[must_use]
    pub fn namespace(&self) -> Option<Cow<'src, str>> {
        self.namespace.map(|span| span.text(self.src))
    }

    /// Returns the local portion of the name. This is what fields are matched against.
    #[must_use]
    pub fn local(&self) -> Cow<'src, str> {
        self.local.text(self.src)
    }

    /// Returns the span of the local portion of the name.
    #[must_use]
    pub fn local_span(&self) -> Span {
        self.local
    }
}
impl std::fmt::Display for TagName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(namespace) = self.namespace() {
            write!(f, "{namespace}:{local}", local = self.local())
        } else {
            write!(f, "{local}", local = self.local())
        }
    }
}
impl PartialEq<str> for TagName<'_> {
    fn eq(&self, other: &str) -> bool {
        self.local.bytes(self.src) == other.as_bytes()
    }
}
impl PartialEq<&str> for TagName<'_> {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_namespace() {
        let src = b"soap:Envelope";
        let name = TagName::new(src, Some(Span::new(0, 4)), Span::new(5, 13));
        assert_eq!(name.to_string(), "soap:Envelope");
        assert!(name.equals(Some("soap"), "Envelope"));
        assert!(name == "Envelope");
    }

    #[test]
    fn test_display_plain() {
        let src = b"title";
        let name = TagName::new(src, None, Span::new(0, 5));
        assert_eq!(name.to_string(), "title");
        assert!(name.equals(None, "title"));
        assert!(!name.equals(Some("x"), "title"));
    }
}
