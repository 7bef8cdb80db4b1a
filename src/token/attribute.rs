use crate::Span;
use std::borrow::Cow;

/// A `name="value"` pair from a tag declaration.
///
/// Only double-quoted values are recognized. Values are taken verbatim: no entity expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'src> {
    src: &'src [u8],
    name: Span,
    value: Span,
}
impl<'src> Attribute<'src> {
    pub(crate) fn new(src: &'src [u8], name: Span, value: Span) -> Self {
        Self { src, name, value }
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> Cow<'src, str> {
        self.name.text(self.src)
    }

    /// Returns the attribute value, without the surrounding quotes.
    #[must_use]
    pub fn value(&self) -> Cow<'src, str> {
        self.value.text(self.src)
    }

    /// Returns the span of the value in the source buffer.
    #[must_use]
    pub fn value_span(&self) -> Span {
        self.value
    }
}

/// Extract the attributes from the part of a tag declaration that follows the tag name.
///
/// `span` must cover the bytes after the name, up to but excluding the terminating `>` or `/>`.
/// A `=` outside of a quoted value ends an attribute name; the next `"` opens the value and the
/// one after closes it.
pub(crate) fn lex_attributes(src: &[u8], span: Span) -> Vec<Attribute<'_>> {
    let mut attributes = Vec::new();

    let mut name_start = span.start;
    let mut name: Option<Span> = None;
    let mut open_quote: Option<usize> = None;

    for (offset, &byte) in span.bytes(src).iter().enumerate() {
        let pos = span.start + offset;
        match byte {
            b'=' if open_quote.is_none() => {
                name = Some(Span::new(name_start, pos).trim(src));
            }

            b'"' => match (name, open_quote) {
                (Some(attr_name), Some(quote)) => {
                    attributes.push(Attribute::new(src, attr_name, Span::new(quote + 1, pos)));
                    name = None;
                    open_quote = None;
                    name_start = pos + 1;
                }

                (_, None) => open_quote = Some(pos),

                // A quoted run with no name in front of it; skip past it
                (None, Some(_)) => {
                    open_quote = None;
                    name_start = pos + 1;
                }
            },

            _ => {}
        }
    }

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(decl: &str) -> Vec<(String, String)> {
        let src = decl.as_bytes();
        lex_attributes(src, Span::new(0, src.len()))
            .iter()
            .map(|a| (a.name().into_owned(), a.value().into_owned()))
            .collect()
    }

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_single_attribute() {
        assert_eq!(lex(r#" id="1""#), pairs(&[("id", "1")]));
    }

    #[test]
    fn test_attributes_in_source_order() {
        assert_eq!(
            lex(r#" b="2" a="1"  c="three""#),
            pairs(&[("b", "2"), ("a", "1"), ("c", "three")])
        );
    }

    #[test]
    fn test_value_with_syntax_characters() {
        assert_eq!(
            lex(r#" expr="a=b" path="x:y z""#),
            pairs(&[("expr", "a=b"), ("path", "x:y z")])
        );
    }

    #[test]
    fn test_spaces_around_equals() {
        assert_eq!(lex(r#" id = "7""#), pairs(&[("id", "7")]));
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(lex(r#" id="""#), pairs(&[("id", "")]));
    }

    #[test]
    fn test_single_quotes_not_recognized() {
        assert!(lex(" id='1'").is_empty());
    }

    #[test]
    fn test_unquoted_value_not_recognized() {
        assert!(lex(" id=1").is_empty());
    }

    #[test]
    fn test_absolute_spans() {
        let src = br#"<Item id="42"/>"#;
        let attrs = lex_attributes(src, Span::new(5, 13));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value_span(), Span::new(10, 12));
        assert_eq!(attrs[0].value(), "42");
    }
}
