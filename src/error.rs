//! Error handling for XML binding
use crate::{ConversionError, Tag, span};

/// A result type for XML binding, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that aborted a parse.
///
/// Most problems in a document do not surface here: unmapped tags and rejected assignments are
/// dropped, and truncated documents are folded into whatever was built.
#[derive(Debug)]
pub struct XmlError {
    /// Where in the document the error occurred
    pub context: Box<ErrorContext>,

    /// The kind of error
    pub kind: XmlErrorKind,
}
impl XmlError {
    /// Creates a new `XmlError`
    #[must_use]
    pub fn new(kind: XmlErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Box::new(context),
            kind,
        }
    }

    /// Creates a new `XmlError` located at `tag`.
    pub(crate) fn at_tag(kind: XmlErrorKind, src: &[u8], tag: &Tag<'_>) -> Self {
        Self::new(kind, ErrorContext::at_tag(src, tag))
    }
}
impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;

        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
impl From<XmlErrorKind> for XmlError {
    fn from(kind: XmlErrorKind) -> Self {
        Self::new(kind, ErrorContext::default())
    }
}
impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        XmlErrorKind::Io(err).into()
    }
}

/// The kind of error that aborted a parse.
#[derive(Debug, thiserror::Error)]
pub enum XmlErrorKind {
    /// No input was given
    #[error("No input to parse")]
    NullInput,

    /// A field could not be wired up, for example a nested type the introspector cannot create
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Text for a numeric or boolean field did not parse
    #[error("Cannot convert `{text}` for field `{field}`: {source}")]
    NumericConversion {
        /// The field being assigned
        field: String,

        /// The offending text
        text: String,

        /// Why it did not parse
        #[source]
        source: ConversionError,
    },

    /// IO error occurred while reading the input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Location of an error in the input.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the tag being processed, if any.
    pub tag: Option<String>,

    /// Byte offset of the tag in the input.
    pub offset: usize,

    /// 1-based row and column of the tag, if the error has a location.
    pub position: Option<(usize, usize)>,

    /// The source line containing the tag.
    pub line: String,
}
impl ErrorContext {
    /// Creates an `ErrorContext` pointing at `tag`.
    #[must_use]
    pub fn at_tag(src: &[u8], tag: &Tag<'_>) -> Self {
        let offset = tag.start();
        Self {
            tag: Some(tag.tag_name().to_string()),
            offset,
            position: Some(span::position_in_text(offset, src)),
            line: span::line_at(offset, src).into_owned(),
        }
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self.line.trim();
        if !line.is_empty() {
            writeln!(f, "| {line}")?;
        }

        if let Some((row, col)) = self.position {
            write!(f, "= At {row}:{col}")?;
            if let Some(tag) = &self.tag {
                write!(f, " in <{tag}>")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
