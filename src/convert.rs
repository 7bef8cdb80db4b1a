//! Scalar conversion from element or attribute text to a field's declared type.
use crate::{FieldType, Value};
use std::num::{ParseFloatError, ParseIntError};

/// Why text could not be converted to a numeric or boolean field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Not a valid integer for the field's width
    #[error("invalid integer: {0}")]
    Int(#[from] ParseIntError),

    /// Not a valid float
    #[error("invalid float: {0}")]
    Float(#[from] ParseFloatError),

    /// Not `true` or `false`
    #[error("invalid boolean `{0}`, expected `true` or `false`")]
    Bool(String),
}

/// Convert text to the declared type of a field.
///
/// Text and raw fields get the text verbatim. Numbers and booleans are parsed from the trimmed
/// text. Object and list fields cannot hold text; they get the raw text and the setter decides.
///
/// # Errors
/// Fails if a numeric or boolean field's text does not parse.
pub fn convert(ty: FieldType, text: &str) -> Result<Value, ConversionError> {
    let value = match ty {
        FieldType::Int => Value::Int(text.trim().parse()?),
        FieldType::Long => Value::Long(text.trim().parse()?),
        FieldType::Float => Value::Float(text.trim().parse()?),
        FieldType::Double => Value::Double(text.trim().parse()?),
        FieldType::Bool => Value::Bool(parse_bool(text.trim())?),
        FieldType::Text | FieldType::Raw | FieldType::Object(_) | FieldType::List(_) => {
            Value::Text(text.to_string())
        }
    };

    Ok(value)
}

fn parse_bool(text: &str) -> Result<bool, ConversionError> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConversionError::Bool(text.to_string()))
    }
}

/// Strip a `<![CDATA[ ... ]]>` wrapper from element text, if present.
pub(crate) fn strip_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_verbatim() {
        let value = convert(FieldType::Text, " keep  spacing ").unwrap();
        assert_eq!(value.as_text(), Some(" keep  spacing "));

        let value = convert(FieldType::Raw, "2024-01-01").unwrap();
        assert_eq!(value.as_text(), Some("2024-01-01"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(convert(FieldType::Int, " 42 ").unwrap().into_i32(), Ok(42));
        assert_eq!(
            convert(FieldType::Long, "9000000000").unwrap().into_i64(),
            Ok(9_000_000_000)
        );
        assert_eq!(convert(FieldType::Float, "1.5").unwrap().into_f32(), Ok(1.5));
        assert_eq!(convert(FieldType::Double, "-2.25").unwrap().into_f64(), Ok(-2.25));
    }

    #[test]
    fn test_number_failures() {
        assert!(matches!(
            convert(FieldType::Int, "abc"),
            Err(ConversionError::Int(_))
        ));
        assert!(matches!(
            convert(FieldType::Int, "9000000000"),
            Err(ConversionError::Int(_))
        ));
        assert!(matches!(
            convert(FieldType::Double, "1,5"),
            Err(ConversionError::Float(_))
        ));
        assert!(matches!(
            convert(FieldType::Long, ""),
            Err(ConversionError::Int(_))
        ));
    }

    #[test]
    fn test_bool() {
        assert_eq!(convert(FieldType::Bool, "true").unwrap().into_bool(), Ok(true));
        assert_eq!(convert(FieldType::Bool, "FALSE").unwrap().into_bool(), Ok(false));
        assert_eq!(
            convert(FieldType::Bool, "yes").unwrap_err(),
            ConversionError::Bool("yes".to_string())
        );
    }

    #[test]
    fn test_strip_cdata() {
        assert_eq!(strip_cdata("<![CDATA[raw <<text>> here]]>"), "raw <<text>> here");
        assert_eq!(strip_cdata("plain"), "plain");
        assert_eq!(strip_cdata("<![CDATA[unterminated"), "<![CDATA[unterminated");
    }
}
