/// Parser configuration.
///
/// ```rust
/// use xmlbind::ParseOptions;
///
/// let options = ParseOptions::default().with_lenient_numbers(true);
/// assert!(options.trim_text);
/// assert!(options.lenient_numbers);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Trim whitespace around element text and CDATA content before conversion.
    ///
    /// Default: `true`
    pub trim_text: bool,

    /// Drop values whose numeric or boolean conversion fails, instead of failing the parse.
    ///
    /// Default: `false`
    pub lenient_numbers: bool,
}
impl ParseOptions {
    /// Set [`ParseOptions::trim_text`].
    #[must_use]
    pub fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    /// Set [`ParseOptions::lenient_numbers`].
    #[must_use]
    pub fn with_lenient_numbers(mut self, lenient_numbers: bool) -> Self {
        self.lenient_numbers = lenient_numbers;
        self
    }
}
impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trim_text: true,
            lenient_numbers: false,
        }
    }
}
