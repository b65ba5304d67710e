//! Per-instance rendering configuration.
//!
//! A [`Config`] gathers everything the engine needs from its host: the
//! driver's escape function, the boolean rendering style, the identifier and
//! constant patterns, the identifier quotes, and the optional-block markers.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::fmt;

use regex::Regex;

use crate::dialect::Dialect;
use crate::errors::Error;

/// Default pattern for identifiers such as `table.column`.
pub const DEFAULT_QUANTIFIER: &str = r"^[^\W\d]([\w.]*\w)?$";

/// Default pattern for raw SQL constants such as `DESC` or `NOW()`.
pub const DEFAULT_CONSTANT: &str = r"^[^\W\d][\w.]*(\(\))?(\s+[^\W\d][\w.]*(\(\))?)*$";

/// A string escape supplied by the database driver.
pub type Escape = Rc<dyn Fn(&str) -> String>;

/// How boolean values are written into SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BooleanStyle {
    /// `1` / `0`, for engines without boolean keywords.
    #[default]
    Numeric,
    /// `TRUE` / `FALSE`.
    Keyword,
}

impl BooleanStyle {
    /// Renders a boolean in this style.
    #[must_use]
    pub const fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Numeric, true) => "1",
            (Self::Numeric, false) => "0",
            (Self::Keyword, true) => "TRUE",
            (Self::Keyword, false) => "FALSE",
        }
    }
}

/// Rendering configuration shared by a parsed template and its placeholders.
#[derive(Clone)]
pub struct Config {
    escape: Escape,
    booleans: BooleanStyle,
    quantifier: Regex,
    constant: Regex,
    start_quote: String,
    end_quote: String,
    open: String,
    close: String,
}

impl Config {
    /// Creates a configuration around the driver's escape function.
    ///
    /// Defaults: numeric booleans, backtick quotes, `[` and `]` block markers.
    pub fn new<F>(escape: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        Self {
            escape: Rc::new(escape),
            booleans: BooleanStyle::default(),
            quantifier: Regex::new(DEFAULT_QUANTIFIER).expect("default quantifier pattern"),
            constant: Regex::new(DEFAULT_CONSTANT).expect("default constant pattern"),
            start_quote: "`".into(),
            end_quote: "`".into(),
            open: "[".into(),
            close: "]".into(),
        }
    }

    /// Creates a configuration from a dialect adapter.
    pub fn for_dialect<D>(dialect: D) -> Self
    where
        D: Dialect + 'static,
    {
        let booleans = if dialect.supports_boolean() {
            BooleanStyle::Keyword
        } else {
            BooleanStyle::Numeric
        };
        let quotes = dialect.identifier_quotes();
        Self::new(move |raw| dialect.escape(raw))
            .booleans(booleans)
            .quotes(quotes)
    }

    /// Sets the boolean rendering style.
    #[must_use]
    pub fn booleans(mut self, style: BooleanStyle) -> Self {
        self.booleans = style;
        self
    }

    /// Sets the identifier quotes.
    ///
    /// Two characters give distinct start and end quotes, one character is used
    /// on both sides, anything else disables quoting.
    #[must_use]
    pub fn quotes(mut self, quotes: &str) -> Self {
        let mut chars = quotes.chars();
        let (start, end) = match (chars.next(), chars.next(), chars.next()) {
            (Some(start), Some(end), None) => (start.to_string(), end.to_string()),
            (Some(both), None, None) => (both.to_string(), both.to_string()),
            _ => (String::new(), String::new()),
        };
        self.start_quote = start;
        self.end_quote = end;
        self
    }

    /// Overrides the identifier pattern used by quantifier-like types.
    ///
    /// # Errors
    ///
    /// * `InvalidPattern` - If the pattern does not compile.
    pub fn quantifier(mut self, pattern: &str) -> Result<Self, Error> {
        self.quantifier = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            role: "quantifier",
            source,
        })?;
        Ok(self)
    }

    /// Overrides the pattern constant placeholders must match.
    ///
    /// # Errors
    ///
    /// * `InvalidPattern` - If the pattern does not compile.
    pub fn constant(mut self, pattern: &str) -> Result<Self, Error> {
        self.constant = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            role: "constant",
            source,
        })?;
        Ok(self)
    }

    /// Sets the markers delimiting optional blocks.
    ///
    /// # Errors
    ///
    /// * `InvalidBrackets` - If a marker is empty or contains word characters or braces.
    pub fn brackets(mut self, open: &str, close: &str) -> Result<Self, Error> {
        let valid = |marker: &str| {
            !marker.is_empty()
                && !marker
                    .chars()
                    .any(|c| c.is_alphanumeric() || matches!(c, '_' | '{' | '}'))
        };
        if !valid(open) || !valid(close) {
            return Err(Error::InvalidBrackets {
                open: open.into(),
                close: close.into(),
            });
        }
        self.open = open.into();
        self.close = close.into();
        Ok(self)
    }

    /// Escapes raw text with the driver's escape function.
    #[must_use]
    pub fn escape(&self, raw: &str) -> String {
        (self.escape)(raw)
    }

    /// Renders a boolean in the configured style.
    #[must_use]
    pub fn boolean(&self, value: bool) -> &'static str {
        self.booleans.render(value)
    }

    /// Whether `value` is shaped like an identifier.
    #[must_use]
    pub fn is_quantifier(&self, value: &str) -> bool {
        self.quantifier.is_match(value)
    }

    /// Whether `value` may be injected as a raw constant.
    #[must_use]
    pub fn is_constant(&self, value: &str) -> bool {
        self.constant.is_match(value)
    }

    /// Wraps every dot-separated segment of `identifier` in the configured quotes.
    #[must_use]
    pub fn quote_identifier(&self, identifier: &str) -> String {
        let separator = alloc::format!("{}.{}", self.end_quote, self.start_quote);
        let mut out = String::with_capacity(identifier.len() + 2 * self.start_quote.len());
        out.push_str(&self.start_quote);
        out.push_str(&identifier.replace('.', &separator));
        out.push_str(&self.end_quote);
        out
    }

    /// The optional-block open and close markers.
    #[must_use]
    pub fn block_markers(&self) -> (&str, &str) {
        (&self.open, &self.close)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("booleans", &self.booleans)
            .field("quantifier", &self.quantifier.as_str())
            .field("constant", &self.constant.as_str())
            .field("start_quote", &self.start_quote)
            .field("end_quote", &self.end_quote)
            .field("open", &self.open)
            .field("close", &self.close)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(|raw| raw.replace('\'', "''"))
    }

    #[test]
    fn test_quotes_single_pair_and_none() {
        assert_eq!(config().quote_identifier("t.c"), "`t`.`c`");
        assert_eq!(config().quotes("[]").quote_identifier("t.c"), "[t].[c]");
        assert_eq!(config().quotes("\"").quote_identifier("col"), "\"col\"");
        assert_eq!(config().quotes("").quote_identifier("t.c"), "t.c");
    }

    #[test]
    fn test_default_quantifier_pattern() {
        let config = config();
        assert!(config.is_quantifier("users"));
        assert!(config.is_quantifier("db.users.id"));
        assert!(config.is_quantifier("имя"));
        assert!(!config.is_quantifier("1users"));
        assert!(!config.is_quantifier("users."));
        assert!(!config.is_quantifier("a b"));
        assert!(!config.is_quantifier("x`; DROP"));
    }

    #[test]
    fn test_default_constant_pattern() {
        let config = config();
        assert!(config.is_constant("DESC"));
        assert!(config.is_constant("NOW()"));
        assert!(config.is_constant("IS NOT NULL"));
        assert!(!config.is_constant("1; DROP TABLE t"));
        assert!(!config.is_constant("'x'"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = config().quantifier("(").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { role: "quantifier", .. }));
    }

    #[test]
    fn test_bracket_validation() {
        assert!(config().brackets("[#", "#]").is_ok());
        assert!(config().brackets("", "]").is_err());
        assert!(config().brackets("{", "}").is_err());
        assert!(config().brackets("IF", "END").is_err());
    }

    #[test]
    fn test_boolean_styles() {
        assert_eq!(config().boolean(true), "1");
        assert_eq!(config().booleans(BooleanStyle::Keyword).boolean(false), "FALSE");
    }
}
