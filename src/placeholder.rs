//! Placeholders: typed slots of a parsed template and their bound values.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

mod kind;
mod map;
pub(crate) mod matrix;

pub use kind::{PlaceholderType, QuoteStyle, UnknownTypeCode};
pub use map::PlaceholderMap;

use crate::config::Config;
use crate::errors::{CoercionError, Error};
use crate::value::{Array, Key, SourceKind, Value, canonical_decimal};

/// The stable identity of a placeholder.
///
/// Anonymous markers receive an [`Index::Ordinal`]; explicit names that spell a
/// canonical non-negative decimal are ordinals too, every other name is an
/// [`Index::Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Index {
    /// Positional index.
    Ordinal(usize),
    /// Named index.
    Name(String),
}

impl Index {
    /// Classifies an explicit index name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        canonical_decimal(name)
            .and_then(|i| usize::try_from(i).ok())
            .map_or_else(|| Index::Name(name.into()), Index::Ordinal)
    }

    /// The `{index}` token standing for this placeholder in a canonical template.
    #[must_use]
    pub fn token(&self) -> String {
        alloc::format!("{{{self}}}")
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Ordinal(i) => write!(f, "{i}"),
            Index::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Index {
    fn from(v: usize) -> Self {
        Index::Ordinal(v)
    }
}

impl From<i32> for Index {
    fn from(v: i32) -> Self {
        usize::try_from(v).map_or_else(|_| Index::Name(v.to_string()), Index::Ordinal)
    }
}

impl From<&str> for Index {
    fn from(v: &str) -> Self {
        Index::parse(v)
    }
}

impl From<String> for Index {
    fn from(v: String) -> Self {
        Index::parse(&v)
    }
}

impl From<&Key> for Index {
    fn from(key: &Key) -> Self {
        match key {
            Key::Index(i) => {
                usize::try_from(*i).map_or_else(|_| Index::Name(i.to_string()), Index::Ordinal)
            }
            Key::Name(name) => Index::parse(name),
        }
    }
}

/// One placeholder of a parsed template.
///
/// A placeholder holds its bound text only between [`Placeholder::assign`] and
/// [`Placeholder::flush`]; the rest of its state lives as long as the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    index: Index,
    kind: PlaceholderType,
    conditional: bool,
    value: Option<String>,
}

impl Placeholder {
    /// Creates an unbound placeholder.
    #[must_use]
    pub fn new(index: Index, kind: PlaceholderType, conditional: bool) -> Self {
        Self {
            index,
            kind,
            conditional,
            value: None,
        }
    }

    /// The placeholder's index.
    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The placeholder's declared type.
    #[must_use]
    pub fn kind(&self) -> PlaceholderType {
        self.kind
    }

    /// Whether every occurrence sits inside an optional block.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    /// The rendered text of the bound value, if any.
    ///
    /// A [`PlaceholderType::Fake`] placeholder bound to a falsy value has no
    /// text and counts as unbound.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The `{index}` token this placeholder replaces.
    #[must_use]
    pub fn search(&self) -> String {
        self.index.token()
    }

    /// Binds `value` and renders it immediately.
    ///
    /// Deferred values are resolved first. Arrays expand according to the
    /// placeholder type: `key = value` pairs, a literal list, a key list or a
    /// value list, all joined by `, `.
    ///
    /// # Errors
    ///
    /// * `Coercion` - If the value cannot be rendered for this placeholder's type.
    pub fn assign(&mut self, config: &Config, value: Value) -> Result<(), Error> {
        self.value = None;
        let rendered = match value.resolve() {
            Value::Array(array) => self.render_array(config, &array),
            scalar => self
                .render_top_scalar(config, &scalar)
                .map_err(|reason| (scalar.kind(), reason)),
        };
        match rendered {
            Ok(text) => {
                self.value = text;
                Ok(())
            }
            Err((found, reason)) => Err(Error::Coercion {
                index: self.index.clone(),
                kind: self.kind,
                found,
                reason,
            }),
        }
    }

    /// Clears the bound value.
    pub fn flush(&mut self) {
        self.value = None;
    }

    /// Array types take NULL as "no array" but no other scalar.
    fn render_top_scalar(
        &self,
        config: &Config,
        scalar: &Value,
    ) -> Result<Option<String>, CoercionError> {
        if self.kind.needs_array() && !matches!(scalar, Value::Null) {
            return Err(CoercionError::InvalidContext);
        }
        render_scalar(self.kind, config, scalar)
    }

    fn render_array(
        &self,
        config: &Config,
        array: &Array,
    ) -> Result<Option<String>, (SourceKind, CoercionError)> {
        let kind = self.kind;
        let mut parts = Vec::with_capacity(array.len());

        if kind.needs_map() {
            for (key, entry) in array {
                let name = matrix::identifier(kind, config, &key.as_text())
                    .map_err(|reason| (SourceKind::Array, reason))?;
                let literal = render_entry(kind, config, entry)?;
                parts.push(alloc::format!("{name} = {literal}"));
            }
        } else if kind.needs_list() {
            for entry in array.values() {
                parts.push(render_entry(kind, config, entry)?);
            }
        } else if kind.needs_keys() {
            for key in array.keys() {
                parts.push(
                    matrix::identifier(kind, config, &key.as_text())
                        .map_err(|reason| (SourceKind::Array, reason))?,
                );
            }
        } else if kind.needs_values() {
            for entry in array.values() {
                match entry.clone().resolve() {
                    Value::Text(name) => parts.push(
                        matrix::identifier(kind, config, &name)
                            .map_err(|reason| (SourceKind::String, reason))?,
                    ),
                    other => return Err((other.kind(), CoercionError::InvalidType)),
                }
            }
        } else {
            return Err((SourceKind::Array, CoercionError::ArrayNotAccepted));
        }

        Ok(Some(parts.join(", ")))
    }
}

/// Renders one array entry through the scalar matrix.
fn render_entry(
    kind: PlaceholderType,
    config: &Config,
    entry: &Value,
) -> Result<String, (SourceKind, CoercionError)> {
    let entry = entry.clone().resolve();
    if matches!(entry, Value::Array(_)) {
        return Err((SourceKind::Array, CoercionError::NestedArray));
    }
    render_scalar(kind, config, &entry)
        .map(Option::unwrap_or_default)
        .map_err(|reason| (entry.kind(), reason))
}

/// Dispatches a resolved scalar to the matrix function for its kind.
fn render_scalar(
    kind: PlaceholderType,
    config: &Config,
    scalar: &Value,
) -> Result<Option<String>, CoercionError> {
    match scalar {
        Value::Null => matrix::render_null(kind, config),
        Value::Bool(v) => matrix::render_boolean(kind, config, *v),
        Value::Integer(v) => matrix::render_integer(kind, config, *v),
        Value::Double(v) => matrix::render_double(kind, config, *v),
        Value::Text(v) => matrix::render_string(kind, config, v),
        Value::Array(_) => Err(CoercionError::NestedArray),
        Value::Deferred(_) => render_scalar(kind, config, &scalar.clone().resolve()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(|raw| raw.replace('\'', "''"))
    }

    fn bound(kind: PlaceholderType, value: impl Into<Value>) -> Result<Option<String>, Error> {
        let mut placeholder = Placeholder::new(Index::Ordinal(0), kind, false);
        placeholder.assign(&config(), value.into())?;
        Ok(placeholder.value().map(String::from))
    }

    #[test]
    fn test_index_parse() {
        assert_eq!(Index::parse("0"), Index::Ordinal(0));
        assert_eq!(Index::parse("12"), Index::Ordinal(12));
        assert_eq!(Index::parse("012"), Index::Name("012".into()));
        assert_eq!(Index::parse("id"), Index::Name("id".into()));
        assert_eq!(Index::from(-1), Index::Name("-1".into()));
        assert_eq!(Index::Name("id".into()).token(), "{id}");
    }

    #[test]
    fn test_map_expansion() {
        let value = Value::map([("a", 1), ("b", 2)]);
        assert_eq!(
            bound(PlaceholderType::Map, value.clone()).unwrap().unwrap(),
            "`a` = 1, `b` = 2"
        );
        assert_eq!(
            bound(PlaceholderType::MapUnquoted, value.clone()).unwrap().unwrap(),
            "a = 1, b = 2"
        );
        assert_eq!(
            bound(PlaceholderType::Keys, value.clone()).unwrap().unwrap(),
            "`a`, `b`"
        );
        assert_eq!(
            bound(PlaceholderType::KeysUnquoted, value).unwrap().unwrap(),
            "a, b"
        );
    }

    #[test]
    fn test_list_and_values_expansion() {
        assert_eq!(
            bound(PlaceholderType::List, Value::list([Value::from(1), "x".into(), Value::Null]))
                .unwrap()
                .unwrap(),
            "1, 'x', ''"
        );
        assert_eq!(
            bound(PlaceholderType::Values, Value::list(["id", "user.name"]))
                .unwrap()
                .unwrap(),
            "`id`, `user`.`name`"
        );
        assert_eq!(
            bound(PlaceholderType::ValuesUnquoted, Value::list(["id"]))
                .unwrap()
                .unwrap(),
            "id"
        );
    }

    #[test]
    fn test_positional_keys_are_not_identifiers() {
        let err = bound(PlaceholderType::Keys, Value::list(["a"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Coercion {
                reason: CoercionError::InvalidIdentifier(_),
                ..
            }
        ));
    }

    #[test]
    fn test_array_to_scalar_type() {
        let err = bound(PlaceholderType::Integer, Value::list([1])).unwrap_err();
        assert_eq!(
            err,
            Error::Coercion {
                index: Index::Ordinal(0),
                kind: PlaceholderType::Integer,
                found: SourceKind::Array,
                reason: CoercionError::ArrayNotAccepted,
            }
        );
    }

    #[test]
    fn test_scalar_to_array_type() {
        let err = bound(PlaceholderType::Keys, "a").unwrap_err();
        assert!(matches!(
            err,
            Error::Coercion {
                found: SourceKind::String,
                reason: CoercionError::InvalidContext,
                ..
            }
        ));
        assert!(bound(PlaceholderType::List, 5).is_err());
        assert_eq!(
            bound(PlaceholderType::ListNullable, Value::Null).unwrap().as_deref(),
            Some("NULL")
        );
    }

    #[test]
    fn test_nested_array_rejected() {
        let nested = Value::list([Value::list([1])]);
        let err = bound(PlaceholderType::List, nested).unwrap_err();
        assert!(matches!(
            err,
            Error::Coercion {
                reason: CoercionError::NestedArray,
                ..
            }
        ));
    }

    #[test]
    fn test_entry_errors_report_entry_kind() {
        let err = bound(PlaceholderType::Map, Value::map([("a", f64::NAN)])).unwrap_err();
        assert!(matches!(
            err,
            Error::Coercion {
                found: SourceKind::Double,
                reason: CoercionError::NotFinite(_),
                ..
            }
        ));
    }

    #[test]
    fn test_deferred_value_is_resolved() {
        let value = Value::deferred(|| Value::from("lazy"));
        assert_eq!(
            bound(PlaceholderType::String, value).unwrap().as_deref(),
            Some("'lazy'")
        );
    }

    #[test]
    fn test_flush_clears_value() {
        let mut placeholder = Placeholder::new(Index::Ordinal(0), PlaceholderType::Integer, false);
        placeholder.assign(&config(), Value::from(3)).unwrap();
        assert_eq!(placeholder.value(), Some("3"));
        placeholder.flush();
        assert_eq!(placeholder.value(), None);
    }

    #[test]
    fn test_failed_assign_leaves_placeholder_unbound() {
        let mut placeholder = Placeholder::new(Index::Ordinal(0), PlaceholderType::Integer, false);
        placeholder.assign(&config(), Value::from(3)).unwrap();
        assert!(placeholder.assign(&config(), Value::from("x")).is_err());
        assert_eq!(placeholder.value(), None);
    }
}
