//! The render entry points over a parsed template.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::Config;
use crate::errors::Error;
use crate::placeholder::{Index, Placeholder};
use crate::statement::Statement;
use crate::value::{Array, Key, Value};

/// A SQL template parsed once and rendered on demand.
///
/// Each render call binds its values, renders, and clears the bindings again,
/// so a `Query` is reusable but must not be shared between concurrent
/// renderers.
///
/// # Example
///
/// ```
/// use sql_placeholder_rs::{Config, Query};
///
/// let config = Config::new(|raw| raw.replace('\'', "''"));
/// let mut query = Query::new(config, "SELECT * FROM users WHERE id = :i [AND name = :s]")?;
///
/// assert_eq!(query.list([7])?, "SELECT * FROM users WHERE id = 7 ");
/// assert_eq!(
///     query.map([("0", "7"), ("1", "O'Hara")])?,
///     "SELECT * FROM users WHERE id = 7 AND name = 'O''Hara'"
/// );
/// # Ok::<(), sql_placeholder_rs::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    config: Config,
    source: String,
    statement: Option<Statement>,
}

impl Query {
    /// Parses `sql` under `config`.
    ///
    /// # Errors
    ///
    /// * `UnexpectedPlaceholderType` - If a marker code names no placeholder type.
    /// * `TypeChangeDetected` - If one index is declared with two different types.
    /// * `UnresolvedReference` - If a reference has no typed occurrence.
    pub fn new(config: Config, sql: &str) -> Result<Self, Error> {
        let statement = Statement::parse(sql, &config)?;
        Ok(Self {
            config,
            source: sql.into(),
            statement,
        })
    }

    /// Replaces the template. On error the previous template is kept.
    ///
    /// # Errors
    ///
    /// Same as [`Query::new`].
    pub fn set_statement(&mut self, sql: &str) -> Result<(), Error> {
        self.statement = Statement::parse(sql, &self.config)?;
        self.source = sql.into();
        Ok(())
    }

    /// The template as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The canonical template, or the source when it has no placeholder.
    #[must_use]
    pub fn canonical(&self) -> &str {
        self.statement
            .as_ref()
            .map_or(self.source.as_str(), Statement::canonical)
    }

    /// The configuration this query renders with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The declared placeholders, in first-seen order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.statement
            .iter()
            .flat_map(|statement| statement.placeholders().iter())
    }

    /// Looks a declared placeholder up by index.
    #[must_use]
    pub fn placeholder(&self, index: &Index) -> Option<&Placeholder> {
        self.statement
            .as_ref()
            .and_then(|statement| statement.placeholders().get(index))
    }

    /// Renders with positional values: the n-th value fills ordinal `n`.
    ///
    /// # Errors
    ///
    /// * `PlaceholdersWithoutValue` - If a mandatory placeholder has no value.
    /// * `Coercion` - If a value cannot be rendered for its placeholder.
    pub fn list<I, V>(&mut self, values: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.build(
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| (Index::Ordinal(i), value.into()))
                .collect(),
        )
    }

    /// Renders with keyed values: integer keys fill ordinals, names fill named indices.
    ///
    /// # Errors
    ///
    /// * `PlaceholdersWithoutValue` - If a mandatory placeholder has no value.
    /// * `Coercion` - If a value cannot be rendered for its placeholder.
    pub fn map<I, K, V>(&mut self, options: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        self.build(
            options
                .into_iter()
                .map(|(key, value)| (Index::from(&key.into()), value.into()))
                .collect(),
        )
    }

    /// Renders with `shared` bound to ordinals 0 and 1, then `values` from ordinal 2.
    ///
    /// A deferred `shared` value is resolved once.
    ///
    /// # Errors
    ///
    /// * `PlaceholdersWithoutValue` - If a mandatory placeholder has no value.
    /// * `Coercion` - If a value cannot be rendered for its placeholder.
    pub fn share<S, I, V>(&mut self, shared: S, values: I) -> Result<String, Error>
    where
        S: Into<Value>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let shared = shared.into().resolve();
        let mut bound = Vec::new();
        bound.push((Index::Ordinal(0), shared.clone()));
        bound.push((Index::Ordinal(1), shared));
        bound.extend(
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| (Index::Ordinal(i + 2), value.into())),
        );
        self.build(bound)
    }

    /// Renders with `options[0]` bound to ordinal 0 and every option shifted by one.
    ///
    /// Integer keys are renumbered from 1 in order, so the shared array also
    /// fills ordinal 1; named keys keep their names.
    ///
    /// # Errors
    ///
    /// * `MissingSharedValue` - If `options` has no entry at key 0.
    /// * `UnexpectedSharedValueType` - If that entry is not an array.
    /// * `PlaceholdersWithoutValue` - If a mandatory placeholder has no value.
    /// * `Coercion` - If a value cannot be rendered for its placeholder.
    pub fn join(&mut self, options: Array) -> Result<String, Error> {
        let Some(shared) = options.get(&Key::Index(0)) else {
            return Err(Error::MissingSharedValue {
                query: self.canonical().into(),
            });
        };
        let shared = shared.clone().resolve();
        if !matches!(shared, Value::Array(_)) {
            return Err(Error::UnexpectedSharedValueType {
                query: self.canonical().into(),
                found: shared.kind(),
            });
        }

        let mut bound = Vec::with_capacity(options.len() + 1);
        bound.push((Index::Ordinal(0), shared.clone()));
        let mut ordinal = 1;
        for (key, value) in options {
            let value = if key == Key::Index(0) {
                shared.clone()
            } else {
                value
            };
            let index = match key {
                Key::Index(_) => {
                    ordinal += 1;
                    Index::Ordinal(ordinal - 1)
                }
                Key::Name(name) => Index::parse(&name),
            };
            bound.push((index, value));
        }
        self.build(bound)
    }

    fn build(&mut self, values: Vec<(Index, Value)>) -> Result<String, Error> {
        if let Some(statement) = self.statement.as_mut() {
            statement.render(&self.config, values)
        } else {
            Ok(self.source.clone())
        }
    }
}
