//! One-shot analysis of a template into its canonical form and placeholders.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;

mod indexer;
pub(crate) mod scanner;
mod template;

use crate::config::Config;
use crate::errors::Error;
use crate::placeholder::{Index, Placeholder, PlaceholderMap, PlaceholderType};
use crate::value::Value;
use scanner::Piece;
use template::Segment;

type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// A parsed template: parse once, render many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    canonical: String,
    segments: Vec<Segment>,
    placeholders: PlaceholderMap,
}

impl Statement {
    /// Parses `sql`, returning `None` when it contains no placeholder.
    ///
    /// # Errors
    ///
    /// * `UnexpectedPlaceholderType` - If a marker code names no placeholder type.
    /// * `TypeChangeDetected` - If one index is declared with two different types.
    /// * `UnresolvedReference` - If a reference has no typed occurrence.
    pub fn parse(sql: &str, config: &Config) -> Result<Option<Self>, Error> {
        let (open, close) = config.block_markers();
        let pieces = scanner::scan(sql, open, close);
        if !pieces.iter().any(|piece| matches!(piece, Piece::Marker(_))) {
            return Ok(None);
        }

        let indexed = indexer::index(sql, &pieces)?;
        let segments = template::build(&pieces, indexed.slots);
        let canonical = template::canonical(&segments, open, close);
        let placeholders: PlaceholderMap = {
            let conditional = template::conditional(&segments);
            indexed
                .declarations
                .into_iter()
                .map(|(index, kind)| {
                    let conditional = conditional.get(&index).copied().unwrap_or(false);
                    Placeholder::new(index, kind, conditional)
                })
                .collect()
        };

        trace_parse!(canonical, placeholders.len());
        Ok(Some(Self {
            canonical,
            segments,
            placeholders,
        }))
    }

    /// The template with every marker rewritten to `{index}`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The distinct placeholders, in first-seen order.
    pub fn placeholders(&self) -> &PlaceholderMap {
        &self.placeholders
    }

    /// Binds `values`, renders the query and flushes every binding.
    ///
    /// A later value for the same index replaces an earlier one. Values for
    /// indices the template does not declare are ignored.
    ///
    /// # Errors
    ///
    /// * `PlaceholdersWithoutValue` - If a mandatory placeholder has no value.
    /// * `Coercion` - If a value cannot be rendered for its placeholder.
    pub fn render<I>(&mut self, config: &Config, values: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (Index, Value)>,
    {
        let rendered = self.bind_and_render(config, values);
        self.placeholders.flush();
        rendered
    }

    fn bind_and_render<I>(&mut self, config: &Config, values: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (Index, Value)>,
    {
        let supplied: IndexMap<Index, Value> = values.into_iter().collect();

        let missing: Vec<(Index, PlaceholderType)> = self
            .placeholders
            .iter()
            .filter(|placeholder| {
                !placeholder.is_conditional() && !supplied.contains_key(placeholder.index())
            })
            .map(|placeholder| (placeholder.index().clone(), placeholder.kind()))
            .collect();
        if !missing.is_empty() {
            trace_missing!(self.canonical, missing.len());
            return Err(Error::PlaceholdersWithoutValue {
                query: self.canonical.clone(),
                missing,
            });
        }

        for (index, value) in supplied {
            if let Some(placeholder) = self.placeholders.get_mut(&index) {
                placeholder.assign(config, value)?;
            }
        }

        trace_render!(
            self.canonical,
            self.placeholders
                .iter()
                .filter(|placeholder| placeholder.value().is_some())
                .count()
        );
        let mut out = String::with_capacity(self.canonical.len());
        template::render(&self.segments, &self.placeholders, &mut out);
        Ok(out)
    }
}
