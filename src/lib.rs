#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

#[macro_use]
mod trace;

pub mod config;
pub mod dialect;
pub mod errors;
pub mod placeholder;
pub mod query;
mod statement;
pub mod value;

// Re-export main types
pub use config::{BooleanStyle, Config};
pub use dialect::{Dialect, MySql, Postgres, Sqlite};
pub use placeholder::{Index, Placeholder, PlaceholderMap, PlaceholderType, QuoteStyle};
pub use query::Query;
pub use value::{Array, Key, SourceKind, Value};

// Re-export errors
pub use errors::{CoercionError, Error};
