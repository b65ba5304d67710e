//! Submodule defining the errors used across the crate.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::placeholder::{Index, PlaceholderType};
use crate::value::SourceKind;

/// Errors that can occur while parsing a template or rendering a query.
///
/// Every failure aborts the current call; no partially rendered query is ever
/// returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Mandatory placeholders were left without a value.
    #[error(
        "When filling the \"{query}\" query, some placeholders were left without a value: {}",
        join_missing(.missing)
    )]
    PlaceholdersWithoutValue {
        /// The canonical template being rendered.
        query: String,
        /// Every unfilled placeholder with its declared type, in declaration order.
        missing: Vec<(Index, PlaceholderType)>,
    },
    /// A join call did not supply the shared value at position 0.
    #[error("The query \"{query}\" is missing a shared value required for the placeholders with indices '0' and '1'")]
    MissingSharedValue {
        /// The canonical template being rendered.
        query: String,
    },
    /// A join call supplied a shared value that is not an array.
    #[error("Unexpected shared value type in query \"{query}\": expected 'array', got '{found}'")]
    UnexpectedSharedValueType {
        /// The canonical template being rendered.
        query: String,
        /// The kind that was supplied instead.
        found: SourceKind,
    },
    /// The same index was declared with two different types.
    #[error(
        "While parsing SQL statement \"{statement}\", an invalid change of placeholder '{index}' type from '{from}' to '{to}' was detected"
    )]
    TypeChangeDetected {
        /// The raw template.
        statement: String,
        /// The index declared twice.
        index: Index,
        /// The type of the first declaration.
        from: PlaceholderType,
        /// The conflicting type.
        to: PlaceholderType,
    },
    /// A marker carried a code that names no placeholder type.
    #[error("Unexpected placeholder type '{code}' with index '{index}'")]
    UnexpectedPlaceholderType {
        /// The marker code as written.
        code: String,
        /// The index of the marker, or the ordinal it would have received.
        index: Index,
    },
    /// A `{name}` reference has no typed occurrence to take its type from.
    #[error("Placeholder reference '{{{index}}}' does not match any typed placeholder")]
    UnresolvedReference {
        /// The referenced index.
        index: Index,
    },
    /// A configured pattern failed to compile.
    #[error("Invalid {role} pattern: {source}")]
    InvalidPattern {
        /// Which pattern was being compiled.
        role: &'static str,
        /// The regex compilation error.
        source: regex::Error,
    },
    /// The optional-block markers cannot be told apart from placeholders.
    #[error("Invalid optional block markers '{open}' and '{close}'")]
    InvalidBrackets {
        /// Opening marker.
        open: String,
        /// Closing marker.
        close: String,
    },
    /// A value could not be converted for its placeholder.
    #[error("Cannot bind a {found} value to placeholder '{index}{kind}': {reason}")]
    Coercion {
        /// Index of the placeholder.
        index: Index,
        /// Declared type of the placeholder.
        kind: PlaceholderType,
        /// Kind of the offending value.
        found: SourceKind,
        /// Why the value was rejected.
        reason: CoercionError,
    },
}

fn join_missing(missing: &[(Index, PlaceholderType)]) -> String {
    let mut out = String::new();
    for (i, (index, kind)) in missing.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing into a `String` cannot fail.
        let _ = write!(out, "'{index}{kind}'");
    }
    out
}

/// Reasons a single value is rejected by the type matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    /// The source kind is not accepted by this placeholder type.
    #[error("the value type is not accepted")]
    InvalidType,
    /// The placeholder type cannot render a scalar in this position.
    #[error("invalid context for a scalar value")]
    InvalidContext,
    /// An array was given to a scalar placeholder type.
    #[error("the value type 'array' does not match the placeholder type")]
    ArrayNotAccepted,
    /// An array entry was itself an array.
    #[error("nested arrays cannot be rendered")]
    NestedArray,
    /// A string was offered to a numeric type but is not a number.
    #[error("the string '{0}' is not numeric")]
    NotNumeric(String),
    /// A value offered to a natural-number type is zero or negative.
    #[error("'{0}' does not belong to the positive natural number series")]
    NotNaturalNumber(String),
    /// A value offered to an unsigned type is negative.
    #[error("expected a non-negative number, got '{0}'")]
    NegativeNumber(String),
    /// Narrowing a floating point value to an integer would lose data.
    #[error("passing the floating point number '{0}' to an integer placeholder loses data")]
    FloatDataLoss(f64),
    /// NaN and infinities have no SQL literal form.
    #[error("the number '{0}' is not finite")]
    NotFinite(f64),
    /// A constant string contains characters outside the safe expression pattern.
    #[error("the constant string '{0}' contains invalid characters")]
    InvalidCharacters(String),
    /// A string is not suitable for use as an identifier.
    #[error("'{0}' is not suitable for use as an identifier")]
    InvalidIdentifier(String),
}
