//! The closed set of placeholder types and their marker codes.

use core::fmt;
use core::str::FromStr;

/// How identifier-shaped strings are emitted by quantifier-like types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Every dot-separated segment is wrapped in the configured quotes.
    Quoted,
    /// The identifier is emitted as written.
    Unquoted,
}

/// A placeholder type, written in templates as `:` or `?` plus an optional code.
///
/// The `:` family rejects NULL (or renders a type-specific empty value), the `?`
/// family renders NULL as `NULL`. Strict variants (upper-case codes for the
/// scalar families) accept only their own source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    /// `:` any scalar, NULL renders as `''`.
    Sequence,
    /// `?` any scalar, NULL renders as `NULL`.
    Nullable,
    /// `:C` raw SQL keyword or expression.
    Constant,
    /// `?C` raw SQL keyword or expression, NULL allowed.
    ConstantNullable,
    /// `:s` quoted string literal.
    String,
    /// `:S` quoted string literal from text only.
    StringStrict,
    /// `?s` quoted string literal, NULL allowed.
    StringNullable,
    /// `?S` quoted string literal from text only, NULL allowed.
    StringStrictNullable,
    /// `:i` integer.
    Integer,
    /// `:I` integer from integers only.
    IntegerStrict,
    /// `?i` integer, NULL allowed.
    IntegerNullable,
    /// `?I` integer from integers only, NULL allowed.
    IntegerStrictNullable,
    /// `:u` non-negative integer.
    Unsigned,
    /// `:U` non-negative integer from integers only.
    UnsignedStrict,
    /// `?u` non-negative integer, NULL allowed.
    UnsignedNullable,
    /// `?U` non-negative integer from integers only, NULL allowed.
    UnsignedStrictNullable,
    /// `:n` positive natural number.
    Numeric,
    /// `:N` positive natural number from integers only.
    NumericStrict,
    /// `?n` positive natural number, NULL allowed.
    NumericNullable,
    /// `?N` positive natural number from integers only, NULL allowed.
    NumericStrictNullable,
    /// `:d` floating point number.
    Double,
    /// `:D` floating point number from doubles only.
    DoubleStrict,
    /// `?d` floating point number, NULL allowed.
    DoubleNullable,
    /// `?D` floating point number from doubles only, NULL allowed.
    DoubleStrictNullable,
    /// `:b` boolean in the configured style.
    Boolean,
    /// `:B` boolean from booleans only.
    BooleanStrict,
    /// `?b` boolean, NULL allowed.
    BooleanNullable,
    /// `?B` boolean from booleans only, NULL allowed.
    BooleanStrictNullable,
    /// `:z` raw text passed through unescaped.
    Blob,
    /// `:q` quoted identifier such as `table.column`.
    Quantifier,
    /// `:Q` unquoted identifier.
    QuantifierUnquoted,
    /// `:L` array rendered as a comma-separated list of literals.
    List,
    /// `?L` list, NULL allowed.
    ListNullable,
    /// `:a` array rendered as quoted `key = value` pairs.
    Map,
    /// `?a` quoted pairs, NULL allowed.
    MapNullable,
    /// `:A` array rendered as unquoted `key = value` pairs.
    MapUnquoted,
    /// `?A` unquoted pairs, NULL allowed.
    MapUnquotedNullable,
    /// `:k` array keys as quoted identifiers.
    Keys,
    /// `:K` array keys as unquoted identifiers.
    KeysUnquoted,
    /// `:v` array values as quoted identifiers.
    Values,
    /// `:V` array values as unquoted identifiers.
    ValuesUnquoted,
    /// `:f` renders nothing; a falsy value leaves the placeholder unbound.
    Fake,
}

impl PlaceholderType {
    /// Every variant, in declaration order.
    pub const ALL: [PlaceholderType; 42] = [
        Self::Sequence,
        Self::Nullable,
        Self::Constant,
        Self::ConstantNullable,
        Self::String,
        Self::StringStrict,
        Self::StringNullable,
        Self::StringStrictNullable,
        Self::Integer,
        Self::IntegerStrict,
        Self::IntegerNullable,
        Self::IntegerStrictNullable,
        Self::Unsigned,
        Self::UnsignedStrict,
        Self::UnsignedNullable,
        Self::UnsignedStrictNullable,
        Self::Numeric,
        Self::NumericStrict,
        Self::NumericNullable,
        Self::NumericStrictNullable,
        Self::Double,
        Self::DoubleStrict,
        Self::DoubleNullable,
        Self::DoubleStrictNullable,
        Self::Boolean,
        Self::BooleanStrict,
        Self::BooleanNullable,
        Self::BooleanStrictNullable,
        Self::Blob,
        Self::Quantifier,
        Self::QuantifierUnquoted,
        Self::List,
        Self::ListNullable,
        Self::Map,
        Self::MapNullable,
        Self::MapUnquoted,
        Self::MapUnquotedNullable,
        Self::Keys,
        Self::KeysUnquoted,
        Self::Values,
        Self::ValuesUnquoted,
        Self::Fake,
    ];

    /// The marker code as written in templates, e.g. `":i"` or `"?S"`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sequence => ":",
            Self::Nullable => "?",
            Self::Constant => ":C",
            Self::ConstantNullable => "?C",
            Self::String => ":s",
            Self::StringStrict => ":S",
            Self::StringNullable => "?s",
            Self::StringStrictNullable => "?S",
            Self::Integer => ":i",
            Self::IntegerStrict => ":I",
            Self::IntegerNullable => "?i",
            Self::IntegerStrictNullable => "?I",
            Self::Unsigned => ":u",
            Self::UnsignedStrict => ":U",
            Self::UnsignedNullable => "?u",
            Self::UnsignedStrictNullable => "?U",
            Self::Numeric => ":n",
            Self::NumericStrict => ":N",
            Self::NumericNullable => "?n",
            Self::NumericStrictNullable => "?N",
            Self::Double => ":d",
            Self::DoubleStrict => ":D",
            Self::DoubleNullable => "?d",
            Self::DoubleStrictNullable => "?D",
            Self::Boolean => ":b",
            Self::BooleanStrict => ":B",
            Self::BooleanNullable => "?b",
            Self::BooleanStrictNullable => "?B",
            Self::Blob => ":z",
            Self::Quantifier => ":q",
            Self::QuantifierUnquoted => ":Q",
            Self::List => ":L",
            Self::ListNullable => "?L",
            Self::Map => ":a",
            Self::MapNullable => "?a",
            Self::MapUnquoted => ":A",
            Self::MapUnquotedNullable => "?A",
            Self::Keys => ":k",
            Self::KeysUnquoted => ":K",
            Self::Values => ":v",
            Self::ValuesUnquoted => ":V",
            Self::Fake => ":f",
        }
    }

    /// Looks a variant up by its marker code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Whether an array binds as `key = value` pairs.
    #[must_use]
    pub const fn needs_map(self) -> bool {
        matches!(
            self,
            Self::Map | Self::MapNullable | Self::MapUnquoted | Self::MapUnquotedNullable
        )
    }

    /// Whether an array binds as a list of literals.
    #[must_use]
    pub const fn needs_list(self) -> bool {
        matches!(self, Self::List | Self::ListNullable)
    }

    /// Whether an array binds as a list of its keys.
    #[must_use]
    pub const fn needs_keys(self) -> bool {
        matches!(self, Self::Keys | Self::KeysUnquoted)
    }

    /// Whether an array binds as a list of its values as identifiers.
    #[must_use]
    pub const fn needs_values(self) -> bool {
        matches!(self, Self::Values | Self::ValuesUnquoted)
    }

    /// Whether this type only makes sense with an array value.
    #[must_use]
    pub const fn needs_array(self) -> bool {
        self.needs_map() || self.needs_list() || self.needs_keys() || self.needs_values()
    }

    /// Positive natural number family.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Numeric | Self::NumericStrict | Self::NumericNullable | Self::NumericStrictNullable
        )
    }

    /// Non-negative integer family.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::Unsigned
                | Self::UnsignedStrict
                | Self::UnsignedNullable
                | Self::UnsignedStrictNullable
        )
    }

    /// Whether the marker started with `?`.
    #[must_use]
    pub const fn is_nullable(self) -> bool {
        matches!(self.code().as_bytes()[0], b'?')
    }

    /// Quote style for identifier rendering, `None` where identifiers make no sense.
    #[must_use]
    pub const fn quote_style(self) -> Option<QuoteStyle> {
        match self {
            Self::Quantifier | Self::Map | Self::MapNullable | Self::Keys | Self::Values => {
                Some(QuoteStyle::Quoted)
            }
            Self::QuantifierUnquoted
            | Self::MapUnquoted
            | Self::MapUnquotedNullable
            | Self::KeysUnquoted
            | Self::ValuesUnquoted => Some(QuoteStyle::Unquoted),
            _ => None,
        }
    }
}

impl fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a marker code names no placeholder type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown placeholder type code '{0}'")]
pub struct UnknownTypeCode(pub alloc::string::String);

impl FromStr for PlaceholderType {
    type Err = UnknownTypeCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownTypeCode(s.into()))
    }
}
