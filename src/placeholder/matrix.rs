//! The type matrix: one exhaustive dispatch per source kind.
//!
//! Each function maps a placeholder type and a scalar source value to the SQL
//! text to substitute, to `None` when the placeholder should count as unbound
//! (only [`PlaceholderType::Fake`] does this), or to a [`CoercionError`].

use alloc::format;
use alloc::string::{String, ToString};

use super::kind::{PlaceholderType as T, QuoteStyle};
use crate::config::Config;
use crate::errors::CoercionError;

/// Result of rendering one scalar.
pub(crate) type Rendered = Result<Option<String>, CoercionError>;

/// Renders a boolean source value.
pub(crate) fn render_boolean(kind: T, config: &Config, value: bool) -> Rendered {
    match kind {
        T::Sequence
        | T::Nullable
        | T::List
        | T::ListNullable
        | T::Boolean
        | T::BooleanStrict
        | T::BooleanNullable
        | T::BooleanStrictNullable
        | T::Map
        | T::MapNullable
        | T::MapUnquoted
        | T::MapUnquotedNullable => Ok(Some(config.boolean(value).into())),
        T::String | T::StringNullable => Ok(Some(if value { "'1'" } else { "'0'" }.into())),
        T::Integer | T::IntegerNullable | T::Double | T::DoubleNullable => {
            Ok(Some(i64::from(value).to_string()))
        }
        T::Unsigned | T::UnsignedNullable => unsigned(i64::from(value)).map(Some),
        T::Numeric | T::NumericNullable => natural(i64::from(value)).map(Some),
        T::Fake => Ok(value.then(String::new)),
        T::Blob => Ok(Some(if value { "1" } else { "" }.into())),
        T::Constant
        | T::ConstantNullable
        | T::StringStrict
        | T::StringStrictNullable
        | T::IntegerStrict
        | T::IntegerStrictNullable
        | T::UnsignedStrict
        | T::UnsignedStrictNullable
        | T::NumericStrict
        | T::NumericStrictNullable
        | T::DoubleStrict
        | T::DoubleStrictNullable => Err(CoercionError::InvalidType),
        T::Quantifier
        | T::QuantifierUnquoted
        | T::Keys
        | T::KeysUnquoted
        | T::Values
        | T::ValuesUnquoted => Err(CoercionError::InvalidContext),
    }
}

/// Renders an integer source value.
pub(crate) fn render_integer(kind: T, config: &Config, value: i64) -> Rendered {
    match kind {
        T::Sequence
        | T::Nullable
        | T::List
        | T::ListNullable
        | T::Map
        | T::MapNullable
        | T::MapUnquoted
        | T::MapUnquotedNullable
        | T::Integer
        | T::IntegerStrict
        | T::IntegerNullable
        | T::IntegerStrictNullable
        | T::Double
        | T::DoubleNullable
        | T::Blob => Ok(Some(value.to_string())),
        T::Unsigned | T::UnsignedStrict | T::UnsignedNullable | T::UnsignedStrictNullable => {
            unsigned(value).map(Some)
        }
        T::Numeric | T::NumericStrict | T::NumericNullable | T::NumericStrictNullable => {
            natural(value).map(Some)
        }
        T::String | T::StringNullable => Ok(Some(format!("'{value}'"))),
        T::Boolean | T::BooleanNullable => Ok(Some(config.boolean(value != 0).into())),
        T::Fake => Ok((value != 0).then(String::new)),
        T::Constant
        | T::ConstantNullable
        | T::StringStrict
        | T::StringStrictNullable
        | T::BooleanStrict
        | T::BooleanStrictNullable
        | T::DoubleStrict
        | T::DoubleStrictNullable => Err(CoercionError::InvalidType),
        T::Quantifier
        | T::QuantifierUnquoted
        | T::Keys
        | T::KeysUnquoted
        | T::Values
        | T::ValuesUnquoted => Err(CoercionError::InvalidContext),
    }
}

/// Renders a floating point source value.
pub(crate) fn render_double(kind: T, config: &Config, value: f64) -> Rendered {
    match kind {
        T::Sequence
        | T::Nullable
        | T::List
        | T::ListNullable
        | T::Map
        | T::MapNullable
        | T::MapUnquoted
        | T::MapUnquotedNullable
        | T::Double
        | T::DoubleStrict
        | T::DoubleNullable
        | T::DoubleStrictNullable
        | T::Blob => finite(value).map(|v| Some(v.to_string())),
        T::Integer | T::IntegerNullable => lossless(value).map(|v| Some(v.to_string())),
        T::Unsigned | T::UnsignedNullable => lossless(value).and_then(unsigned).map(Some),
        T::Numeric | T::NumericNullable => lossless(value).and_then(natural).map(Some),
        T::String | T::StringNullable => finite(value).map(|v| Some(format!("'{v}'"))),
        T::Boolean | T::BooleanNullable => Ok(Some(config.boolean(value != 0.0).into())),
        T::Fake => Ok((value != 0.0).then(String::new)),
        T::Constant
        | T::ConstantNullable
        | T::StringStrict
        | T::StringStrictNullable
        | T::IntegerStrict
        | T::IntegerStrictNullable
        | T::UnsignedStrict
        | T::UnsignedStrictNullable
        | T::NumericStrict
        | T::NumericStrictNullable
        | T::BooleanStrict
        | T::BooleanStrictNullable => Err(CoercionError::InvalidType),
        T::Quantifier
        | T::QuantifierUnquoted
        | T::Keys
        | T::KeysUnquoted
        | T::Values
        | T::ValuesUnquoted => Err(CoercionError::InvalidContext),
    }
}

/// Renders a text source value.
pub(crate) fn render_string(kind: T, config: &Config, value: &str) -> Rendered {
    match kind {
        T::String
        | T::StringStrict
        | T::StringNullable
        | T::StringStrictNullable
        | T::List
        | T::ListNullable
        | T::Map
        | T::MapNullable
        | T::MapUnquoted
        | T::MapUnquotedNullable
        | T::Sequence
        | T::Nullable => Ok(Some(format!("'{}'", config.escape(value)))),
        T::Integer | T::IntegerNullable => integer_string(value).map(|v| Some(v.to_string())),
        T::Unsigned | T::UnsignedNullable => integer_string(value).and_then(unsigned).map(Some),
        T::Numeric | T::NumericNullable => integer_string(value).and_then(natural).map(Some),
        T::Double | T::DoubleNullable => numeric_string(value).map(|v| Some(v.into())),
        T::Boolean | T::BooleanNullable => Ok(Some(config.boolean(truthy(value)).into())),
        T::Fake => Ok(truthy(value).then(String::new)),
        T::Quantifier | T::QuantifierUnquoted => identifier(kind, config, value).map(Some),
        T::Constant | T::ConstantNullable => constant(config, value).map(Some),
        T::Blob => Ok(Some(value.into())),
        T::IntegerStrict
        | T::IntegerStrictNullable
        | T::UnsignedStrict
        | T::UnsignedStrictNullable
        | T::NumericStrict
        | T::NumericStrictNullable
        | T::DoubleStrict
        | T::DoubleStrictNullable
        | T::BooleanStrict
        | T::BooleanStrictNullable => Err(CoercionError::InvalidType),
        T::Keys | T::KeysUnquoted | T::Values | T::ValuesUnquoted => {
            Err(CoercionError::InvalidContext)
        }
    }
}

/// Renders a NULL source value.
pub(crate) fn render_null(kind: T, config: &Config) -> Rendered {
    match kind {
        T::Sequence | T::String | T::List | T::Map | T::MapUnquoted => Ok(Some("''".into())),
        T::Integer | T::Unsigned | T::Double => Ok(Some("0".into())),
        T::Boolean => Ok(Some(config.boolean(false).into())),
        T::Fake => Ok(None),
        T::Nullable
        | T::ConstantNullable
        | T::StringNullable
        | T::StringStrictNullable
        | T::IntegerNullable
        | T::IntegerStrictNullable
        | T::UnsignedNullable
        | T::UnsignedStrictNullable
        | T::NumericNullable
        | T::NumericStrictNullable
        | T::DoubleNullable
        | T::DoubleStrictNullable
        | T::BooleanNullable
        | T::BooleanStrictNullable
        | T::ListNullable
        | T::MapNullable
        | T::MapUnquotedNullable => Ok(Some("NULL".into())),
        T::Constant
        | T::StringStrict
        | T::IntegerStrict
        | T::UnsignedStrict
        | T::Numeric
        | T::NumericStrict
        | T::DoubleStrict
        | T::BooleanStrict
        | T::Blob => Err(CoercionError::InvalidType),
        T::Quantifier
        | T::QuantifierUnquoted
        | T::Keys
        | T::KeysUnquoted
        | T::Values
        | T::ValuesUnquoted => Err(CoercionError::InvalidContext),
    }
}

/// Renders `value` as an identifier in the quote style of `kind`.
pub(crate) fn identifier(kind: T, config: &Config, value: &str) -> Result<String, CoercionError> {
    let Some(style) = kind.quote_style() else {
        return Err(CoercionError::InvalidContext);
    };
    if !config.is_quantifier(value) {
        return Err(CoercionError::InvalidIdentifier(value.into()));
    }
    Ok(match style {
        QuoteStyle::Quoted => config.quote_identifier(value),
        QuoteStyle::Unquoted => value.into(),
    })
}

/// A constant must match the constant pattern and survive escaping unchanged.
fn constant(config: &Config, value: &str) -> Result<String, CoercionError> {
    if config.is_constant(value) && config.escape(value) == value {
        Ok(value.into())
    } else {
        Err(CoercionError::InvalidCharacters(value.into()))
    }
}

fn unsigned(value: i64) -> Result<String, CoercionError> {
    if value < 0 {
        return Err(CoercionError::NegativeNumber(value.to_string()));
    }
    Ok(value.to_string())
}

fn natural(value: i64) -> Result<String, CoercionError> {
    if value <= 0 {
        return Err(CoercionError::NotNaturalNumber(value.to_string()));
    }
    Ok(value.to_string())
}

fn finite(value: f64) -> Result<f64, CoercionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoercionError::NotFinite(value))
    }
}

/// 2^63, the first double above the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Narrows a double to an integer only when the conversion is exact.
#[allow(clippy::cast_possible_truncation)]
fn lossless(value: f64) -> Result<i64, CoercionError> {
    let value = finite(value)?;
    if value % 1.0 != 0.0 || value < -I64_LIMIT || value >= I64_LIMIT {
        return Err(CoercionError::FloatDataLoss(value));
    }
    Ok(value as i64)
}

/// Validates a numeric string and returns it without surrounding whitespace.
fn numeric_string(value: &str) -> Result<&str, CoercionError> {
    let trimmed = value.trim();
    if is_numeric(trimmed) {
        Ok(trimmed)
    } else {
        Err(CoercionError::NotNumeric(value.into()))
    }
}

/// A numeric string that denotes an `i64` exactly.
///
/// The decimal digits are shifted by the exponent as text, so large values
/// never pass through `f64` rounding.
fn integer_string(value: &str) -> Result<i64, CoercionError> {
    let trimmed = numeric_string(value)?;
    let loss = || CoercionError::FloatDataLoss(trimmed.parse().unwrap_or(f64::NAN));

    let (mantissa, exponent) = trimmed.split_once(['e', 'E']).unwrap_or((trimmed, "0"));
    let (negative, mantissa) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let exponent: i64 = exponent.parse().unwrap_or(if exponent.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    });
    let scale = exponent.saturating_sub(i64::try_from(fraction.len()).map_err(|_| loss())?);

    let mut digits = String::with_capacity(whole.len() + fraction.len());
    digits.push_str(whole);
    digits.push_str(fraction);
    if scale < 0 {
        let cut = usize::try_from(scale.unsigned_abs())
            .map_or(digits.len(), |cut| cut.min(digits.len()));
        let keep = digits.len() - cut;
        if digits[keep..].bytes().any(|b| b != b'0') {
            return Err(loss());
        }
        digits.truncate(keep);
    } else if scale > 0 && digits.bytes().any(|b| b != b'0') {
        // Past 19 digits the value is out of range anyway.
        let zeros = usize::try_from(scale)
            .ok()
            .filter(|&zeros| zeros <= 19)
            .ok_or_else(loss)?;
        digits.extend(core::iter::repeat_n('0', zeros));
    }

    let magnitude = match digits.trim_start_matches('0') {
        "" => "0",
        magnitude => magnitude,
    };
    let signed = if negative {
        format!("-{magnitude}")
    } else {
        magnitude.into()
    };
    signed.parse().map_err(|_| loss())
}

/// Truthiness of text: empty and `"0"` are false.
fn truthy(value: &str) -> bool {
    !(value.is_empty() || value == "0")
}

/// Decimal number syntax: sign, digits with an optional fraction, optional exponent.
fn is_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        digits += pos - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            pos += 1;
        }
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == exp_start {
            return false;
        }
    }

    pos == bytes.len()
}
