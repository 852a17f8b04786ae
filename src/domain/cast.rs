// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type casting helpers used by typed validators.
//!
//! Loaders mostly produce strings, so a typed validator has to turn `"8"` into `8` and
//! `"no"` into `false`. [`cast_value`] holds those rules in one place.

use crate::domain::config_value::{ConfigValue, ValueType};
use crate::domain::errors::{ConfigError, Rejection, Result};

/// Strings accepted as `false` when casting to a boolean (compared lowercase).
const FALSE_WORDS: &[&str] = &["0", "no", "n", "false"];

/// Strings accepted as `true` when casting to a boolean (compared lowercase).
const TRUE_WORDS: &[&str] = &["1", "yes", "y", "true"];

/// Casts `value` into `expected`, on behalf of `key`.
///
/// The rules, in order:
///
/// 1. A value that already has the expected type is returned unchanged.
/// 2. `Integer` accepts integer strings (surrounding whitespace ignored), floats with no
///    fractional part, and booleans.
/// 3. `NonEmptyString` takes the string form of any scalar and refuses `""`.
/// 4. `Bool` accepts `0, 1, yes, no, y, n, true, false` in any case, and the integers
///    `0` and `1`. `0, no, n, false` map to `false`.
/// 5. Everything else goes through a generic conversion: `Float` from integers and
///    number strings, `String` from any scalar, `List` wraps a scalar. Nothing converts
///    into `Map` or `Null`.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationRejected`] with a [`Rejection::Cast`] cause.
///
/// # Examples
///
/// ```
/// use treecfg::domain::{cast_value, ConfigValue, ValueType};
///
/// let n = cast_value("count", ConfigValue::from("8"), ValueType::Integer).unwrap();
/// assert_eq!(n, ConfigValue::Integer(8));
///
/// let b = cast_value("flag", ConfigValue::from("No"), ValueType::Bool).unwrap();
/// assert_eq!(b, ConfigValue::Bool(false));
///
/// assert!(cast_value("flag", ConfigValue::from("maybe"), ValueType::Bool).is_err());
/// ```
pub fn cast_value(key: &str, value: ConfigValue, expected: ValueType) -> Result<ConfigValue> {
    if value.is_type(expected) {
        return Ok(value);
    }

    let converted = match expected {
        ValueType::Integer => to_integer(&value),
        ValueType::NonEmptyString => to_non_empty_string(&value),
        ValueType::Bool => to_bool(&value),
        ValueType::Float => to_float(&value),
        ValueType::String => scalar_string(&value).map(ConfigValue::String),
        ValueType::List => match value.value_type() {
            found @ (ValueType::Null | ValueType::Map) => {
                Err(format!("a {} cannot become a list", found))
            }
            _ => return Ok(ConfigValue::List(vec![value])),
        },
        ValueType::Map | ValueType::Null => Err(format!(
            "no conversion from {} to {}",
            value.value_type(),
            expected
        )),
    };

    converted.map_err(|reason| {
        tracing::trace!(key, %value, %expected, "cast failed: {}", reason);
        ConfigError::rejected(
            key,
            &value,
            Rejection::Cast {
                expected: expected.name().to_string(),
                reason,
            },
        )
    })
}

fn to_integer(value: &ConfigValue) -> std::result::Result<ConfigValue, String> {
    match value {
        ConfigValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|e| e.to_string()),
        ConfigValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
            if *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Ok(ConfigValue::Integer(*f as i64))
            } else {
                Err(format!("{} is out of range", f))
            }
        }
        ConfigValue::Float(f) => Err(format!("{} has a fractional part", f)),
        ConfigValue::Bool(b) => Ok(ConfigValue::Integer(i64::from(*b))),
        other => Err(format!("a {} is not numeric", other.value_type())),
    }
}

fn to_non_empty_string(value: &ConfigValue) -> std::result::Result<ConfigValue, String> {
    let s = scalar_string(value)?;
    if s.is_empty() {
        return Err("empty string".to_string());
    }
    Ok(ConfigValue::String(s))
}

fn to_bool(value: &ConfigValue) -> std::result::Result<ConfigValue, String> {
    match value {
        ConfigValue::String(s) => {
            let word = s.to_lowercase();
            if FALSE_WORDS.contains(&word.as_str()) {
                Ok(ConfigValue::Bool(false))
            } else if TRUE_WORDS.contains(&word.as_str()) {
                Ok(ConfigValue::Bool(true))
            } else {
                Err(format!("'{}' is not a recognised boolean", s))
            }
        }
        ConfigValue::Integer(0) => Ok(ConfigValue::Bool(false)),
        ConfigValue::Integer(1) => Ok(ConfigValue::Bool(true)),
        other => Err(format!("{} is not a recognised boolean", other)),
    }
}

fn to_float(value: &ConfigValue) -> std::result::Result<ConfigValue, String> {
    match value {
        ConfigValue::Integer(n) => Ok(ConfigValue::Float(*n as f64)),
        ConfigValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|e| e.to_string()),
        other => Err(format!("a {} is not numeric", other.value_type())),
    }
}

fn scalar_string(value: &ConfigValue) -> std::result::Result<String, String> {
    match value {
        ConfigValue::Null | ConfigValue::List(_) | ConfigValue::Map(_) => {
            Err(format!("a {} has no string form", value.value_type()))
        }
        scalar => Ok(scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(value: impl Into<ConfigValue>, expected: ValueType) -> Result<ConfigValue> {
        cast_value("test.key", value.into(), expected)
    }

    fn assert_cast_rejected(result: Result<ConfigValue>) {
        match result {
            Err(ConfigError::ValidationRejected {
                cause: Rejection::Cast { .. },
                ..
            }) => {}
            other => panic!("expected a cast rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_same_type_is_unchanged() {
        assert_eq!(cast(5, ValueType::Integer).unwrap(), ConfigValue::Integer(5));
        assert_eq!(cast("x", ValueType::String).unwrap(), ConfigValue::from("x"));
        assert_eq!(cast(true, ValueType::Bool).unwrap(), ConfigValue::Bool(true));
    }

    #[test]
    fn test_integer_from_strings() {
        assert_eq!(cast("8", ValueType::Integer).unwrap(), ConfigValue::Integer(8));
        assert_eq!(cast("-42", ValueType::Integer).unwrap(), ConfigValue::Integer(-42));
        assert_eq!(cast(" 7 ", ValueType::Integer).unwrap(), ConfigValue::Integer(7));
        assert_cast_rejected(cast("eight", ValueType::Integer));
        assert_cast_rejected(cast("3.14", ValueType::Integer));
        assert_cast_rejected(cast("", ValueType::Integer));
    }

    #[test]
    fn test_integer_from_other_scalars() {
        assert_eq!(cast(3.0, ValueType::Integer).unwrap(), ConfigValue::Integer(3));
        assert_eq!(cast(true, ValueType::Integer).unwrap(), ConfigValue::Integer(1));
        assert_cast_rejected(cast(3.5, ValueType::Integer));
        assert_cast_rejected(cast(f64::NAN, ValueType::Integer));
        assert_cast_rejected(cast(ConfigValue::Null, ValueType::Integer));
    }

    #[test]
    fn test_non_empty_string() {
        assert_eq!(
            cast(0, ValueType::NonEmptyString).unwrap(),
            ConfigValue::from("0")
        );
        assert_eq!(
            cast("abc", ValueType::NonEmptyString).unwrap(),
            ConfigValue::from("abc")
        );
        assert_cast_rejected(cast("", ValueType::NonEmptyString));
        assert_cast_rejected(cast(vec![1], ValueType::NonEmptyString));
    }

    #[test]
    fn test_bool_words() {
        for word in ["0", "no", "N", "False", "NO"] {
            assert_eq!(
                cast(word, ValueType::Bool).unwrap(),
                ConfigValue::Bool(false),
                "word {:?}",
                word
            );
        }
        for word in ["1", "yes", "Y", "TRUE", "Yes"] {
            assert_eq!(
                cast(word, ValueType::Bool).unwrap(),
                ConfigValue::Bool(true),
                "word {:?}",
                word
            );
        }
    }

    #[test]
    fn test_bool_rejects_unknown_words() {
        for word in ["maybe", "on", "off", "2", "", " yes", "no "] {
            assert_cast_rejected(cast(word, ValueType::Bool));
        }
        assert_cast_rejected(cast(2, ValueType::Bool));
        assert_eq!(cast(0, ValueType::Bool).unwrap(), ConfigValue::Bool(false));
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(cast(2, ValueType::Float).unwrap(), ConfigValue::Float(2.0));
        assert_eq!(cast("1.5", ValueType::Float).unwrap(), ConfigValue::Float(1.5));
        assert_cast_rejected(cast("abc", ValueType::Float));
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(cast(1, ValueType::String).unwrap(), ConfigValue::from("1"));
        assert_eq!(cast(false, ValueType::String).unwrap(), ConfigValue::from("false"));
        assert_cast_rejected(cast(ConfigValue::Null, ValueType::String));
    }

    #[test]
    fn test_list_and_map_conversion() {
        assert_eq!(
            cast("a", ValueType::List).unwrap(),
            ConfigValue::List(vec![ConfigValue::from("a")])
        );
        assert_cast_rejected(cast("a", ValueType::Map));
        assert_cast_rejected(cast(1, ValueType::Null));
    }

    #[test]
    fn test_rejection_carries_key_and_value() {
        match cast_value("count", ConfigValue::from("x"), ValueType::Integer) {
            Err(ConfigError::ValidationRejected { key, value, .. }) => {
                assert_eq!(key, "count");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
