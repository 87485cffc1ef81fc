//! Value parsers.
//!
//! Every property type implements [`PropertyValue`]: a pure parse from the
//! raw string and the inverse rendering back to canonical text. Parse
//! failures return a human-readable reason; the binder wraps it into a
//! [`crate::ParseError`] with the key and raw value.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::units::{DataSize, Duration};

/// Declared semantic type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "values")]
pub enum ValueKind {
    Bool,
    Int,
    Double,
    /// Enumeration with its declared constant names
    Enum(&'static [&'static str]),
    DataSize,
    Duration,
    StringList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("boolean"),
            Self::Int => f.write_str("integer"),
            Self::Double => f.write_str("double"),
            Self::Enum(names) => write!(f, "one of [{}]", names.join(", ")),
            Self::DataSize => f.write_str("data size"),
            Self::Duration => f.write_str("duration"),
            Self::StringList => f.write_str("comma-separated list"),
        }
    }
}

/// A type that can be stored in a configuration field.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn kind() -> ValueKind;

    /// Parses the raw property text. The error is the reason only; key and
    /// value are attached by the caller.
    fn parse_value(raw: &str) -> Result<Self, String>;

    /// Canonical text for this value. Parsing the result yields an equal value.
    fn render_value(&self) -> String;
}

impl PropertyValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn parse_value(raw: &str) -> Result<Self, String> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("value must be 'true' or 'false'".to_string())
        }
    }

    fn render_value(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_property {
    ($($ty:ty),+) => {$(
        impl PropertyValue for $ty {
            fn kind() -> ValueKind {
                ValueKind::Int
            }

            fn parse_value(raw: &str) -> Result<Self, String> {
                raw.parse::<$ty>().map_err(|e| e.to_string())
            }

            fn render_value(&self) -> String {
                self.to_string()
            }
        }
    )+};
}

integer_property!(i32, i64);

impl PropertyValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Double
    }

    fn parse_value(raw: &str) -> Result<Self, String> {
        let value: f64 = raw.parse().map_err(|_| "not a number".to_string())?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err("value must be a finite number".to_string())
        }
    }

    fn render_value(&self) -> String {
        // Keep a decimal point on integral values so "0.0" stays "0.0".
        if self.fract() == 0.0 && self.abs() < 1e15 {
            format!("{self:.1}")
        } else {
            self.to_string()
        }
    }
}

impl PropertyValue for DataSize {
    fn kind() -> ValueKind {
        ValueKind::DataSize
    }

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse()
    }

    fn render_value(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for Duration {
    fn kind() -> ValueKind {
        ValueKind::Duration
    }

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse()
    }

    fn render_value(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for Vec<String> {
    fn kind() -> ValueKind {
        ValueKind::StringList
    }

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(split_list(raw))
    }

    fn render_value(&self) -> String {
        self.join(",")
    }
}

/// Splits on `,`, trims every element and drops empty ones.
///
/// An empty input yields an empty list, never `[""]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exact, case-sensitive lookup of an enumeration constant by name.
pub fn parse_enum<E>(raw: &str) -> Result<E, String>
where
    E: FromStr + strum::VariantNames,
{
    raw.parse::<E>().map_err(|_| {
        format!(
            "'{raw}' is not a valid constant (valid names: {})",
            E::VARIANTS.join(", ")
        )
    })
}

/// Implements [`PropertyValue`] for `strum` enumerations.
///
/// The type must derive `EnumString`, `IntoStaticStr` and `VariantNames`, and
/// be `Copy`.
#[macro_export]
macro_rules! enum_property {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::PropertyValue for $ty {
            fn kind() -> $crate::ValueKind {
                $crate::ValueKind::Enum(<$ty as $crate::strum::VariantNames>::VARIANTS)
            }

            fn parse_value(raw: &str) -> ::std::result::Result<Self, ::std::string::String> {
                $crate::value::parse_enum::<$ty>(raw)
            }

            fn render_value(&self) -> ::std::string::String {
                let name: &'static str = (*self).into();
                name.to_string()
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{DataUnit, TimeUnit};
    use pretty_assertions::assert_eq;

    #[derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        strum_macros::EnumString,
        strum_macros::IntoStaticStr,
        strum_macros::VariantNames,
    )]
    #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
    enum Verification {
        None,
        Abort,
        Retry,
    }

    crate::enum_property!(Verification);

    #[test]
    fn test_bool_is_case_insensitive() {
        assert_eq!(bool::parse_value("true"), Ok(true));
        assert_eq!(bool::parse_value("FALSE"), Ok(false));
        assert_eq!(bool::parse_value("True"), Ok(true));
    }

    #[test]
    fn test_bool_rejects_other_spellings() {
        for raw in ["yes", "1", "on", "", " true"] {
            assert!(bool::parse_value(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_integers() {
        assert_eq!(i32::parse_value("42"), Ok(42));
        assert_eq!(i32::parse_value("-1"), Ok(-1));
        assert!(i32::parse_value("2147483648").is_err());
        assert!(i32::parse_value("4.2").is_err());
        assert_eq!(i64::parse_value("2147483648"), Ok(2_147_483_648));
    }

    #[test]
    fn test_doubles() {
        assert_eq!(f64::parse_value("0.4"), Ok(0.4));
        assert_eq!(f64::parse_value("75"), Ok(75.0));
        assert!(f64::parse_value("NaN").is_err());
        assert!(f64::parse_value("inf").is_err());
        assert!(f64::parse_value("abc").is_err());
    }

    #[test]
    fn test_double_rendering_keeps_decimal_point() {
        assert_eq!(0.0_f64.render_value(), "0.0");
        assert_eq!(75.0_f64.render_value(), "75.0");
        assert_eq!(0.4_f64.render_value(), "0.4");
        assert_eq!(0.25_f64.render_value(), "0.25");
    }

    #[test]
    fn test_enum_exact_match() {
        assert_eq!(Verification::parse_value("RETRY"), Ok(Verification::Retry));
        assert_eq!(Verification::Abort.render_value(), "ABORT");
    }

    #[test]
    fn test_enum_error_lists_valid_names() {
        let err = Verification::parse_value("retry").expect_err("case-sensitive");
        assert_eq!(
            err,
            "'retry' is not a valid constant (valid names: NONE, ABORT, RETRY)"
        );
        assert_eq!(
            Verification::kind().to_string(),
            "one of [NONE, ABORT, RETRY]"
        );
    }

    #[test]
    fn test_string_list() {
        assert_eq!(
            Vec::<String>::parse_value("/tmp/a, /tmp/b"),
            Ok(vec!["/tmp/a".to_string(), "/tmp/b".to_string()])
        );
        assert_eq!(Vec::<String>::parse_value(""), Ok(Vec::new()));
        assert_eq!(Vec::<String>::parse_value(" , "), Ok(Vec::new()));
        assert_eq!(
            vec!["/tmp/a".to_string(), "/tmp/b".to_string()].render_value(),
            "/tmp/a,/tmp/b"
        );
    }

    #[test]
    fn test_units_as_property_values() {
        assert_eq!(
            DataSize::parse_value("100MB"),
            Ok(DataSize::of(100, DataUnit::Megabyte))
        );
        assert_eq!(
            Duration::parse_value("3m"),
            Ok(Duration::of(3, TimeUnit::Minutes))
        );
        assert_eq!(DataSize::kind(), ValueKind::DataSize);
        assert_eq!(Duration::kind(), ValueKind::Duration);
    }
}
