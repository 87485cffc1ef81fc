//! Field descriptors.
//!
//! A [`Property`] ties one canonical key (plus deprecated aliases) to one
//! typed field of a configuration record through a pair of accessor function
//! pointers. The registry stores properties behind the object-safe
//! [`Binding`] trait so that fields of different types live in one table.

use std::fmt;

use crate::error::ParseError;
use crate::value::{PropertyValue, ValueKind};

/// Untyped description of a property, shared by every [`Binding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Current, preferred property name
    pub key: &'static str,
    /// Legacy names that still resolve to this field
    pub aliases: Vec<&'static str>,
    pub description: &'static str,
    pub kind: ValueKind,
}

impl FieldInfo {
    /// Canonical key followed by every alias.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.key).chain(self.aliases.iter().copied())
    }
}

/// Object-safe view of a [`Property`] over configuration type `C`.
pub trait Binding<C>: Send + Sync {
    fn info(&self) -> &FieldInfo;

    /// Writes the declared default into `target`.
    fn apply_default(&self, target: &mut C);

    /// Parses `raw` and stores it in `target`. `key` is the key used in the
    /// input, for diagnostics.
    fn apply(&self, target: &mut C, key: &str, raw: &str) -> Result<(), ParseError>;

    /// Runs field-level validators against the value held by `target`.
    /// Returns one message per failing validator, in declaration order.
    fn validate(&self, target: &C) -> Vec<String>;

    fn render(&self, target: &C) -> String;

    fn render_default(&self) -> String;

    fn is_default(&self, target: &C) -> bool;

    /// Whether both records hold the same value for this field.
    fn same(&self, left: &C, right: &C) -> bool;
}

type Check<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

/// A typed property: key, default, accessors and validators.
pub struct Property<C, V> {
    info: FieldInfo,
    default: V,
    get: fn(&C) -> &V,
    get_mut: fn(&mut C) -> &mut V,
    checks: Vec<Check<V>>,
}

impl<C, V: PropertyValue> Property<C, V> {
    pub fn new(
        key: &'static str,
        default: V,
        get: fn(&C) -> &V,
        get_mut: fn(&mut C) -> &mut V,
    ) -> Self {
        Self {
            info: FieldInfo {
                key,
                aliases: Vec::new(),
                description: "",
                kind: V::kind(),
            },
            default,
            get,
            get_mut,
            checks: Vec::new(),
        }
    }

    /// Adds a deprecated name that resolves to this field.
    pub fn alias(mut self, key: &'static str) -> Self {
        self.info.aliases.push(key);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.info.description = description;
        self
    }

    /// Adds a validator. It returns `Err(message)` when the value is invalid.
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&V) -> Result<(), String> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }
}

impl<C, V> Property<C, V>
where
    V: PropertyValue + PartialOrd + fmt::Display,
{
    /// Value must be greater than or equal to `min`.
    pub fn min(self, min: V) -> Self {
        self.check(move |value| {
            if *value >= min {
                Ok(())
            } else {
                Err(format!("must be greater than or equal to {min}"))
            }
        })
    }

    /// Value must be less than or equal to `max`.
    pub fn max(self, max: V) -> Self {
        self.check(move |value| {
            if *value <= max {
                Ok(())
            } else {
                Err(format!("must be less than or equal to {max}"))
            }
        })
    }

    /// Value must lie within `[min, max]`.
    pub fn range(self, min: V, max: V) -> Self {
        self.min(min).max(max)
    }
}

impl<C, V> Binding<C> for Property<C, V>
where
    C: 'static,
    V: PropertyValue,
{
    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn apply_default(&self, target: &mut C) {
        *(self.get_mut)(target) = self.default.clone();
    }

    fn apply(&self, target: &mut C, key: &str, raw: &str) -> Result<(), ParseError> {
        let value = V::parse_value(raw).map_err(|reason| ParseError {
            key: key.to_string(),
            value: raw.to_string(),
            expected: self.info.kind,
            reason,
        })?;
        *(self.get_mut)(target) = value;
        Ok(())
    }

    fn validate(&self, target: &C) -> Vec<String> {
        let value = (self.get)(target);
        self.checks
            .iter()
            .filter_map(|check| check(value).err())
            .collect()
    }

    fn render(&self, target: &C) -> String {
        (self.get)(target).render_value()
    }

    fn render_default(&self) -> String {
        self.default.render_value()
    }

    fn is_default(&self, target: &C) -> bool {
        *(self.get)(target) == self.default
    }

    fn same(&self, left: &C, right: &C) -> bool {
        (self.get)(left) == (self.get)(right)
    }
}

impl<C, V: fmt::Debug> fmt::Debug for Property<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("info", &self.info)
            .field("default", &self.default)
            .field("checks", &self.checks.len())
            .finish()
    }
}
