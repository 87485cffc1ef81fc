//! Field descriptor registry.
//!
//! Owns every [`Binding`] of one configuration type, indexes their canonical
//! and alias keys, remembers defunct keys and holds the cross-field checks.
//! The registry is built once, before any binding happens, and is read-only
//! afterwards.
//!
//! # Example
//!
//! ```
//! use qe_config_binding::{Property, Registry};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Spill {
//!     threads: i32,
//! }
//!
//! let mut registry: Registry<Spill> = Registry::new();
//! registry
//!     .register(
//!         Property::<Spill, _>::new("spiller-threads", 4, |c| &c.threads, |c| &mut c.threads)
//!             .alias("experimental.spiller-threads"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(registry.defaults().threads, 4);
//! assert!(registry.lookup("experimental.spiller-threads").unwrap().is_alias());
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::DuplicateKeyError;
use crate::property::{Binding, FieldInfo};
use crate::value::ValueKind;

/// How a key relates to the descriptor that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Canonical,
    Alias,
}

#[derive(Debug, Clone, Copy)]
enum Owner {
    Field { index: usize, role: KeyRole },
    Defunct,
}

/// Result of a successful [`Registry::lookup`].
pub struct Resolved<'a, C> {
    /// Position of the descriptor in registration order
    pub index: usize,
    pub role: KeyRole,
    pub binding: &'a dyn Binding<C>,
}

impl<C> Resolved<'_, C> {
    pub fn is_alias(&self) -> bool {
        self.role == KeyRole::Alias
    }

    pub fn canonical_key(&self) -> &'static str {
        self.binding.info().key
    }
}

type CrossCheckFn<C> = Box<dyn Fn(&C) -> Result<(), String> + Send + Sync>;

/// A validator over the whole record, e.g. "target must not exceed threshold".
pub struct CrossFieldCheck<C> {
    /// Canonical keys of the fields the check reads
    pub keys: Vec<&'static str>,
    check: CrossCheckFn<C>,
}

impl<C> CrossFieldCheck<C> {
    pub fn evaluate(&self, target: &C) -> Result<(), String> {
        (self.check)(target)
    }
}

/// Human-readable summary of one property, as printed by `describe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescription {
    pub key: &'static str,
    pub aliases: Vec<&'static str>,
    pub kind: ValueKind,
    pub default: String,
    pub description: &'static str,
}

/// Registry of every property of configuration type `C`.
pub struct Registry<C> {
    bindings: Vec<Box<dyn Binding<C>>>,
    index: HashMap<&'static str, Owner>,
    defunct: Vec<&'static str>,
    checks: Vec<CrossFieldCheck<C>>,
}

impl<C: 'static> Registry<C> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            index: HashMap::new(),
            defunct: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Builds a registry from a descriptor table, stopping at the first
    /// duplicate key.
    pub fn from_bindings<I>(bindings: I) -> Result<Self, DuplicateKeyError>
    where
        I: IntoIterator<Item = Box<dyn Binding<C>>>,
    {
        let mut registry = Self::new();
        for binding in bindings {
            registry.register_boxed(binding)?;
        }
        Ok(registry)
    }

    /// Adds a descriptor. Fails if its canonical key or any alias is
    /// already claimed, by another descriptor, by a defunct entry, or by
    /// the descriptor itself.
    pub fn register<B>(&mut self, binding: B) -> Result<&mut Self, DuplicateKeyError>
    where
        B: Binding<C> + 'static,
    {
        self.register_boxed(Box::new(binding))
    }

    pub fn register_boxed(
        &mut self,
        binding: Box<dyn Binding<C>>,
    ) -> Result<&mut Self, DuplicateKeyError> {
        let info = binding.info();
        let index = self.bindings.len();

        let mut seen: Vec<&'static str> = Vec::with_capacity(1 + info.aliases.len());
        for key in info.keys() {
            if let Some(owner) = self.index.get(key) {
                return Err(DuplicateKeyError {
                    key,
                    existing: self.owner_name(*owner, key),
                    rejected: info.key,
                });
            }
            if seen.contains(&key) {
                return Err(DuplicateKeyError {
                    key,
                    existing: info.key,
                    rejected: info.key,
                });
            }
            seen.push(key);
        }

        for key in info.keys() {
            let role = if key == info.key {
                KeyRole::Canonical
            } else {
                KeyRole::Alias
            };
            self.index.insert(key, Owner::Field { index, role });
        }
        self.bindings.push(binding);
        Ok(self)
    }

    /// Marks `key` as a retired property: supplying it is an error rather
    /// than an unknown key.
    pub fn register_defunct(&mut self, key: &'static str) -> Result<&mut Self, DuplicateKeyError> {
        if let Some(owner) = self.index.get(key) {
            return Err(DuplicateKeyError {
                key,
                existing: self.owner_name(*owner, key),
                rejected: key,
            });
        }
        self.index.insert(key, Owner::Defunct);
        self.defunct.push(key);
        Ok(self)
    }

    /// Adds a validator over the whole record. `keys` names the fields it
    /// reads (canonical keys) and is used in diagnostics.
    pub fn register_check<F>(&mut self, keys: &[&'static str], check: F) -> &mut Self
    where
        F: Fn(&C) -> Result<(), String> + Send + Sync + 'static,
    {
        self.checks.push(CrossFieldCheck {
            keys: keys.to_vec(),
            check: Box::new(check),
        });
        self
    }

    fn owner_name(&self, owner: Owner, key: &'static str) -> &'static str {
        match owner {
            Owner::Field { index, .. } => self.bindings[index].info().key,
            Owner::Defunct => key,
        }
    }

    /// Resolves a canonical or alias key to its descriptor.
    pub fn lookup(&self, key: &str) -> Option<Resolved<'_, C>> {
        match self.index.get(key)? {
            Owner::Field { index, role } => Some(Resolved {
                index: *index,
                role: *role,
                binding: self.bindings[*index].as_ref(),
            }),
            Owner::Defunct => None,
        }
    }

    pub fn is_defunct(&self, key: &str) -> bool {
        matches!(self.index.get(key), Some(Owner::Defunct))
    }

    pub fn bindings(&self) -> impl Iterator<Item = &dyn Binding<C>> + '_ {
        self.bindings.iter().map(AsRef::as_ref)
    }

    pub fn binding(&self, index: usize) -> Option<&dyn Binding<C>> {
        self.bindings.get(index).map(AsRef::as_ref)
    }

    pub fn checks(&self) -> &[CrossFieldCheck<C>] {
        &self.checks
    }

    pub fn defunct_keys(&self) -> &[&'static str] {
        &self.defunct
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Canonical key → rendered value of every descriptor, in registration
    /// order. The inverse of binding.
    pub fn render(&self, target: &C) -> Vec<(&'static str, String)> {
        self.bindings
            .iter()
            .map(|binding| (binding.info().key, binding.render(target)))
            .collect()
    }

    pub fn describe(&self) -> Vec<PropertyDescription> {
        self.bindings
            .iter()
            .map(|binding| {
                let FieldInfo {
                    key,
                    aliases,
                    description,
                    kind,
                } = binding.info().clone();
                PropertyDescription {
                    key,
                    aliases,
                    kind,
                    default: binding.render_default(),
                    description,
                }
            })
            .collect()
    }
}

impl<C: Default + 'static> Registry<C> {
    /// A record holding every descriptor's declared default.
    ///
    /// Pure: no input, no shared state, equal results on every call.
    pub fn defaults(&self) -> C {
        let mut target = C::default();
        for binding in &self.bindings {
            binding.apply_default(&mut target);
        }
        target
    }
}

impl<C: 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "keys",
                &self
                    .bindings
                    .iter()
                    .map(|b| b.info().key)
                    .collect::<Vec<_>>(),
            )
            .field("defunct", &self.defunct)
            .field("checks", &self.checks.len())
            .finish()
    }
}
