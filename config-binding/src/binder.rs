//! Binding of raw property maps onto configuration records.
//!
//! Binding never stops at the first problem. Every input key is resolved,
//! parsed and validated; all errors come back together, ordered by the
//! position of the offending key in the input, with cross-field errors last.

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;
use tracing::warn;

use crate::error::BindingError;
use crate::error::BindingErrors;
use crate::error::ValidationError;
use crate::registry::Registry;
use crate::source::RawProperties;

/// Binds raw property maps against one [`Registry`].
#[derive(Debug)]
pub struct Binder<'a, C> {
    registry: &'a Registry<C>,
}

/// A key that resolved to a field and parsed.
struct Staged<'k> {
    position: usize,
    field: usize,
    key: &'k str,
}

impl<'a, C: Default + 'static> Binder<'a, C> {
    pub fn new(registry: &'a Registry<C>) -> Self {
        Self { registry }
    }

    /// Builds a record from `defaults()` overridden by `raw`.
    ///
    /// Fields with no input key keep their defaults. On error no record is
    /// returned.
    pub fn bind(&self, raw: &RawProperties) -> Result<C, BindingErrors> {
        let mut target = self.registry.defaults();

        // One slot per input position so errors come back in input order.
        let mut slots: Vec<Vec<BindingError>> = vec![Vec::new(); raw.len()];
        let mut claimed: HashMap<usize, &str> = HashMap::new();
        let mut failed: HashSet<usize> = HashSet::new();
        let mut staged: Vec<Staged<'_>> = Vec::new();

        for (position, (key, value)) in raw.iter().enumerate() {
            if self.registry.is_defunct(key) {
                slots[position].push(BindingError::DefunctKey {
                    key: key.to_string(),
                });
                continue;
            }

            let Some(resolved) = self.registry.lookup(key) else {
                slots[position].push(BindingError::UnknownKey {
                    key: key.to_string(),
                });
                continue;
            };

            if let Some(first) = claimed.get(&resolved.index) {
                slots[position].push(BindingError::ConflictingAlias {
                    key: key.to_string(),
                    conflicting_key: (*first).to_string(),
                    canonical_key: resolved.canonical_key(),
                });
                failed.insert(resolved.index);
                continue;
            }
            claimed.insert(resolved.index, key);

            if resolved.is_alias() {
                warn!(
                    "Configuration property '{}' is deprecated. Use '{}' instead.",
                    key,
                    resolved.canonical_key()
                );
            }

            match resolved.binding.apply(&mut target, key, value) {
                Ok(()) => staged.push(Staged {
                    position,
                    field: resolved.index,
                    key,
                }),
                Err(err) => {
                    slots[position].push(err.into());
                    failed.insert(resolved.index);
                }
            }
        }

        for entry in &staged {
            if failed.contains(&entry.field) {
                continue;
            }
            let Some(binding) = self.registry.binding(entry.field) else {
                continue;
            };
            for message in binding.validate(&target) {
                slots[entry.position].push(
                    ValidationError {
                        keys: vec![entry.key.to_string()],
                        message,
                    }
                    .into(),
                );
            }
        }

        let mut errors: Vec<BindingError> = slots.into_iter().flatten().collect();

        for check in self.registry.checks() {
            let involves_failed = check.keys.iter().any(|key| {
                self.registry
                    .lookup(key)
                    .is_some_and(|resolved| failed.contains(&resolved.index))
            });
            if involves_failed {
                debug!(
                    "Skipping cross-field check on {:?}: an input it reads was rejected",
                    check.keys
                );
                continue;
            }
            if let Err(message) = check.evaluate(&target) {
                errors.push(
                    ValidationError {
                        keys: check.keys.iter().map(|k| (*k).to_string()).collect(),
                        message,
                    }
                    .into(),
                );
            }
        }

        if !errors.is_empty() {
            debug!("Configuration binding failed with {} errors", errors.len());
            return Err(BindingErrors::new(errors));
        }

        debug!(
            "Bound {} of {} configuration properties from input",
            staged.len(),
            self.registry.len()
        );
        Ok(target)
    }
}

impl<C: 'static> Registry<C> {
    pub fn binder(&self) -> Binder<'_, C> {
        Binder { registry: self }
    }
}
