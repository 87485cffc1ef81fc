//! Assertions that keep a descriptor table honest.
//!
//! Meant for the tests of crates that define a configuration record. Each
//! assertion collects every problem it finds and panics once with the full
//! list, so a single run shows all drift.
//!
//! ```
//! use qe_config_binding::{Property, RawProperties, Registry, testing};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Exchange {
//!     compression: bool,
//! }
//!
//! impl Default for Exchange {
//!     fn default() -> Self {
//!         Self { compression: false }
//!     }
//! }
//!
//! let mut registry: Registry<Exchange> = Registry::new();
//! registry
//!     .register(Property::<Exchange, _>::new(
//!         "exchange.compression-enabled",
//!         false,
//!         |c| &c.compression,
//!         |c| &mut c.compression,
//!     ))
//!     .unwrap();
//!
//! testing::assert_defaults_match(&registry, &Exchange::default());
//!
//! let sample: RawProperties = [("exchange.compression-enabled", "true")].into_iter().collect();
//! testing::assert_full_mapping(&registry, &sample, &Exchange { compression: true });
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::binder::Binder;
use crate::registry::Registry;
use crate::source::RawProperties;

/// Every field of `object` equals the registry's declared default.
///
/// `object` is normally `C::default()`, the construction path the rest of
/// the program uses, so this catches a default changed in one place only.
pub fn assert_defaults_match<C: Default + 'static>(registry: &Registry<C>, object: &C) {
    let recorded = registry.defaults();
    let problems: Vec<String> = registry
        .bindings()
        .filter(|binding| !binding.same(object, &recorded))
        .map(|binding| {
            format!(
                "'{}': object has {}, declared default is {}",
                binding.info().key,
                binding.render(object),
                binding.render_default()
            )
        })
        .collect();

    if !problems.is_empty() {
        panic!("{}", report("defaults do not match", &problems));
    }
}

/// `sample` covers every property exactly once (through canonical keys or
/// aliases), sets each to a non-default value, and binds to `expected`.
pub fn assert_full_mapping<C: Default + 'static>(
    registry: &Registry<C>,
    sample: &RawProperties,
    expected: &C,
) {
    let mut problems = Vec::new();
    let mut coverage: BTreeMap<usize, Vec<&str>> = BTreeMap::new();

    for (key, value) in sample.iter() {
        let Some(resolved) = registry.lookup(key) else {
            problems.push(format!("'{key}' is not a known property"));
            continue;
        };
        coverage.entry(resolved.index).or_default().push(key);

        let mut scratch = registry.defaults();
        match resolved.binding.apply(&mut scratch, key, value) {
            Ok(()) if resolved.binding.is_default(&scratch) => problems.push(format!(
                "'{key}' sample value '{value}' equals the default; pick a different value"
            )),
            Ok(()) => {}
            Err(err) => problems.push(err.to_string()),
        }
    }

    for (index, binding) in registry.bindings().enumerate() {
        match coverage.get(&index).map(Vec::as_slice) {
            None => problems.push(format!("'{}' is not covered", binding.info().key)),
            Some([_]) => {}
            Some(keys) => problems.push(format!(
                "'{}' is covered {} times ({})",
                binding.info().key,
                keys.len(),
                keys.join(", ")
            )),
        }
    }

    match Binder::new(registry).bind(sample) {
        Ok(bound) => {
            for binding in registry.bindings() {
                if !binding.same(&bound, expected) {
                    problems.push(format!(
                        "'{}': bound {}, expected {}",
                        binding.info().key,
                        binding.render(&bound),
                        binding.render(expected)
                    ));
                }
            }
        }
        Err(errors) => problems.extend(errors.iter().map(ToString::to_string)),
    }

    if !problems.is_empty() {
        panic!("{}", report("full mapping failed", &problems));
    }
}

/// Binding `legacy` (written with alias keys) yields the same record as
/// binding `current` (written with canonical keys).
pub fn assert_alias_equivalence<C: Default + 'static>(
    registry: &Registry<C>,
    current: &RawProperties,
    legacy: &RawProperties,
) {
    let mut problems = Vec::new();

    let mut uses_alias = false;
    for key in legacy.keys() {
        match registry.lookup(key) {
            Some(resolved) => uses_alias |= resolved.is_alias(),
            None => problems.push(format!("legacy map key '{key}' is not a known property")),
        }
    }
    if !uses_alias {
        problems.push("legacy map does not use any alias key".to_string());
    }

    let binder = Binder::new(registry);
    let bound_current = binder.bind(current);
    let bound_legacy = binder.bind(legacy);
    match (bound_current, bound_legacy) {
        (Ok(current), Ok(legacy)) => {
            for binding in registry.bindings() {
                if !binding.same(&current, &legacy) {
                    problems.push(format!(
                        "'{}': current map binds {}, legacy map binds {}",
                        binding.info().key,
                        binding.render(&current),
                        binding.render(&legacy)
                    ));
                }
            }
        }
        (current, legacy) => {
            if let Err(errors) = current {
                problems.extend(errors.iter().map(|e| format!("current map: {e}")));
            }
            if let Err(errors) = legacy {
                problems.extend(errors.iter().map(|e| format!("legacy map: {e}")));
            }
        }
    }

    if !problems.is_empty() {
        panic!("{}", report("alias equivalence failed", &problems));
    }
}

/// Binding `sample` and rendering the result reproduces every sample value
/// under its canonical key.
pub fn assert_round_trip<C: Default + 'static>(registry: &Registry<C>, sample: &RawProperties) {
    let bound = match Binder::new(registry).bind(sample) {
        Ok(bound) => bound,
        Err(errors) => panic!("round trip failed: sample does not bind\n{errors}"),
    };
    let rendered: BTreeMap<&str, String> = registry.render(&bound).into_iter().collect();

    let mut problems = Vec::new();
    for (key, value) in sample.iter() {
        let Some(resolved) = registry.lookup(key) else {
            continue;
        };
        let canonical = resolved.canonical_key();
        match rendered.get(canonical) {
            Some(text) if text == value => {}
            Some(text) => problems.push(format!("'{canonical}': sample '{value}', rendered '{text}'")),
            None => problems.push(format!("'{canonical}' missing from rendered output")),
        }
    }

    if !problems.is_empty() {
        panic!("{}", report("round trip failed", &problems));
    }
}

fn report(header: &str, problems: &[String]) -> String {
    let mut out = format!("{header} ({} problems):", problems.len());
    for problem in problems {
        let _ = write!(out, "\n  - {problem}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testonly::{Sample, sample_registry};

    fn full_sample() -> RawProperties {
        [
            ("experimental.threads", "16"),
            ("ratio", "0.25"),
            ("spill-enabled", "true"),
            ("mode", "SAFE"),
            ("spill-path", "/tmp/a,/tmp/b"),
            ("max-size", "2GB"),
            ("timeout", "10s"),
            ("threshold", "0.8"),
            ("target", "0.2"),
        ]
        .into_iter()
        .collect()
    }

    fn full_expected() -> Sample {
        let registry = sample_registry();
        let canonical: RawProperties = [
            ("threads", "16"),
            ("ratio", "0.25"),
            ("spill-enabled", "true"),
            ("mode", "SAFE"),
            ("spill-path", "/tmp/a,/tmp/b"),
            ("max-size", "2GB"),
            ("timeout", "10s"),
            ("threshold", "0.8"),
            ("target", "0.2"),
        ]
        .into_iter()
        .collect();
        registry.binder().bind(&canonical).expect("bind")
    }

    #[test]
    fn test_defaults_match_sample_default() {
        assert_defaults_match(&sample_registry(), &Sample::default());
    }

    #[test]
    #[should_panic(expected = "'threads': object has 5, declared default is 4")]
    fn test_defaults_drift_is_reported() {
        let drifted = Sample {
            threads: 5,
            ..Sample::default()
        };
        assert_defaults_match(&sample_registry(), &drifted);
    }

    #[test]
    fn test_full_mapping_accepts_complete_sample() {
        assert_full_mapping(&sample_registry(), &full_sample(), &full_expected());
    }

    #[test]
    #[should_panic(expected = "'timeout' is not covered")]
    fn test_full_mapping_detects_missing_property() {
        let sample: RawProperties = full_sample().iter().filter(|(k, _)| *k != "timeout").collect();
        assert_full_mapping(&sample_registry(), &sample, &full_expected());
    }

    #[test]
    #[should_panic(expected = "sample value '4' equals the default")]
    fn test_full_mapping_rejects_default_sample_value() {
        let mut sample = full_sample();
        sample.insert("experimental.threads", "4");
        assert_full_mapping(&sample_registry(), &sample, &full_expected());
    }

    #[test]
    #[should_panic(expected = "'threads' is covered 2 times")]
    fn test_full_mapping_detects_double_coverage() {
        let mut sample = full_sample();
        sample.insert("threads", "16");
        assert_full_mapping(&sample_registry(), &sample, &full_expected());
    }

    #[test]
    fn test_alias_equivalence() {
        let current: RawProperties = [("threads", "8"), ("spill-path", "/a")].into_iter().collect();
        let legacy: RawProperties = [("experimental.threads", "8"), ("experimental.spill-path", "/a")]
            .into_iter()
            .collect();
        assert_alias_equivalence(&sample_registry(), &current, &legacy);
    }

    #[test]
    #[should_panic(expected = "legacy map does not use any alias key")]
    fn test_alias_equivalence_requires_aliases() {
        let current: RawProperties = [("threads", "8")].into_iter().collect();
        assert_alias_equivalence(&sample_registry(), &current, &current);
    }

    #[test]
    fn test_round_trip() {
        assert_round_trip(&sample_registry(), &full_sample());
    }

    #[test]
    #[should_panic(expected = "'max-size': sample '2048 MB', rendered '2048MB'")]
    fn test_round_trip_reports_non_canonical_text() {
        // "2048 MB" renders without the space.
        let sample: RawProperties = [("max-size", "2048 MB")].into_iter().collect();
        assert_round_trip(&sample_registry(), &sample);
    }
}
