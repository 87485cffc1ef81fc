//! Small configuration type shared by the unit tests of this crate.

use crate::error::DuplicateKeyError;
use crate::property::Property;
use crate::registry::Registry;
use crate::units::{DataSize, DataUnit, Duration, TimeUnit};

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
pub(crate) enum Mode {
    Fast,
    Safe,
}

crate::enum_property!(Mode);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sample {
    pub threads: i32,
    pub ratio: f64,
    pub spill_enabled: bool,
    pub mode: Mode,
    pub spill_path: Vec<String>,
    pub max_size: DataSize,
    pub timeout: Duration,
    pub threshold: f64,
    pub target: f64,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            threads: 4,
            ratio: 0.5,
            spill_enabled: false,
            mode: Mode::Fast,
            spill_path: Vec::new(),
            max_size: DataSize::of(100, DataUnit::Megabyte),
            timeout: Duration::of(3, TimeUnit::Minutes),
            threshold: 0.9,
            target: 0.5,
        }
    }
}

pub(crate) fn sample_registry() -> Registry<Sample> {
    build_sample_registry().expect("sample registry is well-formed")
}

fn build_sample_registry() -> Result<Registry<Sample>, DuplicateKeyError> {
    let defaults = Sample::default();
    let mut registry: Registry<Sample> = Registry::new();
    registry.register(
        Property::<Sample, _>::new("threads", defaults.threads, |c| &c.threads, |c| &mut c.threads)
            .alias("experimental.threads")
            .alias("deprecated.threads")
            .description("Worker threads")
            .min(1),
    )?;
    registry.register(
        Property::<Sample, _>::new("ratio", defaults.ratio, |c| &c.ratio, |c| &mut c.ratio)
            .range(0.0, 1.0),
    )?;
    registry.register(
        Property::<Sample, _>::new(
            "spill-enabled",
            defaults.spill_enabled,
            |c| &c.spill_enabled,
            |c| &mut c.spill_enabled,
        )
        .alias("experimental.spill-enabled"),
    )?;
    registry.register(Property::<Sample, _>::new(
        "mode",
        defaults.mode,
        |c| &c.mode,
        |c| &mut c.mode,
    ))?;
    registry.register(
        Property::<Sample, _>::new(
            "spill-path",
            defaults.spill_path,
            |c| &c.spill_path,
            |c| &mut c.spill_path,
        )
        .alias("experimental.spill-path"),
    )?;
    registry.register(Property::<Sample, _>::new(
        "max-size",
        defaults.max_size,
        |c| &c.max_size,
        |c| &mut c.max_size,
    ))?;
    registry.register(
        Property::<Sample, _>::new("timeout", defaults.timeout, |c| &c.timeout, |c| &mut c.timeout)
            .min(Duration::of(1, TimeUnit::Milliseconds)),
    )?;
    registry.register(
        Property::<Sample, _>::new(
            "threshold",
            defaults.threshold,
            |c| &c.threshold,
            |c| &mut c.threshold,
        )
        .range(0.0, 1.0),
    )?;
    registry.register(
        Property::<Sample, _>::new("target", defaults.target, |c| &c.target, |c| &mut c.target)
            .range(0.0, 1.0),
    )?;
    registry.register_defunct("legacy-mode")?;

    registry.register_check(&["target", "threshold"], |c: &Sample| {
        if c.target <= c.threshold {
            Ok(())
        } else {
            Err("target must not exceed threshold".to_string())
        }
    });
    Ok(registry)
}
