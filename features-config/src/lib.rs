//! Optimizer and execution feature configuration.
//!
//! [`FeaturesConfig`] is a flat record of feature flags and tuning knobs
//! bound from `key=value` properties such as
//!
//! ```text
//! join-distribution-type=BROADCAST
//! spiller-spill-path=/mnt/spill1,/mnt/spill2
//! exchange.data-integrity-verification=RETRY
//! ```
//!
//! Every property has a default; unknown, defunct and malformed properties
//! are rejected when the configuration is loaded.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod error;
pub mod features;
pub mod properties;

use std::path::Path;

use qe_config_binding::RawProperties;
use qe_config_binding::Registry;
use tracing::debug;

pub use error::ConfigError;
pub use error::Result;
pub use features::DataIntegrityVerification;
pub use features::FeaturesConfig;
pub use features::JoinDistributionType;
pub use features::JoinReorderingStrategy;
pub use features::RegexLibrary;

impl FeaturesConfig {
    /// Property registry of this record.
    pub fn registry() -> Result<Registry<FeaturesConfig>> {
        properties::registry().map_err(ConfigError::from)
    }

    /// Binds `raw` on top of the defaults.
    pub fn from_properties(raw: &RawProperties) -> Result<Self> {
        let registry = Self::registry()?;
        let config = registry.binder().bind(raw)?;
        Ok(config)
    }

    /// Reads a properties file and binds it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = RawProperties::load(path)?;
        let config = Self::from_properties(&raw)?;
        debug!("Loaded feature configuration from {}", path.display());
        Ok(config)
    }

    /// Every property under its canonical key, rendered as it would be
    /// written in a properties file.
    pub fn to_properties(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(Self::registry()?.render(self))
    }
}
