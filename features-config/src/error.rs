use qe_config_binding::BindingErrors;
use qe_config_binding::DuplicateKeyError;
use qe_config_binding::SourceError;
use thiserror::Error;

/// Errors that can occur while loading the feature configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The property table itself is broken
    #[error("Invalid property table: {0}")]
    Registry(#[from] DuplicateKeyError),

    #[error(transparent)]
    Binding(#[from] BindingErrors),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Type alias for Results using ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;
