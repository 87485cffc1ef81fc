//! Declarative property binding.
//!
//! Translates a flat map of string properties (`join-distribution-type=BROADCAST`)
//! into a strongly typed configuration record. Each field of the record is
//! described once by a [`Property`]: canonical key, deprecated aliases,
//! default, parser and validators. A [`Registry`] collects the properties of
//! one record type and a [`Binder`] applies raw input to it, reporting every
//! problem in one pass.
//!
//! [`testing`] holds the assertions a record's own test suite runs against
//! its registry (default drift, full coverage, alias equivalence).

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod binder;
pub mod error;
pub mod property;
pub mod registry;
pub mod source;
pub mod testing;
pub mod units;
pub mod value;

#[cfg(test)]
mod testonly;

pub use binder::Binder;
pub use error::BindingError;
pub use error::BindingErrors;
pub use error::DuplicateKeyError;
pub use error::ParseError;
pub use error::SourceError;
pub use error::ValidationError;
pub use property::Binding;
pub use property::FieldInfo;
pub use property::Property;
pub use registry::KeyRole;
pub use registry::PropertyDescription;
pub use registry::Registry;
pub use source::RawProperties;
pub use units::DataSize;
pub use units::DataUnit;
pub use units::Duration;
pub use units::TimeUnit;
pub use value::PropertyValue;
pub use value::ValueKind;

// Used by `enum_property!` expansions in downstream crates.
#[doc(hidden)]
pub use strum;
