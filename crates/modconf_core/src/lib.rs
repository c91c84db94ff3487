//! # modconf core
//!
//! A small, indexable byte array holding a firmware module's persistent
//! configuration.
//!
//! This crate provides:
//! - [`ModuleConfiguration`], the validated configuration store
//! - [`Initializer`] and [`Validator`] policy traits with ready-made strategies
//! - [`OperatorInterfaceClient`] and [`OperatorSession`] for interactive access
//! - Persistence to any [`modconf_storage::NvStorage`] medium

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod operator;
mod policy;
mod store;

pub use config::{StoreConfig, DEFAULT_INTERACTION_TIMEOUT};
pub use error::{CoreError, CoreResult};
pub use operator::{OperatorInterfaceClient, OperatorSession, SubmitOutcome};
pub use policy::{AcceptAll, Defaults, Initializer, RangeValidator, Validator};
pub use store::{ModuleConfiguration, OUT_OF_RANGE_BYTE};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
