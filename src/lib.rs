pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::toml_config::BatchConfig;
pub use crate::core::engine::CheckEngine;
pub use crate::core::http::{Endpoints, HttpSettings};
pub use crate::domain::model::{CheckResult, CredentialEntry, Outcome, Service};
pub use crate::utils::error::{CredCheckError, Result};
