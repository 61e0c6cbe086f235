pub mod engine;
pub mod findings;
pub mod http;
pub mod report;
pub mod services;

pub use crate::domain::model::{CheckResult, CredentialEntry, Outcome, Service};
pub use crate::domain::ports::CredentialChecker;
pub use crate::utils::error::Result;
