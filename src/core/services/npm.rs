use crate::core::http::{check_json, join_url, string_field};
use crate::domain::model::{CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;
use crate::utils::validation::validate_secret;
use async_trait::async_trait;
use reqwest::Client;

pub struct NpmChecker {
    client: Client,
    base_url: String,
}

impl NpmChecker {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CredentialChecker for NpmChecker {
    fn service(&self) -> Service {
        Service::Npm
    }

    fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        validate_secret(Service::Npm, "secret", entry.secret())
    }

    fn describe(&self, _entry: &CredentialEntry) -> String {
        format!("GET {} (bearer ***)", join_url(&self.base_url, "/-/whoami"))
    }

    async fn check(&self, entry: &CredentialEntry) -> CheckResult {
        let request = self
            .client
            .get(join_url(&self.base_url, "/-/whoami"))
            .bearer_auth(entry.secret());

        check_json(Service::Npm, request, |body| string_field(body, "username")).await
    }
}
