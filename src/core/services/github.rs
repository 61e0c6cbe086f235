use crate::core::http::{check_json, join_url, string_field};
use crate::domain::model::{CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;
use crate::utils::validation::validate_secret;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;

/// `GET /user`，token 標頭
pub struct GithubChecker {
    client: Client,
    base_url: String,
}

impl GithubChecker {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CredentialChecker for GithubChecker {
    fn service(&self) -> Service {
        Service::Github
    }

    fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        validate_secret(Service::Github, "secret", entry.secret())
    }

    fn describe(&self, _entry: &CredentialEntry) -> String {
        format!("GET {} (Authorization: token ***)", join_url(&self.base_url, "/user"))
    }

    async fn check(&self, entry: &CredentialEntry) -> CheckResult {
        let request = self
            .client
            .get(join_url(&self.base_url, "/user"))
            .header(AUTHORIZATION, format!("token {}", entry.secret()))
            .header(ACCEPT, "application/vnd.github+json");

        check_json(Service::Github, request, |body| string_field(body, "login")).await
    }
}
