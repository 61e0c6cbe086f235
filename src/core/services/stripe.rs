use crate::core::http::{check_json, join_url, string_field};
use crate::domain::model::{CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;
use crate::utils::validation::validate_secret;
use async_trait::async_trait;
use reqwest::Client;

pub struct StripeChecker {
    client: Client,
    base_url: String,
}

impl StripeChecker {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CredentialChecker for StripeChecker {
    fn service(&self) -> Service {
        Service::Stripe
    }

    fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        validate_secret(Service::Stripe, "secret", entry.secret())
    }

    fn describe(&self, _entry: &CredentialEntry) -> String {
        format!("GET {} (basic auth ***)", join_url(&self.base_url, "/v1/account"))
    }

    async fn check(&self, entry: &CredentialEntry) -> CheckResult {
        // secret key 作為 basic auth 使用者名稱，密碼留空
        let request = self
            .client
            .get(join_url(&self.base_url, "/v1/account"))
            .basic_auth(entry.secret(), Some(""));

        check_json(Service::Stripe, request, |body| {
            if string_field(body, "object").as_deref() != Some("account") {
                return None;
            }
            Some(string_field(body, "id").unwrap_or_else(|| "account".to_string()))
        })
        .await
    }
}
