use crate::core::http::{check_json, join_url};
use crate::domain::model::{CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;
use crate::utils::validation::validate_secret;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub struct CloudflareChecker {
    client: Client,
    base_url: String,
}

impl CloudflareChecker {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// `success` 為 true 且 token 狀態為 active 才算有效
fn active_token(body: &Value) -> Option<String> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    let result = body.get("result")?;
    if result.get("status").and_then(Value::as_str) != Some("active") {
        return None;
    }
    let id = result.get("id").and_then(Value::as_str).unwrap_or("token");
    Some(format!("{} active", id))
}

#[async_trait]
impl CredentialChecker for CloudflareChecker {
    fn service(&self) -> Service {
        Service::Cloudflare
    }

    fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        validate_secret(Service::Cloudflare, "secret", entry.secret())
    }

    fn describe(&self, _entry: &CredentialEntry) -> String {
        format!(
            "GET {} (bearer ***)",
            join_url(&self.base_url, "/client/v4/user/tokens/verify")
        )
    }

    async fn check(&self, entry: &CredentialEntry) -> CheckResult {
        let request = self
            .client
            .get(join_url(&self.base_url, "/client/v4/user/tokens/verify"))
            .bearer_auth(entry.secret());

        check_json(Service::Cloudflare, request, active_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_active_token() {
        let body = json!({"success": true, "result": {"id": "abc", "status": "active"}});
        assert_eq!(active_token(&body).as_deref(), Some("abc active"));

        let body = json!({"success": true, "result": {"id": "abc", "status": "disabled"}});
        assert!(active_token(&body).is_none());

        let body = json!({"success": false, "errors": [{"code": 1000}]});
        assert!(active_token(&body).is_none());
    }
}
