use crate::core::http::{check_json, fetch_json, join_url, string_field};
use crate::domain::model::{aux, CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;
use crate::utils::validation::{required_aux, validate_secret};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;

/// Zoho CRM：先以 refresh token 換取 access token，再呼叫 organizations。
/// 取得的 access token 用完即丟。
pub struct ZohoChecker {
    client: Client,
    accounts_url: String,
    api_url: String,
}

impl ZohoChecker {
    pub fn new(client: Client, accounts_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            client,
            accounts_url: accounts_url.into(),
            api_url: api_url.into(),
        }
    }

    /// 換取 access token，失敗時回傳最終結果
    async fn refresh_access_token(
        &self,
        entry: &CredentialEntry,
    ) -> std::result::Result<String, CheckResult> {
        let form = [
            ("refresh_token", entry.secret()),
            ("client_id", entry.aux(aux::CLIENT_ID).unwrap_or_default()),
            ("client_secret", entry.aux(aux::CLIENT_SECRET).unwrap_or_default()),
            ("grant_type", "refresh_token"),
        ];

        let request = self
            .client
            .post(join_url(&self.accounts_url, "/oauth/v2/token"))
            .form(&form);

        let (status, body) = fetch_json(Service::Zoho, request).await?;

        // Zoho 對錯誤的 refresh token 仍回 200，內容帶 error 欄位
        match string_field(&body, "access_token") {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                let reason = body
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("no access_token in refresh response");
                tracing::debug!("🔑 zoho: token refresh rejected: {}", reason);
                Err(CheckResult::invalid(Service::Zoho, Some(status)).with_detail(reason))
            }
        }
    }
}

fn organization_name(body: &Value) -> Option<String> {
    let orgs = body.get("org")?.as_array()?;
    Some(
        orgs.first()
            .and_then(|org| string_field(org, "company_name"))
            .unwrap_or_else(|| format!("{} organization(s)", orgs.len())),
    )
}

#[async_trait]
impl CredentialChecker for ZohoChecker {
    fn service(&self) -> Service {
        Service::Zoho
    }

    fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        validate_secret(Service::Zoho, "refresh_token", entry.secret())?;
        required_aux(entry, aux::CLIENT_ID)?;
        required_aux(entry, aux::CLIENT_SECRET)?;
        Ok(())
    }

    fn describe(&self, _entry: &CredentialEntry) -> String {
        format!(
            "POST {} → GET {}",
            join_url(&self.accounts_url, "/oauth/v2/token"),
            join_url(&self.api_url, "/crm/v4/organizations")
        )
    }

    async fn check(&self, entry: &CredentialEntry) -> CheckResult {
        let access_token = match self.refresh_access_token(entry).await {
            Ok(token) => token,
            Err(result) => return result,
        };
        tracing::debug!("🔑 zoho: refresh succeeded, querying organizations");

        let request = self
            .client
            .get(join_url(&self.api_url, "/crm/v4/organizations"))
            .header(AUTHORIZATION, format!("Zoho-oauthtoken {}", access_token));

        check_json(Service::Zoho, request, organization_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_name() {
        let body = json!({"org": [{"company_name": "Acme", "id": "1"}]});
        assert_eq!(organization_name(&body).as_deref(), Some("Acme"));

        let body = json!({"org": [{"id": "1"}, {"id": "2"}]});
        assert_eq!(organization_name(&body).as_deref(), Some("2 organization(s)"));

        assert!(organization_name(&json!({"code": "INVALID_TOKEN"})).is_none());
    }

    #[test]
    fn test_validate_requires_all_fields() {
        let checker = ZohoChecker::new(Client::new(), "http://localhost", "http://localhost");

        let complete = CredentialEntry::new(Service::Zoho, "1000.refresh")
            .with_aux(aux::CLIENT_ID, "1000.CLIENT")
            .with_aux(aux::CLIENT_SECRET, "shh");
        assert!(checker.validate(&complete).is_ok());

        let no_refresh = CredentialEntry::new(Service::Zoho, "")
            .with_aux(aux::CLIENT_ID, "1000.CLIENT")
            .with_aux(aux::CLIENT_SECRET, "shh");
        assert!(checker.validate(&no_refresh).is_err());

        let no_client_secret =
            CredentialEntry::new(Service::Zoho, "1000.refresh").with_aux(aux::CLIENT_ID, "id");
        assert!(checker.validate(&no_client_secret).is_err());
    }
}
