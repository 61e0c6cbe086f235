use crate::domain::model::{CheckResult, Outcome, Service};
use crate::utils::error::Result;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub concurrency: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: format!("cred-check/{}", env!("CARGO_PKG_VERSION")),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl HttpSettings {
    pub fn build_client(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;
        Ok(client)
    }
}

/// 各服務的 API 位址。測試與區域化部署 (例如 Zoho EU) 可覆寫。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub zoho_accounts: String,
    pub zoho_api: String,
    /// None 時使用 AWS SDK 依區域解析的預設位址
    pub aws: Option<String>,
    pub stripe: String,
    pub npm: String,
    pub cloudflare: String,
    pub github: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            zoho_accounts: "https://accounts.zoho.com".to_string(),
            zoho_api: "https://www.zohoapis.com".to_string(),
            aws: None,
            stripe: "https://api.stripe.com".to_string(),
            npm: "https://registry.npmjs.org".to_string(),
            cloudflare: "https://api.cloudflare.com".to_string(),
            github: "https://api.github.com".to_string(),
        }
    }
}

impl Endpoints {
    /// 所有服務都指向同一個位址
    pub fn single_host(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            zoho_accounts: base.clone(),
            zoho_api: base.clone(),
            aws: Some(base.clone()),
            stripe: base.clone(),
            npm: base.clone(),
            cloudflare: base.clone(),
            github: base,
        }
    }

    /// (欄位名稱, 位址) 清單，供設定驗證使用
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![
            ("endpoints.zoho_accounts", self.zoho_accounts.as_str()),
            ("endpoints.zoho_api", self.zoho_api.as_str()),
            ("endpoints.stripe", self.stripe.as_str()),
            ("endpoints.npm", self.npm.as_str()),
            ("endpoints.cloudflare", self.cloudflare.as_str()),
            ("endpoints.github", self.github.as_str()),
        ];
        if let Some(aws) = &self.aws {
            entries.push(("endpoints.aws", aws.as_str()));
        }
        entries
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

/// 送出請求並讀取 JSON 內容。非成功狀態直接轉為最終結果。
pub async fn fetch_json(
    service: Service,
    request: RequestBuilder,
) -> std::result::Result<(u16, Value), CheckResult> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("📡 {}: transport failure: {}", service, e);
            return Err(CheckResult::network_error(service, describe_transport_error(&e)));
        }
    };

    let status = response.status();
    tracing::debug!("📡 {}: response status {}", service, status);

    if let Some(result) = classify_status(service, status) {
        return Err(result);
    }

    match response.json::<Value>().await {
        Ok(body) => Ok((status.as_u16(), body)),
        Err(e) if e.is_decode() => Err(CheckResult::invalid(service, Some(status.as_u16()))
            .with_detail("response body is not JSON")),
        Err(e) => Err(
            CheckResult::new(service, Outcome::NetworkError, Some(status.as_u16()))
                .with_detail(describe_transport_error(&e)),
        ),
    }
}

/// 非 2xx 狀態的分類。2xx 回傳 None，交由內容檢查決定。
pub fn classify_status(service: Service, status: StatusCode) -> Option<CheckResult> {
    let code = status.as_u16();
    if status.is_success() {
        None
    } else if status.is_server_error() {
        Some(
            CheckResult::new(service, Outcome::NetworkError, Some(code))
                .with_detail(format!("{} is unavailable", service)),
        )
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(CheckResult::invalid(service, Some(code)).with_detail("authentication rejected"))
    } else {
        Some(CheckResult::invalid(service, Some(code)).with_detail(format!("unexpected status {}", code)))
    }
}

/// 依內容形狀判斷：accept 回傳 Some(detail) 代表有效
pub fn classify_body<F>(service: Service, status: u16, body: &Value, accept: F) -> CheckResult
where
    F: FnOnce(&Value) -> Option<String>,
{
    match accept(body) {
        Some(detail) => CheckResult::valid(service, status).with_detail(detail),
        None => CheckResult::invalid(service, Some(status)).with_detail("unexpected response body"),
    }
}

pub async fn check_json<F>(service: Service, request: RequestBuilder, accept: F) -> CheckResult
where
    F: FnOnce(&Value) -> Option<String>,
{
    match fetch_json(service, request).await {
        Ok((status, body)) => classify_body(service, status, &body, accept),
        Err(result) => result,
    }
}

/// 讀取字串欄位
pub fn string_field(body: &Value, field: &str) -> Option<String> {
    body.get(field).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(classify_status(Service::Github, StatusCode::OK).is_none());

        let result = classify_status(Service::Github, StatusCode::UNAUTHORIZED).unwrap();
        assert_eq!(result.outcome, Outcome::Invalid);
        assert_eq!(result.status, Some(401));

        let result = classify_status(Service::Npm, StatusCode::FORBIDDEN).unwrap();
        assert_eq!(result.outcome, Outcome::Invalid);

        let result = classify_status(Service::Stripe, StatusCode::NOT_FOUND).unwrap();
        assert_eq!(result.outcome, Outcome::Invalid);

        let result = classify_status(Service::Stripe, StatusCode::BAD_GATEWAY).unwrap();
        assert_eq!(result.outcome, Outcome::NetworkError);
        assert_eq!(result.status, Some(502));
    }

    #[test]
    fn test_classify_body() {
        let body = serde_json::json!({"login": "octocat"});
        let result = classify_body(Service::Github, 200, &body, |b| string_field(b, "login"));
        assert!(result.is_valid());
        assert_eq!(result.detail.as_deref(), Some("octocat"));

        let body = serde_json::json!({"message": "ok"});
        let result = classify_body(Service::Github, 200, &body, |b| string_field(b, "login"));
        assert_eq!(result.outcome, Outcome::Invalid);
    }

    #[test]
    fn test_single_host_endpoints() {
        let endpoints = Endpoints::single_host("http://127.0.0.1:9000/");
        assert_eq!(endpoints.github, "http://127.0.0.1:9000");
        assert_eq!(endpoints.aws.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(endpoints.entries().len(), 7);
        assert_eq!(join_url(&endpoints.npm, "/-/whoami"), "http://127.0.0.1:9000/-/whoami");
    }
}
