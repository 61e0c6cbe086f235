use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::CredCheckError;

/// 支援檢查的第三方服務
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Zoho,
    Aws,
    Stripe,
    Npm,
    Cloudflare,
    Github,
}

impl Service {
    pub const ALL: [Service; 6] = [
        Service::Zoho,
        Service::Aws,
        Service::Stripe,
        Service::Npm,
        Service::Cloudflare,
        Service::Github,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Zoho => "zoho",
            Service::Aws => "aws",
            Service::Stripe => "stripe",
            Service::Npm => "npm",
            Service::Cloudflare => "cloudflare",
            Service::Github => "github",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Service {
    type Err = CredCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zoho" | "zoho-crm" | "zohocrm" => Ok(Service::Zoho),
            "aws" | "s3" => Ok(Service::Aws),
            "stripe" => Ok(Service::Stripe),
            "npm" | "npmjs" => Ok(Service::Npm),
            "cloudflare" | "cf" => Ok(Service::Cloudflare),
            "github" | "gh" => Ok(Service::Github),
            _ => Err(CredCheckError::UnknownService {
                name: s.to_string(),
            }),
        }
    }
}

/// 輔助欄位名稱
pub mod aux {
    pub const CLIENT_ID: &str = "client_id";
    pub const CLIENT_SECRET: &str = "client_secret";
    pub const ACCESS_KEY_ID: &str = "access_key_id";
    pub const SESSION_TOKEN: &str = "session_token";
    pub const REGION: &str = "region";
}

/// 一筆待檢查的憑證。交給檢查器之後不再修改。
#[derive(Clone)]
pub struct CredentialEntry {
    service: Service,
    secret: String,
    aux: BTreeMap<String, String>,
    label: Option<String>,
    detector: Option<String>,
}

impl CredentialEntry {
    pub fn new(service: Service, secret: impl Into<String>) -> Self {
        Self {
            service,
            secret: secret.into(),
            aux: BTreeMap::new(),
            label: None,
            detector: None,
        }
    }

    pub fn with_aux(mut self, key: &str, value: impl Into<String>) -> Self {
        self.aux.insert(key.to_string(), value.into());
        self
    }

    /// 只在值存在時設定輔助欄位
    pub fn with_optional_aux(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.with_aux(key, value),
            None => self,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 產生這筆憑證的掃描器 detector（例如 TruffleHog 的 `DetectorName`）
    pub fn with_detector(mut self, detector: impl Into<String>) -> Self {
        self.detector = Some(detector.into());
        self
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn aux(&self, key: &str) -> Option<&str> {
        self.aux.get(key).map(String::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn detector(&self) -> Option<&str> {
        self.detector.as_deref()
    }
}

// 不輸出任何秘密值
impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("service", &self.service)
            .field("secret", &"<redacted>")
            .field("aux_fields", &self.aux.keys().collect::<Vec<_>>())
            .field("label", &self.label)
            .field("detector", &self.detector)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    Invalid,
    NetworkError,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Valid => 0,
            Outcome::Invalid => 1,
            Outcome::NetworkError => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Valid => "valid",
            Outcome::Invalid => "invalid",
            Outcome::NetworkError => "network_error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub service: Service,
    pub outcome: Outcome,
    pub status: Option<u16>,
    pub detail: Option<String>,
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(service: Service, outcome: Outcome, status: Option<u16>) -> Self {
        Self {
            service,
            outcome,
            status,
            detail: None,
            label: None,
            detector: None,
            checked_at: Utc::now(),
        }
    }

    pub fn valid(service: Service, status: u16) -> Self {
        Self::new(service, Outcome::Valid, Some(status))
    }

    pub fn invalid(service: Service, status: Option<u16>) -> Self {
        Self::new(service, Outcome::Invalid, status)
    }

    pub fn network_error(service: Service, message: impl Into<String>) -> Self {
        Self::new(service, Outcome::NetworkError, None).with_detail(message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    pub fn with_detector(mut self, detector: Option<&str>) -> Self {
        self.detector = detector.map(str::to_string);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.outcome == Outcome::Valid
    }

    /// 把非 Valid 的結果轉為錯誤
    pub fn into_result(self) -> crate::utils::error::Result<CheckResult> {
        match self.outcome {
            Outcome::Valid => Ok(self),
            Outcome::Invalid => Err(CredCheckError::InvalidCredential {
                service: self.service,
                status: self.status.unwrap_or_default(),
            }),
            Outcome::NetworkError => Err(CredCheckError::Network {
                service: self.service,
                message: self.detail.unwrap_or_else(|| "transport failure".to_string()),
            }),
        }
    }
}
