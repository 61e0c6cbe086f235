use crate::core::http::{Endpoints, HttpSettings};
use crate::domain::model::{aux, CredentialEntry, Service};
use crate::utils::error::{CredCheckError, Result};
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub http: Option<HttpConfig>,
    pub endpoints: Option<Endpoints>,
    #[serde(default)]
    pub credentials: Vec<CredentialConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub concurrency: Option<usize>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    pub name: Option<String>,
    pub service: String,
    #[serde(default)]
    pub secret: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_key_id: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("name", &self.name)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl CredentialConfig {
    pub fn to_entry(&self) -> Result<CredentialEntry> {
        let service: Service = self.service.parse()?;
        let entry = CredentialEntry::new(service, self.secret.clone())
            .with_optional_aux(aux::CLIENT_ID, self.client_id.clone())
            .with_optional_aux(aux::CLIENT_SECRET, self.client_secret.clone())
            .with_optional_aux(aux::ACCESS_KEY_ID, self.access_key_id.clone())
            .with_optional_aux(aux::SESSION_TOKEN, self.session_token.clone())
            .with_optional_aux(aux::REGION, self.region.clone());

        Ok(match &self.name {
            Some(name) => entry.with_label(name.clone()),
            None => entry,
        })
    }
}

impl BatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CredCheckError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GITHUB_TOKEN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CredCheckError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("🔶 Environment variable {} is not set", var_name);
                format!("${{{}}}", var_name)
            })
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        for (field, url) in self.endpoints().entries() {
            validate_url(field, url)?;
        }

        if let Some(http) = &self.http {
            if let Some(timeout) = http.timeout_seconds {
                validate_range("http.timeout_seconds", timeout, 1, 300)?;
            }
            if let Some(concurrency) = http.concurrency {
                validate_range("http.concurrency", concurrency, 1, 64)?;
            }
        }

        for (index, credential) in self.credentials.iter().enumerate() {
            credential
                .service
                .parse::<Service>()
                .map_err(|_| CredCheckError::InvalidConfigValue {
                    field: format!("credentials[{}].service", index),
                    value: credential.service.clone(),
                    reason: "Valid services: zoho, aws, stripe, npm, cloudflare, github"
                        .to_string(),
                })?;
        }

        Ok(())
    }

    pub fn endpoints(&self) -> Endpoints {
        self.endpoints.clone().unwrap_or_default()
    }

    pub fn http_settings(&self) -> HttpSettings {
        let mut settings = HttpSettings::default();
        if let Some(http) = &self.http {
            if let Some(timeout) = http.timeout_seconds {
                settings.timeout = Duration::from_secs(timeout);
            }
            if let Some(user_agent) = &http.user_agent {
                settings.user_agent = user_agent.clone();
            }
            if let Some(concurrency) = http.concurrency {
                settings.concurrency = concurrency;
            }
        }
        settings
    }

    pub fn entries(&self) -> Result<Vec<CredentialEntry>> {
        self.credentials.iter().map(CredentialConfig::to_entry).collect()
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
