use crate::config::{CheckArgs, CliConfig};
use crate::core::http::{Endpoints, HttpSettings};
use crate::domain::model::{aux, CredentialEntry, Service};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use std::fmt;
use std::time::Duration;

impl CliConfig {
    pub fn http_settings(&self) -> HttpSettings {
        self.merge_http_settings(HttpSettings::default())
    }

    /// 命令列的設定覆蓋檔案中的設定
    pub fn merge_http_settings(&self, mut settings: HttpSettings) -> HttpSettings {
        if let Some(timeout) = self.timeout {
            settings.timeout = Duration::from_secs(timeout);
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        settings
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            validate_range("timeout", timeout, 1, 300)?;
        }
        if let Some(concurrency) = self.concurrency {
            validate_range("concurrency", concurrency, 1, 64)?;
        }
        if let crate::config::Command::Check(args) = &self.command {
            if let Some(endpoint) = &args.endpoint {
                validate_url("endpoint", endpoint)?;
            }
        }
        Ok(())
    }
}

impl CheckArgs {
    /// 缺少的欄位留給檢查器回報 MalformedConfig
    pub fn to_entry(&self) -> CredentialEntry {
        CredentialEntry::new(self.service, self.secret.clone().unwrap_or_default())
            .with_optional_aux(aux::CLIENT_ID, self.client_id.clone())
            .with_optional_aux(aux::CLIENT_SECRET, self.client_secret.clone())
            .with_optional_aux(aux::ACCESS_KEY_ID, self.access_key_id.clone())
            .with_optional_aux(aux::SESSION_TOKEN, self.session_token.clone())
            .with_optional_aux(aux::REGION, self.region.clone())
    }

    pub fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        let Some(endpoint) = self.endpoint.clone() else {
            return endpoints;
        };
        match self.service {
            Service::Zoho => {
                endpoints.zoho_accounts = endpoint.clone();
                endpoints.zoho_api = endpoint;
            }
            Service::Aws => endpoints.aws = Some(endpoint),
            Service::Stripe => endpoints.stripe = endpoint,
            Service::Npm => endpoints.npm = endpoint,
            Service::Cloudflare => endpoints.cloudflare = endpoint,
            Service::Github => endpoints.github = endpoint,
        }
        endpoints
    }
}

impl fmt::Debug for CheckArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckArgs")
            .field("service", &self.service)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .field("access_key_id", &self.access_key_id)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
