use crate::core::http::classify_status;
use crate::domain::model::{aux, CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;
use crate::utils::validation::{required_aux, validate_secret};
use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-east-1";

/// 以 S3 ListBuckets 驗證 access key，相當於 `aws s3 ls`
pub struct AwsChecker {
    endpoint: Option<String>,
    timeout: Duration,
}

impl AwsChecker {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    fn client_for(&self, entry: &CredentialEntry) -> aws_sdk_s3::Client {
        let credentials = Credentials::new(
            entry.aux(aux::ACCESS_KEY_ID).unwrap_or_default(),
            entry.secret(),
            entry.aux(aux::SESSION_TOKEN).map(str::to_string),
            None,
            "cred-check",
        );
        let region = entry.aux(aux::REGION).unwrap_or(DEFAULT_REGION).to_string();

        // 不重試，逾時沿用 HTTP 設定
        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(self.timeout)
                    .build(),
            );

        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        aws_sdk_s3::Client::from_conf(builder.build())
    }
}

fn classify_code(code: u16, detail: String) -> CheckResult {
    match reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| classify_status(Service::Aws, status))
    {
        Some(result) => result.with_detail(detail),
        None => CheckResult::invalid(Service::Aws, Some(code)).with_detail(detail),
    }
}

#[async_trait]
impl CredentialChecker for AwsChecker {
    fn service(&self) -> Service {
        Service::Aws
    }

    fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        validate_secret(Service::Aws, "secret", entry.secret())?;
        required_aux(entry, aux::ACCESS_KEY_ID)?;
        Ok(())
    }

    fn describe(&self, entry: &CredentialEntry) -> String {
        let region = entry.aux(aux::REGION).unwrap_or(DEFAULT_REGION);
        match &self.endpoint {
            Some(endpoint) => format!("ListBuckets {} (region {})", endpoint, region),
            None => format!("ListBuckets https://s3.{}.amazonaws.com", region),
        }
    }

    async fn check(&self, entry: &CredentialEntry) -> CheckResult {
        let client = self.client_for(entry);

        match client.list_buckets().send().await {
            Ok(output) => CheckResult::valid(Service::Aws, 200)
                .with_detail(format!("{} bucket(s)", output.buckets().len())),
            Err(SdkError::ServiceError(err)) => {
                let code = err.raw().status().as_u16();
                let detail = err.err().code().unwrap_or("service error").to_string();
                tracing::debug!("📡 aws: service error {} ({})", code, detail);
                classify_code(code, detail)
            }
            Err(SdkError::ResponseError(err)) => {
                let code = err.raw().status().as_u16();
                classify_code(code, "unreadable response".to_string())
            }
            Err(err) => {
                tracing::debug!("📡 aws: transport failure: {}", DisplayErrorContext(&err));
                CheckResult::network_error(Service::Aws, DisplayErrorContext(&err).to_string())
            }
        }
    }
}
