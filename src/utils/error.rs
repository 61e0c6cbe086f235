use crate::domain::model::Service;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredCheckError {
    #[error("Malformed {service} credential: {field} {reason}")]
    MalformedConfig {
        service: Service,
        field: String,
        reason: String,
        label: Option<String>,
        detector: Option<String>,
    },

    #[error("{service} rejected the credential (status {status})")]
    InvalidCredential { service: Service, status: u16 },

    #[error("Network error while checking {service}: {message}")]
    Network { service: Service, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown service: {name}")]
    UnknownService { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Credential,
    Network,
    Io,
}

impl CredCheckError {
    pub fn malformed(service: Service, field: &str, reason: &str) -> Self {
        Self::MalformedConfig {
            service,
            field: field.to_string(),
            reason: reason.to_string(),
            label: None,
            detector: None,
        }
    }

    /// 附上憑證來源，讓報表的 MalformedConfig 列保留 label 與 detector
    pub fn with_origin(
        mut self,
        origin_label: Option<&str>,
        origin_detector: Option<&str>,
    ) -> Self {
        if let Self::MalformedConfig {
            label, detector, ..
        } = &mut self
        {
            *label = origin_label.map(str::to_string);
            *detector = origin_detector.map(str::to_string);
        }
        self
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::MalformedConfig { label, .. } => label.as_deref(),
            _ => None,
        }
    }

    pub fn detector(&self) -> Option<&str> {
        match self {
            Self::MalformedConfig { detector, .. } => detector.as_deref(),
            _ => None,
        }
    }

    pub fn service(&self) -> Option<Service> {
        match self {
            Self::MalformedConfig { service, .. }
            | Self::InvalidCredential { service, .. }
            | Self::Network { service, .. } => Some(*service),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedConfig { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValue { .. }
            | Self::UnknownService { .. } => ErrorCategory::Config,
            Self::InvalidCredential { .. } => ErrorCategory::Credential,
            Self::Network { .. } | Self::Http(_) => ErrorCategory::Network,
            Self::Io(_) | Self::Serialization(_) | Self::Csv(_) => ErrorCategory::Io,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedConfig { service, field, .. } => {
                format!("The {} credential is missing '{}'", service, field)
            }
            Self::InvalidCredential { service, .. } => {
                format!("{} does not accept this credential", service)
            }
            Self::Network { service, .. } => format!("Could not reach {}", service),
            Self::UnknownService { name } => format!("'{}' is not a supported service", name),
            Self::ConfigError { .. } | Self::InvalidConfigValue { .. } => {
                format!("Configuration problem: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MalformedConfig { service: Service::Zoho, .. } => {
                "Zoho checks need a refresh token, client_id and client_secret"
            }
            Self::MalformedConfig { service: Service::Aws, .. } => {
                "AWS checks need a secret access key and access_key_id"
            }
            Self::MalformedConfig { .. } => "Provide a non-empty secret",
            Self::InvalidCredential { .. } => "The credential is revoked, expired or mistyped",
            Self::Network { .. } | Self::Http(_) => {
                "Check connectivity or raise --timeout, then run the check again"
            }
            Self::UnknownService { .. } => {
                "Use one of: zoho, aws, stripe, npm, cloudflare, github"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValue { .. } => {
                "Fix the configuration file and run again"
            }
            Self::Io(_) | Self::Serialization(_) | Self::Csv(_) => {
                "Check the input and output paths"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CredCheckError>;
