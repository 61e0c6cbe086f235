use crate::domain::model::{CredentialEntry, Service};
use crate::utils::error::{CredCheckError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CredCheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CredCheckError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CredCheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CredCheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 秘密值不可為空或只含空白
pub fn validate_secret(service: Service, field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CredCheckError::malformed(
            service,
            field_name,
            "cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// 取出必要的輔助欄位，缺少或為空時回傳 MalformedConfig
pub fn required_aux<'a>(entry: &'a CredentialEntry, field_name: &str) -> Result<&'a str> {
    let value = entry
        .aux(field_name)
        .ok_or_else(|| CredCheckError::malformed(entry.service(), field_name, "is required"))?;
    validate_secret(entry.service(), field_name, value)?;
    Ok(value)
}
