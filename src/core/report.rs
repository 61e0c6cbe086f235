use crate::domain::model::{CheckResult, Outcome, Service};
use crate::utils::error::{CredCheckError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// MalformedConfig 的結束碼
pub const MALFORMED_EXIT_CODE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = CredCheckError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(CredCheckError::InvalidConfigValue {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

pub fn exit_code(result: &Result<CheckResult>) -> i32 {
    match result {
        Ok(result) => result.outcome.exit_code(),
        Err(CredCheckError::MalformedConfig { .. }) => MALFORMED_EXIT_CODE,
        Err(e) => match e.category() {
            crate::utils::error::ErrorCategory::Network => Outcome::NetworkError.exit_code(),
            crate::utils::error::ErrorCategory::Credential => Outcome::Invalid.exit_code(),
            _ => MALFORMED_EXIT_CODE,
        },
    }
}

/// 批次的結束碼取最嚴重者
pub fn batch_exit_code(results: &[Result<CheckResult>]) -> i32 {
    results.iter().map(exit_code).max().unwrap_or(0)
}

pub fn status_line(result: &Result<CheckResult>) -> String {
    match result {
        Ok(result) => {
            let icon = match result.outcome {
                Outcome::Valid => "✅",
                Outcome::Invalid => "❌",
                Outcome::NetworkError => "🌐",
            };
            let mut line = format!("{} {:<10} {:<13}", icon, result.service, result.outcome);
            if let Some(status) = result.status {
                let _ = write!(line, " ({})", status);
            }
            if let Some(detail) = &result.detail {
                let _ = write!(line, " {}", detail);
            }
            if let Some(label) = &result.label {
                let _ = write!(line, " [{}]", label);
            }
            line
        }
        Err(CredCheckError::MalformedConfig {
            service,
            field,
            label,
            ..
        }) => {
            let mut line = format!("⚠️ {:<10} malformed config: {}", service, field);
            if let Some(label) = label {
                let _ = write!(line, " [{}]", label);
            }
            line
        }
        Err(e) => format!("⚠️ {}", e),
    }
}

fn render_text(results: &[Result<CheckResult>]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&status_line(result));
        out.push('\n');
    }

    let count = |outcome: Outcome| {
        results
            .iter()
            .filter(|r| matches!(r, Ok(result) if result.outcome == outcome))
            .count()
    };
    let malformed = results.iter().filter(|r| r.is_err()).count();
    let _ = writeln!(
        out,
        "📊 {} checked: {} valid, {} invalid, {} network error(s), {} malformed",
        results.len(),
        count(Outcome::Valid),
        count(Outcome::Invalid),
        count(Outcome::NetworkError),
        malformed
    );
    out
}

/// 每種錯誤一則修正建議，附上受影響的服務與 label；相同建議只列一次
pub fn suggestions(results: &[Result<CheckResult>]) -> Vec<String> {
    let mut grouped: Vec<(&'static str, Vec<String>)> = Vec::new();

    for e in results.iter().filter_map(|r| r.as_ref().err()) {
        let origin = match (e.service(), e.label()) {
            (Some(service), Some(label)) => format!("{} [{}]", service, label),
            (Some(service), None) => service.to_string(),
            (None, _) => "input".to_string(),
        };
        let suggestion = e.recovery_suggestion();
        match grouped.iter_mut().find(|(s, _)| *s == suggestion) {
            Some((_, origins)) => {
                if !origins.contains(&origin) {
                    origins.push(origin);
                }
            }
            None => grouped.push((suggestion, vec![origin])),
        }
    }

    grouped
        .into_iter()
        .map(|(suggestion, origins)| format!("{}: {}", origins.join(", "), suggestion))
        .collect()
}

#[derive(Serialize)]
struct ErrorRecord<'a> {
    error: String,
    service: Option<Service>,
    label: Option<&'a str>,
    detector: Option<&'a str>,
}

fn render_json(results: &[Result<CheckResult>]) -> Result<String> {
    let values = results
        .iter()
        .map(|result| match result {
            Ok(result) => serde_json::to_value(result),
            Err(e) => serde_json::to_value(ErrorRecord {
                error: e.to_string(),
                service: e.service(),
                label: e.label(),
                detector: e.detector(),
            }),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&values)?)
}

fn render_csv(results: &[Result<CheckResult>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "label",
        "detector",
        "service",
        "outcome",
        "status",
        "detail",
        "checked_at",
    ])?;

    for result in results {
        match result {
            Ok(result) => writer.write_record([
                result.label.clone().unwrap_or_default(),
                result.detector.clone().unwrap_or_default(),
                result.service.to_string(),
                result.outcome.to_string(),
                result.status.map(|s| s.to_string()).unwrap_or_default(),
                result.detail.clone().unwrap_or_default(),
                result.checked_at.to_rfc3339(),
            ])?,
            Err(e) => {
                let service = e.service().map(|s| s.to_string()).unwrap_or_default();
                writer.write_record([
                    e.label().unwrap_or_default().to_string(),
                    e.detector().unwrap_or_default().to_string(),
                    service,
                    "malformed_config".to_string(),
                    String::new(),
                    e.to_string(),
                    String::new(),
                ])?
            }
        }
    }

    let data = writer
        .into_inner()
        .map_err(|e| CredCheckError::Io(e.into_error()))?;
    String::from_utf8(data).map_err(|e| CredCheckError::ConfigError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn render(results: &[Result<CheckResult>], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(results)),
        ReportFormat::Json => render_json(results),
        ReportFormat::Csv => render_csv(results),
    }
}
