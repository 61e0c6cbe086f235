//! TruffleHog ND-JSON 匯入。
//!
//! 每行一筆 finding，只取 `DetectorName`、`Raw`、`RawV2` 與 GitHub 來源連結。
//! detector 名稱會帶進檢查結果，報表才能對回原本的 finding。
//! 空行與無法解析的行會被略過。

use crate::domain::model::{aux, CredentialEntry, Service};
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(rename = "DetectorName")]
    pub detector_name: String,
    #[serde(rename = "Raw")]
    pub raw: Option<String>,
    #[serde(rename = "RawV2")]
    pub raw_v2: Option<String>,
    #[serde(rename = "SourceMetadata")]
    pub source_metadata: Option<SourceMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceMetadata {
    #[serde(rename = "Data")]
    pub data: Option<SourceData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceData {
    #[serde(rename = "Github")]
    pub github: Option<GithubSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GithubSource {
    pub link: Option<String>,
}

impl Finding {
    pub fn link(&self) -> Option<&str> {
        self.source_metadata
            .as_ref()?
            .data
            .as_ref()?
            .github
            .as_ref()?
            .link
            .as_deref()
    }

    /// 對應到支援的服務；不支援的 detector 回傳 None
    pub fn service(&self) -> Option<Service> {
        match self.detector_name.to_ascii_lowercase().as_str() {
            "github" | "githuboauth2" => Some(Service::Github),
            "stripe" => Some(Service::Stripe),
            "npmtoken" | "npmtokenv2" => Some(Service::Npm),
            "cloudflareapitoken" => Some(Service::Cloudflare),
            "aws" => Some(Service::Aws),
            "zohocrm" => Some(Service::Zoho),
            _ => None,
        }
    }

    pub fn to_entry(&self) -> Option<CredentialEntry> {
        let service = self.service()?;
        let raw = self.raw.clone().unwrap_or_default();

        let entry = match service {
            // AWS: Raw 是 access key id，RawV2 是 id 接上 secret
            Service::Aws => {
                let secret = self
                    .raw_v2
                    .as_deref()
                    .and_then(|v2| v2.strip_prefix(raw.as_str()))
                    .unwrap_or_default()
                    .to_string();
                CredentialEntry::new(service, secret).with_aux(aux::ACCESS_KEY_ID, raw)
            }
            _ => {
                let secret = if raw.is_empty() {
                    self.raw_v2.clone().unwrap_or_default()
                } else {
                    raw
                };
                CredentialEntry::new(service, secret)
            }
        };

        let entry = entry.with_detector(self.detector_name.clone());
        Some(match self.link() {
            Some(link) => entry.with_label(link),
            None => entry,
        })
    }
}

/// 解析單行；空行或格式錯誤回傳 None
pub fn parse_line(line: &str) -> Option<Finding> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(finding) => Some(finding),
        Err(e) => {
            tracing::debug!("Skipping malformed finding line: {}", e);
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub entries: Vec<CredentialEntry>,
    pub skipped_lines: usize,
    pub unsupported: BTreeMap<String, usize>,
}

pub fn import_findings<R: BufRead>(reader: R, only: &[Service]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(finding) = parse_line(&line) else {
            summary.skipped_lines += 1;
            continue;
        };

        match finding.to_entry() {
            Some(entry) if only.is_empty() || only.contains(&entry.service()) => {
                summary.entries.push(entry)
            }
            Some(_) => {}
            None => {
                *summary
                    .unsupported
                    .entry(finding.detector_name.clone())
                    .or_default() += 1;
            }
        }
    }

    tracing::info!(
        "📥 Imported {} finding(s), skipped {} malformed line(s)",
        summary.entries.len(),
        summary.skipped_lines
    );
    if !summary.unsupported.is_empty() {
        tracing::info!("🔶 Unsupported detectors: {:?}", summary.unsupported);
    }

    Ok(summary)
}

pub fn import_findings_file<P: AsRef<Path>>(path: P, only: &[Service]) -> Result<ImportSummary> {
    let file = std::fs::File::open(path)?;
    import_findings(std::io::BufReader::new(file), only)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINDINGS: &str = r#"{"DetectorName":"Github","Raw":"ghp_abc","SourceMetadata":{"Data":{"Github":{"link":"https://github.com/acme/app/blob/1/.env#L3","repository":"acme/app"}}},"Verified":false}

not json at all
{"DetectorName":"AWS","Raw":"AKIAEXAMPLE","RawV2":"AKIAEXAMPLEwJalrXUtnFEMI"}
{"DetectorName":"Slack","Raw":"xoxb-1"}
{"DetectorName":"Stripe","RawV2":"sk_live_123"}
"#;

    #[test]
    fn test_import_maps_supported_detectors() {
        let summary = import_findings(FINDINGS.as_bytes(), &[]).unwrap();

        assert_eq!(summary.entries.len(), 3);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.unsupported.get("Slack"), Some(&1));

        let github = &summary.entries[0];
        assert_eq!(github.service(), Service::Github);
        assert_eq!(github.secret(), "ghp_abc");
        assert_eq!(
            github.label(),
            Some("https://github.com/acme/app/blob/1/.env#L3")
        );
        assert_eq!(github.detector(), Some("Github"));

        let aws = &summary.entries[1];
        assert_eq!(aws.service(), Service::Aws);
        assert_eq!(aws.aux(aux::ACCESS_KEY_ID), Some("AKIAEXAMPLE"));
        assert_eq!(aws.secret(), "wJalrXUtnFEMI");
        assert_eq!(aws.detector(), Some("AWS"));
        assert_eq!(aws.label(), None);

        assert_eq!(summary.entries[2].secret(), "sk_live_123");
    }

    #[test]
    fn test_import_filters_by_service() {
        let summary = import_findings(FINDINGS.as_bytes(), &[Service::Aws]).unwrap();
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].service(), Service::Aws);
    }

    #[test]
    fn test_parse_line_skips_blank() {
        assert!(parse_line("   ").is_none());
        assert!(parse_line("{").is_none());
        assert!(parse_line(r#"{"DetectorName":"NpmToken","Raw":"npm_x"}"#).is_some());
    }
}
