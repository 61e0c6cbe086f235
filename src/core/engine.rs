use crate::core::http::{Endpoints, HttpSettings};
use crate::core::services::default_checkers;
use crate::domain::model::{CheckResult, CredentialEntry, Service};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::{CredCheckError, Result};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;

/// 依服務分派憑證到對應的檢查器
pub struct CheckEngine {
    checkers: HashMap<Service, Box<dyn CredentialChecker>>,
    concurrency: usize,
}

impl CheckEngine {
    pub fn new(endpoints: &Endpoints, settings: &HttpSettings) -> Result<Self> {
        let mut engine = Self {
            checkers: HashMap::new(),
            concurrency: settings.concurrency.max(1),
        };
        for checker in default_checkers(endpoints, settings)? {
            engine.register(checker);
        }
        Ok(engine)
    }

    /// 註冊或取代某服務的檢查器
    pub fn register(&mut self, checker: Box<dyn CredentialChecker>) {
        self.checkers.insert(checker.service(), checker);
    }

    fn checker(&self, service: Service) -> Result<&dyn CredentialChecker> {
        self.checkers
            .get(&service)
            .map(|checker| checker.as_ref())
            .ok_or_else(|| CredCheckError::UnknownService {
                name: service.to_string(),
            })
    }

    /// 只驗證欄位，不發出請求。錯誤會帶上憑證的 label 與 detector。
    pub fn validate(&self, entry: &CredentialEntry) -> Result<()> {
        self.checker(entry.service())?
            .validate(entry)
            .map_err(|e| e.with_origin(entry.label(), entry.detector()))
    }

    /// dry run：驗證後回傳預計送出的請求
    pub fn plan(&self, entry: &CredentialEntry) -> Result<String> {
        self.validate(entry)?;
        Ok(self.checker(entry.service())?.describe(entry))
    }

    pub async fn check(&self, entry: &CredentialEntry) -> Result<CheckResult> {
        let checker = self.checker(entry.service())?;
        if let Err(e) = self.validate(entry) {
            tracing::warn!("⚠️ {}: {}", entry.service(), e);
            return Err(e);
        }

        tracing::debug!(
            "🔍 Checking {} credential{}",
            entry.service(),
            entry.label().map(|l| format!(" ({})", l)).unwrap_or_default()
        );
        let result = checker
            .check(entry)
            .await
            .with_label(entry.label())
            .with_detector(entry.detector());
        tracing::info!(
            "{} {} -> {}{}",
            if result.is_valid() { "✅" } else { "❌" },
            result.service,
            result.outcome,
            result.status.map(|s| format!(" ({})", s)).unwrap_or_default()
        );
        Ok(result)
    }

    /// 以有限並發檢查全部憑證，結果順序與輸入相同
    pub async fn check_all(&self, entries: &[CredentialEntry]) -> Vec<Result<CheckResult>> {
        tracing::info!(
            "🚀 Checking {} credential(s) with concurrency {}",
            entries.len(),
            self.concurrency
        );

        stream::iter(entries)
            .map(|entry| self.check(entry))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{aux, Outcome};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct MockChecker {
        service: Service,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CredentialChecker for MockChecker {
        fn service(&self) -> Service {
            self.service
        }

        fn validate(&self, entry: &CredentialEntry) -> Result<()> {
            crate::utils::validation::validate_secret(self.service, "secret", entry.secret())
        }

        fn describe(&self, _entry: &CredentialEntry) -> String {
            format!("mock {}", self.service)
        }

        async fn check(&self, entry: &CredentialEntry) -> CheckResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // 越短的秘密越晚完成，用來確認輸出順序
            tokio::time::sleep(Duration::from_millis(20 / entry.secret().len() as u64)).await;
            if entry.secret().starts_with("good") {
                CheckResult::valid(self.service, 200)
            } else {
                CheckResult::invalid(self.service, Some(401))
            }
        }
    }

    fn engine_with_mock(calls: Arc<AtomicUsize>) -> CheckEngine {
        let mut engine = CheckEngine::new(&Endpoints::default(), &HttpSettings::default()).unwrap();
        engine.register(Box::new(MockChecker {
            service: Service::Github,
            calls,
        }));
        engine
    }

    #[tokio::test]
    async fn test_malformed_entry_makes_no_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with_mock(calls.clone());

        let result = engine.check(&CredentialEntry::new(Service::Github, "  ")).await;
        assert!(matches!(result, Err(CredCheckError::MalformedConfig { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_entry_keeps_label_and_detector() {
        let engine = CheckEngine::new(&Endpoints::default(), &HttpSettings::default()).unwrap();
        let entry = CredentialEntry::new(Service::Zoho, "1000.refresh")
            .with_label("https://github.com/acme/crm/blob/1/.env#L2")
            .with_detector("ZohoCRM");

        let err = engine.check(&entry).await.unwrap_err();
        assert!(matches!(err, CredCheckError::MalformedConfig { .. }));
        assert_eq!(err.label(), Some("https://github.com/acme/crm/blob/1/.env#L2"));
        assert_eq!(err.detector(), Some("ZohoCRM"));
    }

    #[tokio::test]
    async fn test_check_carries_detector() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with_mock(calls);

        let entry = CredentialEntry::new(Service::Github, "good-token").with_detector("Github");
        let result = engine.check(&entry).await.unwrap();
        assert_eq!(result.detector.as_deref(), Some("Github"));
    }

    #[tokio::test]
    async fn test_plan_describes_requests_without_sending() {
        let server = httpmock::MockServer::start_async().await;
        let catch_all = server
            .mock_async(|when, then| {
                when.path_contains("/");
                then.status(200);
            })
            .await;
        let base = server.base_url();
        let engine =
            CheckEngine::new(&Endpoints::single_host(&base), &HttpSettings::default()).unwrap();

        let zoho = CredentialEntry::new(Service::Zoho, "1000.refresh")
            .with_aux(aux::CLIENT_ID, "id")
            .with_aux(aux::CLIENT_SECRET, "secret");
        assert_eq!(
            engine.plan(&zoho).unwrap(),
            format!("POST {base}/oauth/v2/token → GET {base}/crm/v4/organizations")
        );

        let aws = CredentialEntry::new(Service::Aws, "wJalr").with_aux(aux::ACCESS_KEY_ID, "AKIA");
        assert!(engine.plan(&aws).unwrap().starts_with(&format!("ListBuckets {base}")));

        let github = engine
            .plan(&CredentialEntry::new(Service::Github, "ghp_plan_only"))
            .unwrap();
        assert!(github.contains(&format!("{base}/user")));
        assert!(!github.contains("ghp_plan_only"));

        let cloudflare = engine
            .plan(&CredentialEntry::new(Service::Cloudflare, "cf"))
            .unwrap();
        assert!(cloudflare.contains("/client/v4/user/tokens/verify"));

        assert!(engine.plan(&CredentialEntry::new(Service::Npm, "")).is_err());

        catch_all.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_check_all_preserves_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = engine_with_mock(calls.clone());

        let entries = vec![
            CredentialEntry::new(Service::Github, "b").with_label("first"),
            CredentialEntry::new(Service::Github, "good-token-long").with_label("second"),
            CredentialEntry::new(Service::Github, ""),
        ];
        let results = engine.check_all(&entries).await;

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.outcome, Outcome::Invalid);
        assert_eq!(first.label.as_deref(), Some("first"));
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.outcome, Outcome::Valid);
        assert_eq!(second.label.as_deref(), Some("second"));
        assert!(results[2].is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_engine_registers_every_service() {
        let engine = CheckEngine::new(&Endpoints::default(), &HttpSettings::default()).unwrap();
        for service in Service::ALL {
            assert!(engine.checker(service).is_ok());
        }
    }
}
