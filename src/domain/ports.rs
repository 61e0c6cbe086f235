use crate::domain::model::{CheckResult, CredentialEntry, Service};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 單一服務的憑證檢查器
#[async_trait]
pub trait CredentialChecker: Send + Sync {
    fn service(&self) -> Service;

    /// 在送出任何請求前檢查必要欄位
    fn validate(&self, entry: &CredentialEntry) -> Result<()>;

    /// dry run 用：描述將送出的請求，不含任何秘密值
    fn describe(&self, entry: &CredentialEntry) -> String;

    /// 送出服務專屬的請求並分類回應。網路失敗回報為 NetworkError，不會回傳 Err。
    async fn check(&self, entry: &CredentialEntry) -> CheckResult;
}
