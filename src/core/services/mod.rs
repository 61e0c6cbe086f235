pub mod aws;
pub mod cloudflare;
pub mod github;
pub mod npm;
pub mod stripe;
pub mod zoho;

pub use aws::AwsChecker;
pub use cloudflare::CloudflareChecker;
pub use github::GithubChecker;
pub use npm::NpmChecker;
pub use stripe::StripeChecker;
pub use zoho::ZohoChecker;

use crate::core::http::{Endpoints, HttpSettings};
use crate::domain::ports::CredentialChecker;
use crate::utils::error::Result;

/// 建立所有服務的檢查器，共用同一個 HTTP client
pub fn default_checkers(
    endpoints: &Endpoints,
    settings: &HttpSettings,
) -> Result<Vec<Box<dyn CredentialChecker>>> {
    let client = settings.build_client()?;

    let checkers: Vec<Box<dyn CredentialChecker>> = vec![
        Box::new(ZohoChecker::new(
            client.clone(),
            endpoints.zoho_accounts.clone(),
            endpoints.zoho_api.clone(),
        )),
        Box::new(AwsChecker::new(endpoints.aws.clone(), settings.timeout)),
        Box::new(StripeChecker::new(client.clone(), endpoints.stripe.clone())),
        Box::new(NpmChecker::new(client.clone(), endpoints.npm.clone())),
        Box::new(CloudflareChecker::new(client.clone(), endpoints.cloudflare.clone())),
        Box::new(GithubChecker::new(client, endpoints.github.clone())),
    ];
    Ok(checkers)
}
