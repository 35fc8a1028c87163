//! HTTP plumbing shared by the web-backed providers.

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::errors::MarketDataError;

/// Client with the provider's timeout and user agent.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent.to_string())
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GETs `url` and returns the body. Non-2xx statuses become
/// [`MarketDataError::HttpStatus`] tagged with `provider`.
pub(crate) async fn fetch_text(
    client: &Client,
    provider: &str,
    url: &str,
) -> Result<String, MarketDataError> {
    debug!("{} GET {}", provider, url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MarketDataError::from_reqwest(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MarketDataError::HttpStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| MarketDataError::from_reqwest(provider, e))
}
