use anyhow::Result;
use reqwest::{header, Client};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Creates an HTTP client with browser-like headers, a custom user agent
/// and a bounded per-request timeout
pub fn create_http_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.5")
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        header::HeaderValue::from_static("gzip, deflate")
    );
    headers.insert(
        header::CONNECTION,
        header::HeaderValue::from_static("keep-alive")
    );
    headers.insert(
        "Upgrade-Insecure-Requests",
        header::HeaderValue::from_static("1")
    );

    let client = Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    Ok(client)
}

/// Shared fetch layer for all source clients during one search: one reqwest
/// client plus a semaphore capping total in-flight requests across sources.
pub struct FetchTransport {
    client: Client,
    permits: Arc<Semaphore>,
}

impl FetchTransport {
    pub fn new(user_agent: &str, timeout_secs: u64, max_concurrent_requests: usize) -> Result<Self> {
        Ok(Self {
            client: create_http_client(user_agent, timeout_secs)?,
            permits: Arc::new(Semaphore::new(max_concurrent_requests)),
        })
    }

    /// Fetches a page and returns its body, or None on any failure.
    ///
    /// Non-200 statuses, timeouts and network errors are all logged and
    /// collapsed into None so one dead source cannot abort a fan-out.
    pub async fn get_page(&self, url: &str) -> Option<String> {
        // Closed only if the semaphore is dropped, which we never do
        let _permit = self.permits.acquire().await.ok()?;

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::warn!("HTTP {} for {}", status, url);
                    return None;
                }
                match response.text().await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        tracing::error!("Error reading body from {}: {}", url, e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::error!("Error fetching {}: {}", url, e);
                None
            }
        }
    }
}
