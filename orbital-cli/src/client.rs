//! HTTP client for the Orbital server

use anyhow::{anyhow, Context, Result};
use orbital_core::{ProgressEntry, SyncBatch, UserId, UserStatsSnapshot};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

const USER_ID_HEADER: &str = "x-user-id";

/// Talks to the server on behalf of one user
pub struct SyncClient {
    base_url: String,
    user: UserId,
    client: Client,
    max_attempts: u32,
    initial_delay: Duration,
}

impl SyncClient {
    pub fn new(base_url: &str, user: UserId) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            client,
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
        })
    }

    #[cfg(test)]
    fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit a snapshot of the device's progress
    pub async fn push(&self, batch: &SyncBatch) -> Result<()> {
        let url = self.url("/api/v1/progress/sync");
        self.send(|| self.client.post(&url).json(batch)).await?;
        Ok(())
    }

    /// The user's authoritative progress
    pub async fn pull(&self) -> Result<Vec<ProgressEntry>> {
        let url = self.url("/api/v1/progress");
        let response = self.send(|| self.client.get(&url)).await?;
        let body: SyncBatch = response
            .json()
            .await
            .context("malformed progress response")?;
        Ok(body.progresses)
    }

    pub async fn stats(&self) -> Result<UserStatsSnapshot> {
        let url = self.url("/api/v1/stats");
        let response = self.send(|| self.client.get(&url)).await?;
        response.json().await.context("malformed stats response")
    }

    /// Send a request, retrying while the server reports a retryable failure
    /// or cannot be reached.
    async fn send<F>(&self, request: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        let mut delay = self.initial_delay;

        loop {
            attempt += 1;
            let last_attempt = attempt >= self.max_attempts;

            let result = request()
                .header(USER_ID_HEADER, self.user.as_str())
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %response.url(), status = %response.status(), "request succeeded");
                    return Ok(response);
                }
                Ok(response)
                    if response.status() == StatusCode::SERVICE_UNAVAILABLE && !last_attempt =>
                {
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "server unavailable, retrying");
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(anyhow!("HTTP {}: {}", status, body));
                }
                Err(e) if (e.is_connect() || e.is_timeout()) && !last_attempt => {
                    warn!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "request failed, retrying");
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("could not reach server at {}", self.base_url)));
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Server answering each request with the next status, repeating the last one
    async fn scripted_server(statuses: Vec<StatusCode>) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let statuses = Arc::new(statuses);

        let counter = hits.clone();
        let app = Router::new().fallback(move |headers: HeaderMap| {
            let counter = counter.clone();
            let statuses = statuses.clone();
            async move {
                assert_eq!(headers.get(USER_ID_HEADER).unwrap(), "alice");
                let n = counter.fetch_add(1, Ordering::SeqCst);
                statuses[n.min(statuses.len() - 1)]
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        (format!("http://{}", addr), hits)
    }

    fn client(base_url: &str) -> SyncClient {
        SyncClient::new(base_url, UserId::new("alice"))
            .unwrap()
            .with_initial_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_push_retries_unavailable_server() {
        let (url, hits) = scripted_server(vec![
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::NO_CONTENT,
        ])
        .await;

        client(&url).push(&SyncBatch::default()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_push_gives_up_after_three_attempts() {
        let (url, hits) = scripted_server(vec![StatusCode::SERVICE_UNAVAILABLE]).await;

        let err = client(&url).push(&SyncBatch::default()).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rejected_request_is_not_retried() {
        let (url, hits) = scripted_server(vec![StatusCode::BAD_REQUEST]).await;

        let err = client(&url).push(&SyncBatch::default()).await.unwrap_err();
        assert!(err.to_string().contains("400"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = SyncClient::new("http://localhost:3000/", UserId::new("alice")).unwrap();
        assert_eq!(
            client.url("/api/v1/stats"),
            "http://localhost:3000/api/v1/stats"
        );
    }
}
