// File: src/client/core.rs
use crate::client::redirect::FollowRedirectLayer;
use crate::config::Config;
use crate::error::ScrapeError;

use http::{Request, Uri, header};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tower::ServiceExt;
use tower_layer::Layer;

pub const MAX_REDIRECTS: usize = 5;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

/// How many times to try, how long each try may take, and the first pause
/// between tries (doubled after every failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout: Duration,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempts: config.retries.max(1),
            timeout: config.timeout(),
            initial_delay: config.initial_retry_delay(),
        }
    }

    /// Pause after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(60),
            initial_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PageClient {
    http: HttpsClient,
    policy: RetryPolicy,
}

impl PageClient {
    pub fn new(policy: RetryPolicy) -> Result<Self, String> {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        for err in &result.errors {
            log::debug!("Skipping native certificate: {}", err);
        }
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            log::warn!("No system certificates found; only plain http pages can be fetched.");
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http: HttpsClient = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self { http, policy })
    }

    /// GETs `url`, retrying with exponential backoff.
    ///
    /// Every failure is logged as a warning; only the last one is returned.
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let fail = |attempts: u32, reason: String| ScrapeError::Fetch {
            url: url.to_string(),
            attempts,
            reason,
        };
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| fail(0, e.to_string()))?;

        let mut last_error = String::new();
        for attempt in 1..=self.policy.attempts {
            match self.fetch_once(&uri).await {
                Ok(body) => {
                    log::info!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    log::warn!("Attempt {} failed: {}", attempt, e);
                    last_error = e;
                }
            }
            if attempt < self.policy.attempts {
                tokio::time::sleep(self.policy.delay_after(attempt)).await;
            }
        }
        Err(fail(self.policy.attempts, last_error))
    }

    async fn fetch_once(&self, uri: &Uri) -> Result<String, String> {
        let request = Request::get(uri)
            .header(
                header::USER_AGENT,
                concat!("termdates/", env!("CARGO_PKG_VERSION")),
            )
            .body(String::new())
            .map_err(|e| e.to_string())?;

        let service = FollowRedirectLayer::new(MAX_REDIRECTS).layer(self.http.clone());
        let exchange = async move {
            let response = service.oneshot(request).await.map_err(|e| e.to_string())?;
            let status = response.status();
            if !status.is_success() {
                return Err(format!("HTTP {}", status));
            }
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| e.to_string())?
                .to_bytes();
            Ok::<String, String>(String::from_utf8_lossy(&bytes).into_owned())
        };

        tokio::time::timeout(self.policy.timeout, exchange)
            .await
            .map_err(|_| format!("timed out after {:?}", self.policy.timeout))?
    }
}
