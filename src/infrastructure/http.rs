use crate::config::CheckoutConfig;
use crate::domain::ports::{BackendTransport, HttpResponse};
use crate::error::{CheckoutError, Result, TransportError};
use async_trait::async_trait;
use tracing::debug;

/// The merchant backend over HTTP.
///
/// Cheap to clone: clones share the underlying `reqwest::Client` pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &CheckoutConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CheckoutError::Transport(TransportError::Request(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::NoResponse(err.to_string())
    } else if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl BackendTransport for HttpBackend {
    #[tracing::instrument(skip(self, body), fields(url = %self.url(path)))]
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        debug!(status, "backend responded");

        Ok(HttpResponse { status, body })
    }
}
