// HTTP adapter for the core's TransportPort.
// reason: reqwest for the async HTTP client, with its own connect/read
// timeouts so the engine never has to impose one.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use setlist_core::port::{TransportError, TransportPort, WireResponse};
use setlist_core::protocol::{self, commands};

/// TransportPort implementation backed by a shared reqwest client.
///
/// `base_url` is scheme + host + port without a trailing slash,
/// e.g. `http://192.168.1.100:8080`; codec-built paths are appended as-is.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build the adapter. Fails only on client construction, which is a
    /// hard startup error for the composition root.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|err| TransportError::Config(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TransportPort for ReqwestTransport {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn request(&self, path: &str) -> Result<WireResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!(status, bytes = body.len(), "request completed");
        Ok(WireResponse { body, status })
    }

    async fn connect(&self) -> Result<String, TransportError> {
        // Reachability probe: the cheapest data-returning command.
        let response = self
            .request(&protocol::request_path(&[commands::TRANSPORT]))
            .await?;
        if response.is_ok() {
            Ok(self.base_url.clone())
        } else {
            Err(TransportError::Status(response.status))
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}
