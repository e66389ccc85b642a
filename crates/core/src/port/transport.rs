// Transport Port
// Abstraction over the blocking "send request, get body + status" capability.
// The engine depends only on this narrow contract, never on an HTTP stack.

use async_trait::async_trait;
use thiserror::Error;

/// Raw response from the DAW control endpoint.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub body: String,
    pub status: u16,
}

impl WireResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: 200,
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    #[error("http status {0}")]
    Status(u16),

    #[error("invalid endpoint configuration: {0}")]
    Config(String),
}

/// Transport Port trait
///
/// Implementations:
/// - ReqwestTransport (infra-http): real HTTP client with its own
///   connect/read timeouts
/// - mocks::MockTransport: scripted responses for tests
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Perform one request against the control endpoint.
    ///
    /// `path` is the full request path produced by the protocol codec,
    /// e.g. `/_/TRANSPORT`. A non-2xx status is returned as a normal
    /// `WireResponse`; `Err` is reserved for transport-level failures.
    async fn request(&self, path: &str) -> Result<WireResponse, TransportError>;

    /// Probe DAW reachability. Returns the endpoint address on success.
    async fn connect(&self) -> Result<String, TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted transport for tests.
    ///
    /// Responses are consumed front to back; when the script runs dry the
    /// default body is served (status 200) if one was set, otherwise a
    /// connection error is returned. All requested paths are recorded.
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<WireResponse, TransportError>>>,
        connects: Mutex<VecDeque<Result<String, TransportError>>>,
        requests: Mutex<Vec<String>>,
        default_body: Option<String>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                connects: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                default_body: None,
            }
        }

        /// Serve `body` (status 200) whenever the script is empty.
        pub fn with_default_body(body: impl Into<String>) -> Self {
            let mut mock = Self::new();
            mock.default_body = Some(body.into());
            mock
        }

        pub fn push_body(&self, body: impl Into<String>) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(WireResponse::ok(body)));
        }

        pub fn push_status(&self, status: u16, body: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Ok(WireResponse {
                body: body.into(),
                status,
            }));
        }

        pub fn push_error(&self, error: TransportError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        pub fn push_connect_ok(&self, address: impl Into<String>) {
            self.connects.lock().unwrap().push_back(Ok(address.into()));
        }

        pub fn push_connect_err(&self, error: TransportError) {
            self.connects.lock().unwrap().push_back(Err(error));
        }

        /// Paths requested so far, in order.
        pub fn requested_paths(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TransportPort for MockTransport {
        async fn request(&self, path: &str) -> Result<WireResponse, TransportError> {
            self.requests.lock().unwrap().push(path.to_string());

            if let Some(scripted) = self.responses.lock().unwrap().pop_front() {
                return scripted;
            }
            match &self.default_body {
                Some(body) => Ok(WireResponse::ok(body.clone())),
                None => Err(TransportError::Connection(
                    "no scripted response".to_string(),
                )),
            }
        }

        async fn connect(&self) -> Result<String, TransportError> {
            match self.connects.lock().unwrap().pop_front() {
                Some(scripted) => scripted,
                None => Ok("http://127.0.0.1:8080".to_string()),
            }
        }
    }
}
