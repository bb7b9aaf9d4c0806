//! Configuration options for the artbox client

use std::time::Duration;

/// Configuration options for the artbox client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout for remote store calls
    pub request_timeout: Option<Duration>,

    /// The table backing the image collection
    pub table: String,

    /// Whether demo content may be shown when every real tier fails
    pub demo_fallback: bool,

    /// Simulated latency of the placeholder generator (kept under two
    /// seconds so loading states stay exercisable but tolerable)
    pub generation_latency: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            table: "images".to_string(),
            demo_fallback: true,
            generation_latency: Duration::from_millis(1200),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the backing table name
    pub fn with_table(mut self, value: &str) -> Self {
        self.table = value.to_string();
        self
    }

    /// Set whether demo content is substituted on total tier failure
    pub fn with_demo_fallback(mut self, value: bool) -> Self {
        self.demo_fallback = value;
        self
    }

    /// Set the simulated generation latency
    pub fn with_generation_latency(mut self, value: Duration) -> Self {
        self.generation_latency = value;
        self
    }
}
