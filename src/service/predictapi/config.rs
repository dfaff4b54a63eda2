use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, `/predict` is appended to it.
    pub base_url: String,
    /// Transport timeout. `None` waits for as long as the connection stays open.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.trimmed_base_url())
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.trimmed_base_url())
    }

    fn trimmed_base_url(&self) -> &str {
        self.base_url.strip_suffix('/').unwrap_or(&self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
