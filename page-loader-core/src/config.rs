use crate::error::{MirrorError, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;

/// HTTP settings shared by the page request and every asset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    pub connect_timeout: Duration,
    /// Maximum idle time between reads of a response body.
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl MirrorConfig {
    pub fn with_timeouts(connect_secs: u64, read_secs: u64) -> Self {
        Self {
            connect_timeout: Duration::from_secs(connect_secs),
            read_timeout: Duration::from_secs(read_secs),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn build_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()
            .map_err(MirrorError::ClientSetup)
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            user_agent: concat!("page-loader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
