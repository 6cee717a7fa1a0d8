//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the agent behind [`crate::ureq_client`].
///
/// Every field has a default, so a partial config file deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UreqConfig {
    /// Upper bound on a whole exchange, including reading the body.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Sent as `user-agent` unless the request already carries one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects to follow (0 = no redirects)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Largest response body read, in bytes. Larger bodies fail the exchange.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: u64,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("pipeclient/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> u32 {
    10
}

fn default_max_body_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for UreqConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl UreqConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_max_body_size(mut self, max_body_size: u64) -> Self {
        self.max_body_size = max_body_size;
        self
    }
}
