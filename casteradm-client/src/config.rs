use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:2101";
pub const DEFAULT_USER_AGENT: &str = concat!("casteradm/", env!("CARGO_PKG_VERSION"));

/// Connection settings for `AdminClient`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server origin, the API prefix is appended to it
    pub server: String,
    /// No timeout by default: a request runs until it completes or fails
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
