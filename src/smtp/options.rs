use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Configuration knobs for [`probe_with_options`](super::probe_with_options).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    /// Budget for the whole session, connect included.
    pub timeout_ms: u64,
    pub helo_domain: String,
    pub mail_from: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            timeout_ms: 10_000,
            helo_domain: "verifier.local".to_string(),
            mail_from: "verify@example.com".to_string(),
        }
    }
}

impl ProbeOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn helo_command(&self, verb: &str) -> String {
        let name = self.helo_domain.trim();
        if name.is_empty() {
            format!("{verb} localhost")
        } else {
            format!("{verb} {name}")
        }
    }

    /// Null reverse-path when no sender is configured.
    pub fn mail_from_command(&self) -> String {
        format!("MAIL FROM:<{}>", self.mail_from.trim())
    }
}
