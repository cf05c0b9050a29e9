use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Dialogue step, used in diagnostics.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Greeting,
    Helo,
    MailFrom,
    RcptTo,
    Quit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Helo => "HELO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Quit => "QUIT",
        })
    }
}

/// A raw SMTP reply, preserving the numeric status code and message text.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// Normalized verdict of one probe.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpStatus {
    /// RCPT answered 2xx.
    Accepted,
    /// RCPT answered 550.
    Rejected,
    /// RCPT answered 450, 451 or 452.
    Greylisted,
    Timeout,
    Error,
}

impl SmtpStatus {
    /// Numeric form of the status, when it has one (250, 550, 450).
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Accepted => Some(250),
            Self::Rejected => Some(550),
            Self::Greylisted => Some(450),
            Self::Timeout | Self::Error => None,
        }
    }
}

impl fmt::Display for SmtpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{code}"),
            None if *self == Self::Timeout => f.write_str("timeout"),
            None => f.write_str("error"),
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpOutcome {
    pub status: SmtpStatus,
    pub message: String,
    /// `[host] C: ...` / `[host] S: ...` lines, for diagnostics only.
    pub transcript: Vec<String>,
}

impl SmtpOutcome {
    pub fn new(status: SmtpStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            transcript: Vec::new(),
        }
    }

    pub fn accepted() -> Self {
        Self::new(SmtpStatus::Accepted, "Mailbox exists")
    }

    pub fn rejected() -> Self {
        Self::new(SmtpStatus::Rejected, "Mailbox does not exist")
    }

    pub fn greylisted() -> Self {
        Self::new(SmtpStatus::Greylisted, "Greylisted / Temporary failure")
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SmtpStatus::Timeout, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(SmtpStatus::Error, message)
    }

    pub(crate) fn with_transcript(mut self, transcript: Vec<String>) -> Self {
        self.transcript = transcript;
        self
    }
}
