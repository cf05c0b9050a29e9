use std::io;

use thiserror::Error;

use super::types::{SmtpReply, Stage};

/// Failures inside a probe session. Folded into an
/// [`SmtpOutcome`](super::SmtpOutcome) before leaving the module.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("{field} must not contain CR or LF")]
    LineBreak { field: &'static str },
    #[error("no socket address available for {host}")]
    NoAddress { host: String },
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error during {stage}: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },
    #[error("session timeout exceeded during {stage}")]
    Deadline { stage: Stage },
    #[error("protocol error during {stage}: {message}")]
    Protocol { stage: Stage, message: String },
    #[error("{stage} rejected: {} {}", .reply.code, .reply.message)]
    Rejected { stage: Stage, reply: SmtpReply },
}

impl ProbeError {
    pub(crate) fn io(stage: Stage, source: io::Error) -> Self {
        Self::Io { stage, source }
    }

    pub(crate) fn protocol(stage: Stage, message: impl Into<String>) -> Self {
        Self::Protocol {
            stage,
            message: message.into(),
        }
    }

    /// Timeouts anywhere in the session and refused connections.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Deadline { .. } => true,
            Self::Connect { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::ConnectionRefused
            ),
            Self::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}
