use std::fmt;

use chrono::{DateTime, Utc};

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Coarse verdict. `Unknown` means "retry later or accept provisionally",
/// never a rejection.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Valid,
    Invalid,
    Unknown,
}

impl Verdict {
    /// Legacy numeric alias: 1 valid, 3 invalid, 6 unknown.
    pub fn code(self) -> u8 {
        match self {
            Self::Valid => 1,
            Self::Invalid => 3,
            Self::Unknown => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained reason; each value belongs to exactly one [`Verdict`].
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResult {
    /// Placeholder before any stage ran; never returned by the pipeline.
    InitialState,
    InvalidSyntax,
    TypoDetected,
    DomainResolutionFailed,
    DomainHasNoMx,
    MailboxExists,
    MailboxDoesNotExist,
    Greylisted,
    ConnectionError,
}

impl SubResult {
    pub fn verdict(self) -> Verdict {
        match self {
            Self::MailboxExists => Verdict::Valid,
            Self::InvalidSyntax
            | Self::TypoDetected
            | Self::DomainResolutionFailed
            | Self::DomainHasNoMx
            | Self::MailboxDoesNotExist => Verdict::Invalid,
            Self::InitialState | Self::Greylisted | Self::ConnectionError => Verdict::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialState => "initial_state",
            Self::InvalidSyntax => "invalid_syntax",
            Self::TypoDetected => "typo_detected",
            Self::DomainResolutionFailed => "domain_resolution_failed",
            Self::DomainHasNoMx => "domain_has_no_mx",
            Self::MailboxExists => "mailbox_exists",
            Self::MailboxDoesNotExist => "mailbox_does_not_exist",
            Self::Greylisted => "greylisted",
            Self::ConnectionError => "connection_error",
        }
    }
}

impl fmt::Display for SubResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one [`verify_email`](crate::verify_email) call.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub email: String,
    pub result: Verdict,
    #[cfg_attr(feature = "with-serde", serde(rename = "resultcode"))]
    pub result_code: u8,
    pub subresult: SubResult,
    pub domain: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(rename = "mxRecords"))]
    pub mx_records: Vec<String>,
    /// Seconds, millisecond precision.
    #[cfg_attr(feature = "with-serde", serde(rename = "executiontime"))]
    pub execution_time: f64,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[cfg_attr(feature = "with-serde", serde(rename = "didyoumean"))]
    pub did_you_mean: Option<String>,
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        self.result == Verdict::Valid
    }

    pub fn is_invalid(&self) -> bool {
        self.result == Verdict::Invalid
    }
}

/// Terminal state reached by the pipeline, before timing is attached.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Terminal {
    pub(crate) subresult: SubResult,
    pub(crate) domain: Option<String>,
    pub(crate) mx_records: Vec<String>,
    pub(crate) error: Option<String>,
    pub(crate) did_you_mean: Option<String>,
}

impl Terminal {
    pub(crate) fn new(subresult: SubResult, domain: Option<&str>) -> Self {
        Self {
            subresult,
            domain: domain.map(str::to_string),
            mx_records: Vec::new(),
            error: None,
            did_you_mean: None,
        }
    }

    pub(crate) fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub(crate) fn mx_records(mut self, records: Vec<String>) -> Self {
        self.mx_records = records;
        self
    }

    pub(crate) fn did_you_mean(mut self, suggestion: String) -> Self {
        self.did_you_mean = Some(suggestion);
        self
    }

    /// Stamps the verdict with elapsed seconds (rounded to ms) and the current time.
    pub(crate) fn finish(self, email: &str, elapsed: std::time::Duration) -> VerificationResult {
        let verdict = self.subresult.verdict();
        VerificationResult {
            email: email.to_string(),
            result: verdict,
            result_code: verdict.code(),
            subresult: self.subresult,
            domain: self.domain,
            mx_records: self.mx_records,
            execution_time: round_millis(elapsed.as_secs_f64()),
            error: self.error,
            timestamp: Utc::now(),
            did_you_mean: self.did_you_mean,
        }
    }
}

fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
