use anyhow::Result;
#[cfg(not(feature = "with-serde"))]
use anyhow::bail;

use mailverify_lib::{MxStatus, SmtpOutcome, Verdict, VerificationResult};

use crate::args::OutputFormat;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct SyntaxReport {
    pub email: String,
    pub valid: bool,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reason: Option<String>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct SuggestionReport {
    pub email: String,
    #[cfg_attr(feature = "with-serde", serde(rename = "didyoumean"))]
    pub did_you_mean: Option<String>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct MxReport {
    pub domain: String,
    pub status: MxStatus,
}

pub fn human_verification(result: &VerificationResult) -> String {
    let tag = match result.result {
        Verdict::Valid => "[VALID]  ",
        Verdict::Invalid => "[INVALID]",
        Verdict::Unknown => "[UNKNOWN]",
    };
    let mut lines = vec![format!("{tag} {} :: {}", result.email, result.subresult)];
    if let Some(suggestion) = &result.did_you_mean {
        lines.push(format!("  did you mean: {suggestion}"));
    }
    if let Some(domain) = &result.domain {
        lines.push(format!("  domain: {domain}"));
    }
    if !result.mx_records.is_empty() {
        lines.push(format!("  mx: {}", result.mx_records.join(", ")));
    }
    if let Some(error) = &result.error {
        lines.push(format!("  error: {error}"));
    }
    lines.push(format!("  time: {:.3}s", result.execution_time));
    lines.join("\n")
}

pub fn human_syntax(report: &SyntaxReport) -> String {
    match (&report.reason, report.valid) {
        (_, true) => format!("[OK]      {}", report.email),
        (Some(reason), false) => format!("[INVALID] {} :: {reason}", report.email),
        (None, false) => format!("[INVALID] {}", report.email),
    }
}

pub fn human_suggestion(report: &SuggestionReport) -> String {
    match &report.did_you_mean {
        Some(suggestion) => format!("did you mean {suggestion}?"),
        None => "no suggestion".to_string(),
    }
}

pub fn human_mx(report: &MxReport) -> String {
    match &report.status {
        MxStatus::NoRecords => format!("{}: no MX records", report.domain),
        MxStatus::Records(records) => records
            .iter()
            .map(|record| format!("{:>5} {}", record.priority, record.exchange))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn human_outcome(outcome: &SmtpOutcome) -> String {
    let mut lines = vec![format!("Result: {} ({})", outcome.status, outcome.message)];
    if !outcome.transcript.is_empty() {
        lines.push("Evidence:".to_string());
        lines.extend(outcome.transcript.iter().map(|line| format!("  {line}")));
    }
    lines.join("\n")
}

/// Prints `value` as pretty JSON or through `human`.
#[cfg(feature = "with-serde")]
pub fn emit<T, F>(format: OutputFormat, value: &T, human: F) -> Result<()>
where
    T: serde::Serialize,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Human => println!("{}", human(value)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
pub fn emit<T, F>(format: OutputFormat, value: &T, human: F) -> Result<()>
where
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Human => println!("{}", human(value)),
        OutputFormat::Json => bail!("format=json nécessite la feature 'with-serde'"),
    }
    Ok(())
}
