use std::net::{SocketAddr, ToSocketAddrs};

use super::error::ProbeError;
use super::options::ProbeOptions;
use super::session::{Deadline, SmtpSession};
use super::types::{SmtpOutcome, SmtpReply, Stage};

/// Asks one mail exchanger whether it would accept mail for an address.
pub trait MailboxProbe {
    fn probe(&self, host: &str, email: &str) -> SmtpOutcome;
}

/// [`MailboxProbe`] speaking SMTP over TCP.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    options: ProbeOptions,
}

impl SmtpProber {
    pub fn new(options: ProbeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }
}

impl MailboxProbe for SmtpProber {
    fn probe(&self, host: &str, email: &str) -> SmtpOutcome {
        probe_with_options(host, email, &self.options)
    }
}

/// Probes `host` for `email` with [`ProbeOptions::default`].
pub fn probe(host: &str, email: &str) -> SmtpOutcome {
    probe_with_options(host, email, &ProbeOptions::default())
}

/// Single attempt against a single host; never fails, every error becomes an
/// outcome with status `Timeout` or `Error`.
pub fn probe_with_options(host: &str, email: &str, options: &ProbeOptions) -> SmtpOutcome {
    let deadline = Deadline::after(options.timeout());
    let mut transcript = Vec::new();

    let outcome = match run_session(host, email, options, deadline, &mut transcript) {
        Ok(outcome) => outcome,
        Err(err) if err.is_timeout() => SmtpOutcome::timeout(err.to_string()),
        Err(err) => SmtpOutcome::error(err.to_string()),
    };
    tracing::debug!(host, status = %outcome.status, message = %outcome.message, "SMTP probe finished");
    outcome.with_transcript(transcript)
}

fn run_session(
    host: &str,
    email: &str,
    options: &ProbeOptions,
    deadline: Deadline,
    transcript: &mut Vec<String>,
) -> Result<SmtpOutcome, ProbeError> {
    reject_line_breaks("recipient", email)?;
    reject_line_breaks("HELO domain", &options.helo_domain)?;
    reject_line_breaks("sender", &options.mail_from)?;

    let addrs = resolve_socket_addrs(host, options.port)?;
    let mut session = SmtpSession::connect(host, &addrs, deadline)?;

    let outcome = converse(&mut session, email, options);

    // the outcome is already fixed; QUIT can only fail quietly
    if let Err(err) = session.close() {
        tracing::debug!(host, error = %err, "QUIT failed, ignoring");
    }
    transcript.append(&mut session.take_transcript());
    outcome
}

fn converse(
    session: &mut SmtpSession,
    email: &str,
    options: &ProbeOptions,
) -> Result<SmtpOutcome, ProbeError> {
    let greeting = session.read_reply(Stage::Greeting)?;
    expect_positive(Stage::Greeting, greeting)?;

    let ehlo = session.command(&options.helo_command("EHLO"), Stage::Helo)?;
    if !ehlo.is_positive_completion() {
        // serveurs sans ESMTP
        let helo = session.command(&options.helo_command("HELO"), Stage::Helo)?;
        expect_positive(Stage::Helo, helo)?;
    }

    let mail = session.command(&options.mail_from_command(), Stage::MailFrom)?;
    expect_positive(Stage::MailFrom, mail)?;

    let rcpt = session.command(&format!("RCPT TO:<{email}>"), Stage::RcptTo)?;
    Ok(classify_rcpt(&rcpt))
}

// each argument ends up inside a single command line
fn reject_line_breaks(field: &'static str, value: &str) -> Result<(), ProbeError> {
    if value.contains(['\r', '\n']) {
        return Err(ProbeError::LineBreak { field });
    }
    Ok(())
}

fn classify_rcpt(reply: &SmtpReply) -> SmtpOutcome {
    match reply.code {
        200..=299 => SmtpOutcome::accepted(),
        550 => SmtpOutcome::rejected(),
        450..=452 => SmtpOutcome::greylisted(),
        code => SmtpOutcome::error(format!("{code} {}", reply.message)),
    }
}

fn expect_positive(stage: Stage, reply: SmtpReply) -> Result<(), ProbeError> {
    if reply.is_positive_completion() {
        Ok(())
    } else {
        Err(ProbeError::Rejected { stage, reply })
    }
}

fn resolve_socket_addrs(host: &str, port: u16) -> Result<Vec<SocketAddr>, ProbeError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| ProbeError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();
    if addrs.is_empty() {
        return Err(ProbeError::NoAddress {
            host: host.to_string(),
        });
    }
    Ok(addrs)
}
