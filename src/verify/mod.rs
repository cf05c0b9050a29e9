//! Verification pipeline: syntax → typo → MX → SMTP, first terminal stage wins.
//!
//! Every path ends in a [`VerificationResult`]; nothing here returns an error.
//!
//! ```no_run
//! use mailverify_lib::{Verdict, verify_email};
//!
//! let result = verify_email("someone@example.com");
//! if result.result == Verdict::Unknown {
//!     // greylisted or unreachable: accept provisionally
//! }
//! ```

mod options;
mod types;

#[cfg(feature = "with-config")]
pub use options::ConfigError;
pub use options::VerifyOptions;
pub use types::{SubResult, Verdict, VerificationResult};

use std::time::Instant;

use crate::mx::{self, LookupMx, MxStatus, SystemResolver};
use crate::smtp::{MailboxProbe, SmtpProber, SmtpStatus};
use crate::syntax::{check_syntax, domain_of};
use crate::typo::suggest_correction_with;

use types::Terminal;

const SYNTAX_ERROR: &str = "Email syntax is invalid";
const NO_MX_ERROR: &str = "No MX records found for domain";
const TIMEOUT_ERROR: &str = "Connection timed out";

/// Verifies `email` with the system resolver, a live SMTP probe and default options.
pub fn verify_email(email: &str) -> VerificationResult {
    verify_email_with_options(email, &VerifyOptions::default())
}

pub fn verify_email_with_options(email: &str, options: &VerifyOptions) -> VerificationResult {
    Verifier::system(options.clone()).verify(email)
}

/// Runs the pipeline against injectable DNS and SMTP collaborators.
///
/// Holds no per-call state: one `Verifier` can serve concurrent calls from
/// several threads when `R` and `P` are `Sync`.
#[derive(Debug, Clone)]
pub struct Verifier<R, P> {
    resolver: R,
    prober: P,
    options: VerifyOptions,
}

impl Verifier<SystemResolver, SmtpProber> {
    pub fn system(options: VerifyOptions) -> Self {
        let prober = SmtpProber::new(options.probe.clone());
        Self {
            resolver: SystemResolver,
            prober,
            options,
        }
    }
}

impl<R, P> Verifier<R, P>
where
    R: LookupMx,
    P: MailboxProbe,
{
    pub fn new(resolver: R, prober: P) -> Self {
        Self {
            resolver,
            prober,
            options: VerifyOptions::default(),
        }
    }

    /// Replaces the options. The probe timeout/identity only reach a prober
    /// that reads them, such as one built by [`Verifier::system`].
    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    pub fn verify(&self, email: &str) -> VerificationResult {
        let started = Instant::now();
        let span = tracing::debug_span!("verify", email);
        let _guard = span.enter();

        let terminal = self.run(email);
        let result = terminal.finish(email, started.elapsed());
        tracing::info!(
            result = %result.result,
            subresult = %result.subresult,
            execution_time = result.execution_time,
            "verification finished"
        );
        result
    }

    fn run(&self, email: &str) -> Terminal {
        if let Err(reason) = check_syntax(email) {
            tracing::debug!(%reason, "syntax check failed");
            return Terminal::new(SubResult::InvalidSyntax, None).error(SYNTAX_ERROR);
        }
        let Some(domain) = domain_of(email) else {
            return Terminal::new(SubResult::InvalidSyntax, None).error(SYNTAX_ERROR);
        };
        let at = |subresult| Terminal::new(subresult, Some(domain));

        if let Some(suggestion) = suggest_correction_with(email, &self.options.reference_domains) {
            tracing::debug!(%suggestion, "provider typo detected");
            let message = format!("Possible typo detected. Did you mean {suggestion}?");
            return at(SubResult::TypoDetected)
                .did_you_mean(suggestion)
                .error(message);
        }

        let hosts = match mx::resolve_with(&self.resolver, domain) {
            Ok(status @ MxStatus::Records(_)) => status.exchanges(),
            Ok(MxStatus::NoRecords) => {
                tracing::debug!(domain, "domain advertises no MX");
                return at(SubResult::DomainHasNoMx).error(NO_MX_ERROR);
            }
            Err(err) => {
                tracing::warn!(domain, error = %err, "MX resolution failed");
                return at(SubResult::DomainResolutionFailed).error(err.to_string());
            }
        };
        let Some(primary) = hosts.first() else {
            return at(SubResult::DomainHasNoMx).error(NO_MX_ERROR);
        };
        tracing::debug!(?hosts, primary, "MX resolved, probing primary exchanger");

        // un seul essai, sur le MX de plus haute priorité
        let outcome = self.prober.probe(primary, email);
        let terminal = match outcome.status {
            SmtpStatus::Accepted => at(SubResult::MailboxExists),
            SmtpStatus::Rejected => at(SubResult::MailboxDoesNotExist),
            SmtpStatus::Greylisted => at(SubResult::Greylisted),
            SmtpStatus::Timeout => at(SubResult::ConnectionError).error(TIMEOUT_ERROR),
            SmtpStatus::Error => at(SubResult::ConnectionError).error(outcome.message),
        };
        terminal.mx_records(hosts)
    }
}

#[cfg(test)]
mod tests;
