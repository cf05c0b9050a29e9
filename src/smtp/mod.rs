//! SMTP mailbox probing.
//!
//! The public entry point is [`probe`], which runs a minimal
//! `EHLO`/`MAIL FROM`/`RCPT TO` dialogue against one exchanger and folds every
//! result (including I/O failures) into an [`SmtpOutcome`]. No message is sent.

mod error;
mod options;
mod probe;
mod session;
mod types;

pub use error::ProbeError;
pub use options::ProbeOptions;
pub use probe::{MailboxProbe, SmtpProber, probe, probe_with_options};
pub use types::{SmtpOutcome, SmtpReply, SmtpStatus, Stage};
