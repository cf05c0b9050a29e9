#![forbid(unsafe_code)]
//! mailverify_lib : vérifie qu'une adresse e-mail est probablement délivrable,
//! sans envoyer de message.
//!
//! The pipeline runs [`syntax`] → [`typo`] → [`mx`] → [`smtp`] and stops at the
//! first stage that can decide; see [`verify_email`].

pub mod mx;
pub mod smtp;
pub mod syntax;
pub mod typo;
pub mod verify;

pub use mx::{Error as ResolutionError, LookupMx, MxRecord, MxStatus, SystemResolver, check_mx, resolve_mx};
pub use smtp::{
    MailboxProbe, ProbeError, ProbeOptions, SmtpOutcome, SmtpProber, SmtpReply, SmtpStatus, probe,
    probe_with_options,
};
pub use syntax::{SyntaxError, check_syntax, is_valid_syntax};
pub use typo::{DEFAULT_REFERENCE_DOMAINS, edit_distance, suggest_correction, suggest_correction_with};
#[cfg(feature = "with-config")]
pub use verify::ConfigError;
pub use verify::{
    SubResult, Verdict, VerificationResult, Verifier, VerifyOptions, verify_email,
    verify_email_with_options,
};
