//! Structural address check run before any network work.
//!
//! [`is_valid_syntax`] is deliberately permissive: it only rejects inputs that
//! cannot possibly be routed (`local@label.tld` shape, one `@`, no `..`).

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// local-part `@` label `.` tld, without whitespace or extra `@`.
const ADDRESS_SHAPE: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// First rule an address failed in [`check_syntax`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("address is empty")]
    Empty,
    #[error("must contain exactly one '@' (found {found})")]
    AtCount { found: usize },
    #[error("address contains consecutive dots")]
    ConsecutiveDots,
    #[error("address does not match local@domain.tld")]
    Shape,
}

pub fn is_valid_syntax(email: &str) -> bool {
    check_syntax(email).is_ok()
}

/// Same rules as [`is_valid_syntax`], reporting which one failed.
pub fn check_syntax(email: &str) -> Result<(), SyntaxError> {
    if email.trim().is_empty() {
        return Err(SyntaxError::Empty);
    }

    let found = email.matches('@').count();
    if found != 1 {
        return Err(SyntaxError::AtCount { found });
    }

    if email.contains("..") {
        return Err(SyntaxError::ConsecutiveDots);
    }

    // la regex porte sur l'entrée brute : un espace en tête ou en fin échoue
    if !address_shape().is_match(email) {
        return Err(SyntaxError::Shape);
    }
    Ok(())
}

/// Domain part of an address that passed [`check_syntax`].
pub(crate) fn domain_of(email: &str) -> Option<&str> {
    email.split_once('@').map(|(_, domain)| domain)
}

fn address_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(ADDRESS_SHAPE).expect("address pattern compiles"))
}
