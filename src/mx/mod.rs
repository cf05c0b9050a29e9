//! DNS MX resolution.
//!
//! The public entry point is [`resolve_mx`], which performs a synchronous lookup
//! using the system resolver and returns the exchange hostnames by ascending
//! priority. [`check_mx`] keeps the priorities.

mod error;
mod resolver;
mod types;

pub use error::ResolutionError as Error;
pub use resolver::{LookupMx, SystemResolver, check_mx, resolve_mx, resolve_with};
pub use types::{MxRecord, MxStatus};
