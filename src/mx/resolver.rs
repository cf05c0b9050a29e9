use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
};

use super::{Error, MxRecord, MxStatus};

/// Resolves `domain` to its mail exchangers, most preferred first.
///
/// An empty vector means the domain exists but advertises no MX; any lookup
/// failure (NXDOMAIN, SERVFAIL, network, timeout) is an [`Error`].
pub fn resolve_mx(domain: &str) -> Result<Vec<String>, Error> {
    check_mx(domain).map(|status| status.exchanges())
}

/// Lookup MX records for `domain` using the system resolver.
///
/// The domain is normalized via IDNA before querying DNS. The resulting
/// [`MxStatus`] contains the sorted list of records (ascending priority).
pub fn check_mx(domain: &str) -> Result<MxStatus, Error> {
    resolve_with(&SystemResolver, domain)
}

pub fn resolve_with<R>(resolver: &R, domain: &str) -> Result<MxStatus, Error>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let mut records = resolver.lookup_mx(&ascii)?;

    // tri stable : à priorité égale on garde l'ordre du résolveur
    records.sort_by_key(|record| record.priority);
    tracing::debug!(domain = %ascii, count = records.len(), "MX lookup done");

    if records.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        Ok(MxStatus::Records(records))
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// Source of MX answers. Records may come back in any order.
pub trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error>;
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let lookup = match Resolver::mx_lookup(self, domain) {
            Ok(lookup) => lookup,
            Err(err) if is_empty_answer(&err) => return Ok(Vec::new()),
            Err(err) => return Err(Error::lookup(domain, err)),
        };
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }
}

/// Builds a resolver from the system configuration on every lookup, so that
/// nothing is shared between verifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl LookupMx for SystemResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let resolver = Resolver::from_system_conf().map_err(Error::resolver_init)?;
        resolver.lookup_mx(domain)
    }
}

/// NOERROR without answers; NXDOMAIN also lands in `NoRecordsFound` and stays an error.
fn is_empty_answer(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NoError
    )
}
