use thiserror::Error;

/// DNS failures surfaced by [`resolve_mx`](crate::mx::resolve_mx).
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("MX lookup failed for {domain}: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
}

impl ResolutionError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub fn lookup(
        domain: impl Into<String>,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::Lookup {
            domain: domain.into(),
            source,
        }
    }
}
