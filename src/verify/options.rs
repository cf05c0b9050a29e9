#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::smtp::ProbeOptions;
use crate::typo::DEFAULT_REFERENCE_DOMAINS;

/// Everything an embedding application may override.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Provider domains for typo detection, in tie-break order.
    pub reference_domains: Vec<String>,
    pub probe: ProbeOptions,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            reference_domains: DEFAULT_REFERENCE_DOMAINS
                .iter()
                .map(|domain| domain.to_string())
                .collect(),
            probe: ProbeOptions::default(),
        }
    }
}

#[cfg(feature = "with-config")]
mod file {
    use std::path::Path;

    use thiserror::Error;

    use super::VerifyOptions;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("cannot read {path}: {source}")]
        Read {
            path: String,
            #[source]
            source: std::io::Error,
        },
        #[error("invalid configuration: {source}")]
        Parse {
            #[source]
            source: toml::de::Error,
        },
    }

    impl VerifyOptions {
        /// Parses TOML; missing keys keep their defaults, unknown keys are rejected.
        pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
            toml::from_str(input).map_err(|source| ConfigError::Parse { source })
        }

        pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml_str(&raw)
        }
    }

}

#[cfg(feature = "with-config")]
pub use file::ConfigError;
