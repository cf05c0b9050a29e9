/// One mail exchanger advertised for a domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub priority: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(priority: u16, exchange: impl Into<String>) -> Self {
        Self {
            priority,
            exchange: exchange.into(),
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MxStatus {
    /// Sorted by ascending priority, never empty.
    Records(Vec<MxRecord>),
    /// The domain answered but advertises no exchanger.
    NoRecords,
}

impl MxStatus {
    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records.as_slice(),
            Self::NoRecords => &[],
        }
    }

    /// Exchange hostnames, most preferred first.
    pub fn exchanges(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|record| record.exchange.clone())
            .collect()
    }
}
