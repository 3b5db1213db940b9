use core_types::PeriodUnit;
use thiserror::Error;

/// Why a query produced no result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Crypto '{0}' doesn't exist.")]
    SymbolNotFound(String),

    #[error("There are no stats for crypto '{0}'.")]
    NoData(String),

    #[error(
        "No data for '{symbol}' in the last {amount} {}.",
        .unit.as_str().to_lowercase().replace('_', " ")
    )]
    NoDataInWindow {
        symbol: String,
        amount: i64,
        unit: PeriodUnit,
    },

    #[error("Invalid date '{input}', expected YYYY-MM-DD: {reason}")]
    InvalidDate { input: String, reason: String },
}

/// The outcome category a transport maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SymbolNotFound,
    NoData,
    InvalidDate,
}

impl QueryError {
    /// An empty window is reported in the same category as an unknown
    /// symbol, which is what existing clients of the period endpoint expect.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::SymbolNotFound(_) | QueryError::NoDataInWindow { .. } => {
                ErrorKind::SymbolNotFound
            }
            QueryError::NoData(_) => ErrorKind::NoData,
            QueryError::InvalidDate { .. } => ErrorKind::InvalidDate,
        }
    }
}
