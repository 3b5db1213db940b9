use thiserror::Error;

/// Parse failures for the small enums in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown period unit '{0}'")]
    UnknownPeriodUnit(String),

    #[error("Unknown calendar zone '{0}', expected 'local' or 'utc'")]
    UnknownZone(String),
}
