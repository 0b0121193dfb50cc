use koyomi_ical::ComponentKind;
use thiserror::Error;

/// Errors surfaced to the caller.
///
/// Only call-shape errors surface. Data errors (unknown zones, malformed
/// rules, unreadable time values) are tolerated: they are logged and the
/// affected value degrades, so a scan over a messy calendar still returns a
/// useful result.
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Component kind {0} cannot be expanded")]
    InvalidKind(ComponentKind),
}

pub type ExpandResult<T> = std::result::Result<T, ExpandError>;
