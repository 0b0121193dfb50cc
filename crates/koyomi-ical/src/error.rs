use thiserror::Error;

/// Model-level errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}
