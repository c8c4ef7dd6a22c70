//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe documents or inputs the controller cannot work with.
/// The controller operations themselves never fail; these surface from the
/// code that prepares their inputs.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("malformed document: {0}")]
    Parse(String),

    #[error("invalid search pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("no marker found for {0}")]
    MarkerNotFound(String),
}
