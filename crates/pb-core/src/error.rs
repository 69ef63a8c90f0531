//! Error type shared by every page-builder crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    /// A palette item or caller asked for an element type the factory
    /// does not know. Nothing is created and no snapshot is taken.
    #[error("Unsupported element type: {0:?}")]
    UnsupportedElement(String),

    /// The addressed canvas node does not exist or is not a draggable element.
    #[error("no draggable element at position {0}")]
    NoSuchElement(usize),

    #[error("invalid builder configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T, E = BuilderError> = std::result::Result<T, E>;
