//! Error types for the layout crate
//!
//! The layout operations themselves never fail. These errors come from the
//! edges of the crate: configuration checks and graph documents read from
//! JSON.

use thiserror::Error;

/// Errors raised outside the layout pipeline proper
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid config: {field} {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("Duplicate node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LayoutError {
    /// Create a new config error for `field`
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Create a new duplicate id error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNodeId { id: id.into() }
    }

    /// Create a new unknown node error
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
