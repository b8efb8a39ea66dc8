//! Error type shared by the page layer and its hosts.

use crate::markup::NodeId;

/// Error returned by setup, dispatch and host operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// A lookup the page markup is required to satisfy came back empty.
    #[error("required element not found: {selector}")]
    MissingElement { selector: String },
    /// A node handle that the host never issued, or that was removed.
    #[error("unknown node handle: {0}")]
    UnknownNode(NodeId),
    /// The persistent key-value store rejected a read or write.
    #[error("storage unavailable: {0}")]
    Storage(String),
    /// The host failed to carry out a DOM operation.
    #[error("dom operation failed: {0}")]
    Dom(String),
    /// A configuration override could not be parsed.
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}

impl PageError {
    pub(crate) fn missing(selector: &str) -> Self {
        Self::MissingElement { selector: selector.to_owned() }
    }
}
