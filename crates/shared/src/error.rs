use thiserror::Error;

use crate::domain::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("node {0} is not known to this page")]
    UnknownNode(NodeId),
    #[error("node {0} is not attached to the document")]
    Detached(NodeId),
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("page is missing its {0}")]
    Missing(&'static str),
    #[error("host error: {0}")]
    Host(String),
}

impl PageError {
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    pub fn is_invalid_selector(&self) -> bool {
        matches!(self, Self::InvalidSelector { .. })
    }
}

pub type PageResult<T> = Result<T, PageError>;
