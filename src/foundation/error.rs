/// Result alias used throughout the crate.
pub type StarloopResult<T> = Result<T, StarloopError>;

/// Failure taxonomy for one generation request.
///
/// There is no partial-success mode: any of these ends the request.
#[derive(thiserror::Error, Debug)]
pub enum StarloopError {
    /// Caller-supplied parameters were rejected before any work started.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame (or the static preview) failed to rasterize.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// The external encoder could not be started or exited unsuccessfully.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Scratch directory creation or a frame write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The request observed its cancellation token.
    #[error("generation cancelled")]
    Cancelled,

    /// Anything else, with its source chain intact.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StarloopError {
    /// Build a [`StarloopError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StarloopError::Rasterization`].
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`StarloopError::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`StarloopError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// `true` for [`StarloopError::Encoding`].
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }

    /// `true` for [`StarloopError::Rasterization`].
    pub fn is_rasterization(&self) -> bool {
        matches!(self, Self::Rasterization(_))
    }

    /// `true` for [`StarloopError::Storage`].
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
