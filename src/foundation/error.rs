/// Result alias used throughout the crate.
pub type BlendResult<T> = Result<T, BlendError>;

/// Errors reported by compositing calls and the surrounding I/O layer.
///
/// Compositing calls validate every precondition before the first pixel is written, so an `Err`
/// always means the destination buffer is untouched.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// A buffer or parameter is malformed (length mismatch, size overflow).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A foreground or halo does not fit inside the destination image.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A scene description is malformed.
    #[error("config error: {0}")]
    Config(String),

    /// I/O and decode failures from collaborators.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build a [`BlendError::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`BlendError::OutOfBounds`].
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    /// Build a [`BlendError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
