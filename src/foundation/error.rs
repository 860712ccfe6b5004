/// Convenience result type used across the loader.
pub type LoadResult<T> = Result<T, LoadError>;

/// Failure taxonomy for a document load.
///
/// Every failure inside the pipeline surfaces as one of these values from the top-level `load_*`
/// call. No partial document is ever returned alongside an error.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The document transport could not produce a body.
    #[error("transport error: {message} ({location})")]
    Transport {
        /// Location handed to the transport.
        location: String,
        /// Rendered error chain from the transport.
        message: String,
    },

    /// Fetching or decoding one image of a batch failed, failing the whole batch.
    #[error("image error: {message} ({path})")]
    Image {
        /// Resolved image path that failed.
        path: String,
        /// Rendered error chain from the image source.
        message: String,
    },

    /// An interceptor-requiring entry point was called without one.
    #[error("required interceptor parameter")]
    MissingInterceptor,

    /// A layer references an asset id absent from the document (strict mode only).
    #[error("dangling reference: {kind} layer references unknown asset '{ref_id}'")]
    DanglingReference {
        /// Discriminant of the offending layer.
        kind: String,
        /// Asset id the layer asked for.
        ref_id: String,
    },

    /// Invalid user-provided data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoadError {
    /// Build a [`LoadError::Transport`] from a collaborator error.
    pub fn transport(location: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Transport {
            location: location.into(),
            message: format!("{err:#}"),
        }
    }

    /// Build a [`LoadError::Image`] from a collaborator error.
    pub fn image(path: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Image {
            path: path.into(),
            message: format!("{err:#}"),
        }
    }

    /// Build a [`LoadError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoadError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
