use thiserror::Error;

/// Result type for reportkit-sdk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the SDK.
///
/// Every error is local and synchronous. Nothing here is retried: a failed
/// load leaves the list or cache exactly as it was before the call.
#[derive(Debug, Error)]
pub enum Error {
    /// Interval or filter construction failed
    #[error(transparent)]
    Interval(#[from] reportkit_types::Error),

    /// Bad page index or page size
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Absolute index outside the currently loaded window
    #[error("Index {index} is out of bounds (loaded: {})", window_description(.first, .last))]
    IndexOutOfBounds {
        index: usize,
        first: Option<usize>,
        last: Option<usize>,
    },

    /// HTTP 404
    #[error("Server could not find resource: {uri}")]
    NotFound { uri: String },

    /// HTTP 405
    #[error("Method is not allowed for uri: {uri}")]
    MethodNotAllowed { uri: String },

    /// HTTP 401 or 403
    #[error("Authorization failed with code {status}: {body}")]
    Authorization { status: u16, body: String },

    /// HTTP 500
    #[error("Server responded with an internal error")]
    InternalError,

    /// Any other non-success status
    #[error("Unexpected response with code {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// A success response whose body isn't the expected JSON
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    /// Failure reported by the transport itself
    #[error("Connection error: {0}")]
    Connection(#[source] anyhow::Error),

    /// Configuration could not be read or written
    #[error("Configuration error: {0}")]
    Config(String),
}

fn window_description(first: &Option<usize>, last: &Option<usize>) -> String {
    match (first, last) {
        (Some(first), Some(last)) => format!("{first}..={last}"),
        _ => "nothing".to_string(),
    }
}

impl Error {
    /// True for errors raised by the server rather than by the caller or the
    /// transport.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::MethodNotAllowed { .. }
                | Error::Authorization { .. }
                | Error::InternalError
                | Error::UnexpectedResponse { .. }
                | Error::InvalidJson(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_bounds_message() {
        let err = Error::IndexOutOfBounds {
            index: 25,
            first: Some(10),
            last: Some(19),
        };
        assert_eq!(err.to_string(), "Index 25 is out of bounds (loaded: 10..=19)");

        let err = Error::IndexOutOfBounds {
            index: 0,
            first: None,
            last: None,
        };
        assert_eq!(err.to_string(), "Index 0 is out of bounds (loaded: nothing)");
    }

    #[test]
    fn test_server_error_classification() {
        assert!(Error::InternalError.is_server_error());
        assert!(Error::NotFound { uri: "api/reports/1".into() }.is_server_error());
        assert!(!Error::InvalidArgument("size".into()).is_server_error());
        assert!(!Error::Connection(anyhow::anyhow!("refused")).is_server_error());
    }
}
