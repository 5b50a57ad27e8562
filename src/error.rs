use thiserror::Error;

/// Main error type for searchcoord
#[derive(Error, Debug)]
pub enum CoordError {
    /// The health oracle reported no healthy master node
    #[error("no healthy master available")]
    NoHealthyMaster,

    /// A node address could not be parsed into a session target
    #[error("malformed endpoint {address}: {source}")]
    MalformedEndpoint {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// Remote fetch failed or the resolved local file is missing
    #[error("document resolution failed: {0}")]
    Resolution(String),

    /// The engine rejected or errored on a request (network, status, parse)
    #[error("engine error: {0}")]
    Engine(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using CoordError
pub type Result<T> = std::result::Result<T, CoordError>;
