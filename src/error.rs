use std::error::Error;

/// Failure of a single delivery attempt to a [`LogSink`](crate::sink::LogSink).
///
/// These never reach callers of the logger; the remote client turns them
/// into a one-line console diagnostic.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("{0}")]
    Http(Box<dyn Error + Send + Sync>),

    #[error("collector responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Other(Box<dyn Error + Send + Sync>),
}

/// The request URL carries the collector token, so it is stripped before
/// the error can reach any diagnostic.
#[cfg(feature = "loggly")]
impl From<reqwest::Error> for SinkError {
    fn from(e: reqwest::Error) -> Self {
        SinkError::Http(Box::new(e.without_url()))
    }
}

impl From<String> for SinkError {
    fn from(msg: String) -> Self {
        SinkError::Other(msg.into())
    }
}

impl From<&str> for SinkError {
    fn from(msg: &str) -> Self {
        SinkError::Other(msg.into())
    }
}

/// Error returned while reading process-wide configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    Missing(&'static str),
}

/// Error returned when installing the tracing bridge.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}
