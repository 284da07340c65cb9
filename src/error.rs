use std::error::Error;
use std::fmt;
use std::io;

use crate::{retry::Transient, Status};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum LtuError {
    /// Unknown environment name or missing settings entry.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The service judged the uploaded image too poor to be indexed.
    #[error("image {image_id} does not contain enough information to be registered")]
    InsufficientImageData { image_id: String },
    /// The service has no image with this identifier.
    #[error("image {image_id} not found")]
    ImageNotFound { image_id: String },
    /// Response body did not match the expected payload shape.
    #[error("response deserialization failed, http status {http_status}: {body}")]
    ResponseParse { http_status: u16, body: String },
    /// Non-success HTTP status or non-zero service status code.
    #[error(
        "image recognition {operation} failed: {}; http status: {http_status} {}",
        describe_status(.status.as_ref()),
        .reason.as_deref().unwrap_or("<no reason phrase>")
    )]
    ServiceCallFailed {
        /// Name of the client operation that failed.
        operation: &'static str,
        /// Parsed status envelope, if the body contained one.
        status: Option<Status>,
        http_status: u16,
        reason: Option<String>,
    },
    /// Network-level failure from `reqwest`.
    #[error("network error ({failure}): {source}")]
    Network {
        failure: NetworkFailure,
        #[source]
        source: reqwest::Error,
    },
    /// Reading an image stream or settings file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reason behind a [`LtuError::Network`] failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetworkFailure {
    ConnectFailure,
    ConnectionClosed,
    Timeout,
    RequestCanceled,
    Other,
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ConnectFailure => "connect failure",
            Self::ConnectionClosed => "connection closed",
            Self::Timeout => "timeout",
            Self::RequestCanceled => "request canceled",
            Self::Other => "other",
        };
        f.write_str(text)
    }
}

impl NetworkFailure {
    /// Classifies a `reqwest` error into the reasons the retry executor cares about.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectFailure
        } else {
            Self::from_source_chain(err)
        }
    }

    /// Walks the `source()` chain for hyper or io failures on an open connection.
    ///
    /// Protocol violations and anything unrecognised map to [`NetworkFailure::Other`].
    fn from_source_chain(err: &(dyn Error + 'static)) -> Self {
        let mut current = Some(err);
        while let Some(cause) = current {
            if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
                if hyper_err.is_canceled() {
                    return Self::RequestCanceled;
                }
                if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                    return Self::ConnectionClosed;
                }
            }
            if let Some(io_err) = cause.downcast_ref::<io::Error>() {
                if matches!(
                    io_err.kind(),
                    io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::BrokenPipe
                        | io::ErrorKind::UnexpectedEof
                ) {
                    return Self::ConnectionClosed;
                }
            }
            current = cause.source();
        }
        Self::Other
    }
}

impl From<reqwest::Error> for LtuError {
    fn from(source: reqwest::Error) -> Self {
        Self::Network {
            failure: NetworkFailure::classify(&source),
            source,
        }
    }
}

impl Transient for LtuError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { failure, .. } if *failure != NetworkFailure::Other
        )
    }
}

fn describe_status(status: Option<&Status>) -> String {
    match status {
        Some(status) => format!("status code {}, {}", status.code, status.message),
        None => "status unavailable".to_owned(),
    }
}
