use std::fmt;

/// Errors from the upstream court-auction API or the Kakao geocoder.
#[derive(Debug)]
pub enum FetchError {
    Network(String),
    /// The HTTP round-trip succeeded but the response envelope carried a
    /// non-200 application status.
    Upstream {
        status: i64,
        message: Option<String>,
    },
    Decode(String),
    Config(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::Upstream { status, message } => match message {
                Some(msg) => write!(f, "Upstream status {status}: {msg}"),
                None => write!(f, "Upstream status {status}"),
            },
            FetchError::Decode(msg) => write!(f, "Response decode error: {msg}"),
            FetchError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}
