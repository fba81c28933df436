use std::fmt;

pub use bytes::Bytes;
pub use futures::future::{BoxFuture, FutureExt};

pub type RssResult<T> = Result<T, RssError>;

/// Anything able to hand back the raw upstream document.
pub trait FeedSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, RssResult<Bytes>>;
}

#[derive(Debug)]
pub enum RssError {
    FetchError(reqwest::Error),
    ReadError(reqwest::Error),
    DecodeError(serde_json::Error),
    DateParseError(chrono::ParseError),
    SerializeError(rss::Error),
    ConfigError(String),
    IoError(std::io::Error),
}

impl fmt::Display for RssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RssError::*;

        match self {
            FetchError(err) => write!(f, "couldn't fetch page: {}", err),
            ReadError(err) => write!(f, "couldn't read response: {}", err),
            DecodeError(err) => write!(f, "couldn't unmarshal response: {}", err),
            DateParseError(err) => write!(f, "couldn't parse story publishing date: {}", err),
            SerializeError(err) => write!(f, "couldn't serialize feed: {}", err),
            ConfigError(msg) => write!(f, "bad configuration: {}", msg),
            IoError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RssError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use RssError::*;

        match self {
            FetchError(err) | ReadError(err) => Some(err),
            DecodeError(err) => Some(err),
            DateParseError(err) => Some(err),
            SerializeError(err) => Some(err),
            IoError(err) => Some(err),
            ConfigError(_) => None,
        }
    }
}

impl From<std::io::Error> for RssError {
    fn from(err: std::io::Error) -> RssError {
        RssError::IoError(err)
    }
}
