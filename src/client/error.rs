use reqwest::Error as ReqwestError;
use std::fmt;
use std::io;

// Define a custom error type for handling Reddit API errors
#[derive(Debug)]
pub enum RedditClientError {
    RequestError(ReqwestError),
    ApiError(String),
    ParseError(serde_json::Error),
    ConfigError(String),
    IoError(io::Error),
    CsvError(csv::Error),
}

impl fmt::Display for RedditClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RedditClientError::RequestError(err) => write!(f, "Request error: {}", err),
            RedditClientError::ApiError(msg) => write!(f, "Reddit API error: {}", msg),
            RedditClientError::ParseError(err) => write!(f, "Parse error: {}", err),
            RedditClientError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            RedditClientError::IoError(err) => write!(f, "I/O error: {}", err),
            RedditClientError::CsvError(err) => write!(f, "CSV error: {}", err),
        }
    }
}

impl std::error::Error for RedditClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RedditClientError::RequestError(err) => Some(err),
            RedditClientError::ParseError(err) => Some(err),
            RedditClientError::IoError(err) => Some(err),
            RedditClientError::CsvError(err) => Some(err),
            RedditClientError::ApiError(_) | RedditClientError::ConfigError(_) => None,
        }
    }
}

impl From<ReqwestError> for RedditClientError {
    fn from(err: ReqwestError) -> Self {
        RedditClientError::RequestError(err)
    }
}

impl From<serde_json::Error> for RedditClientError {
    fn from(err: serde_json::Error) -> Self {
        RedditClientError::ParseError(err)
    }
}

impl From<io::Error> for RedditClientError {
    fn from(err: io::Error) -> Self {
        RedditClientError::IoError(err)
    }
}

impl From<csv::Error> for RedditClientError {
    fn from(err: csv::Error) -> Self {
        RedditClientError::CsvError(err)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RedditClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_error_kind() {
        let err = RedditClientError::ApiError("SUBREDDIT_NOEXIST".to_string());
        assert_eq!(err.to_string(), "Reddit API error: SUBREDDIT_NOEXIST");

        let err = RedditClientError::ConfigError("REDDIT_CLIENT_ID is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: REDDIT_CLIENT_ID is not set"
        );
    }

    #[test]
    fn parse_errors_convert_and_keep_their_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RedditClientError = parse.into();
        assert!(matches!(err, RedditClientError::ParseError(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
