//! Error types shared by the loader, the converters and the fetch collaborator.

use std::time::Duration;

use thiserror::Error;

/// Request-level failure. Any of these ends the conversion request.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Invalid configuration: no usable `proxies` list found")]
    MissingProxies,

    #[error("Unsupported format: {0}. Supported formats: clash, v2ray, shadowrocket")]
    UnsupportedFormat(String),

    #[error("Failed to fetch source configuration: {0}")]
    UpstreamFetchFailed(FetchFailure),

    #[error("Timed out after {}s fetching source configuration", .0.as_secs())]
    UpstreamTimeout(Duration),
}

/// Why a remote fetch did not produce a usable body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("upstream returned an empty body")]
    EmptyBody,

    #[error("{0}")]
    Transport(String),
}

/// Machine-checkable kind of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedDocument,
    MissingProxies,
    UnsupportedFormat,
    UpstreamFetchFailed,
    UpstreamTimeout,
}

/// What the caller should do about a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remedy {
    /// The input (document text or target name) has to change.
    FixInput,
    /// Transient upstream trouble; the same request may succeed later.
    RetryLater,
    /// The source endpoint refuses this fetch; paste its content instead.
    PasteContent,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedDocument => "malformed_document",
            ErrorKind::MissingProxies => "missing_proxies",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::UpstreamFetchFailed => "upstream_fetch_failed",
            ErrorKind::UpstreamTimeout => "upstream_timeout",
        }
    }
}

impl Remedy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remedy::FixInput => "fix_input",
            Remedy::RetryLater => "retry_later",
            Remedy::PasteContent => "paste_content",
        }
    }

    /// Human-readable hint shown next to the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            Remedy::FixInput => "Check the submitted configuration and target format.",
            Remedy::RetryLater => "The source could not be reached right now, try again later.",
            Remedy::PasteContent => {
                "The URL may require authentication, have expired or be access-restricted. \
                 Download it with a browser or wget and paste the content instead."
            }
        }
    }
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MalformedDocument(_) => ErrorKind::MalformedDocument,
            ConvertError::MissingProxies => ErrorKind::MissingProxies,
            ConvertError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ConvertError::UpstreamFetchFailed(_) => ErrorKind::UpstreamFetchFailed,
            ConvertError::UpstreamTimeout(_) => ErrorKind::UpstreamTimeout,
        }
    }

    pub fn remedy(&self) -> Remedy {
        match self {
            ConvertError::MalformedDocument(_)
            | ConvertError::MissingProxies
            | ConvertError::UnsupportedFormat(_) => Remedy::FixInput,
            ConvertError::UpstreamFetchFailed(FetchFailure::InvalidUrl(_)) => Remedy::FixInput,
            ConvertError::UpstreamFetchFailed(FetchFailure::Status(_))
            | ConvertError::UpstreamFetchFailed(FetchFailure::EmptyBody) => Remedy::PasteContent,
            ConvertError::UpstreamFetchFailed(FetchFailure::Transport(_))
            | ConvertError::UpstreamTimeout(_) => Remedy::RetryLater,
        }
    }
}

/// Failure to turn one proxy node into a link. Never escapes the link-list
/// converter: the node is dropped and the batch continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("invalid proxy `{name}`: {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("failed to serialize vmess body: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remedy_by_kind() {
        assert_eq!(ConvertError::MissingProxies.remedy(), Remedy::FixInput);
        assert_eq!(
            ConvertError::UpstreamFetchFailed(FetchFailure::Status(403)).remedy(),
            Remedy::PasteContent
        );
        assert_eq!(
            ConvertError::UpstreamFetchFailed(FetchFailure::EmptyBody).remedy(),
            Remedy::PasteContent
        );
        assert_eq!(
            ConvertError::UpstreamTimeout(Duration::from_secs(30)).remedy(),
            Remedy::RetryLater
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ConvertError::UpstreamTimeout(Duration::from_secs(30));
        assert_eq!(err.kind().as_str(), "upstream_timeout");
        assert_eq!(
            err.to_string(),
            "Timed out after 30s fetching source configuration"
        );

        let err = ConvertError::UpstreamFetchFailed(FetchFailure::Status(502));
        assert_eq!(
            err.to_string(),
            "Failed to fetch source configuration: upstream returned HTTP 502"
        );
    }
}
