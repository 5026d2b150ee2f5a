use std::time::Duration;

use log::debug;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONNECTION};
use reqwest::{redirect, Client};

use crate::error::{ConvertError, FetchFailure};

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;
/// Plain wget user agent; some subscription hosts reject browser-like clients
pub const DEFAULT_USER_AGENT: &str = "Wget/1.21.4";
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Limits for a single upstream fetch. No retries are ever made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Body of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub status: u16,
    pub body: String,
    /// Upstream `subscription-userinfo` header, passed on to our clients
    pub subscription_userinfo: Option<String>,
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ConvertError {
    if err.is_timeout() {
        ConvertError::UpstreamTimeout(timeout)
    } else {
        ConvertError::UpstreamFetchFailed(FetchFailure::Transport(err.to_string()))
    }
}

/// Fetches a remote document with a single GET request
///
/// # Arguments
/// * `url` - The URL to request
/// * `options` - Timeout, user agent and redirect limit
///
/// # Returns
/// * `Ok(FetchedDocument)` - 2xx response with a non-blank body
/// * `Err(ConvertError::UpstreamTimeout)` - the bounded wait was exceeded
/// * `Err(ConvertError::UpstreamFetchFailed)` - bad URL, transport error,
///   non-2xx status or empty body
pub async fn fetch_document(
    url: &str,
    options: &FetchOptions,
) -> Result<FetchedDocument, ConvertError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| ConvertError::UpstreamFetchFailed(FetchFailure::InvalidUrl(e.to_string())))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConvertError::UpstreamFetchFailed(FetchFailure::InvalidUrl(
            format!("unsupported scheme `{}`", parsed.scheme()),
        )));
    }

    let client = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .redirect(redirect::Policy::limited(options.max_redirects))
        .build()
        .map_err(|e| {
            ConvertError::UpstreamFetchFailed(FetchFailure::Transport(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;

    debug!("Fetching source configuration from {}", parsed);
    let response = client
        .get(parsed)
        .header(ACCEPT, "*/*")
        .header(ACCEPT_ENCODING, "identity")
        .header(CONNECTION, "Keep-Alive")
        .send()
        .await
        .map_err(|e| transport_error(e, options.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConvertError::UpstreamFetchFailed(FetchFailure::Status(
            status.as_u16(),
        )));
    }

    let subscription_userinfo = response
        .headers()
        .get("subscription-userinfo")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, options.timeout))?;
    if body.trim().is_empty() {
        return Err(ConvertError::UpstreamFetchFailed(FetchFailure::EmptyBody));
    }

    debug!("Fetched {} bytes (HTTP {})", body.len(), status.as_u16());
    Ok(FetchedDocument {
        status: status.as_u16(),
        body,
        subscription_userinfo,
    })
}
