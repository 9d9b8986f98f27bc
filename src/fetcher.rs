// src/fetcher.rs
// =============================================================================
// This module is the boundary between the crawl engine and the network.
//
// The engine only knows the `Fetch` trait: give it a URL, get back either
// a response (status + body) or a transport-level failure. The production
// implementation wraps reqwest; tests plug in an in-memory fake so the
// whole engine can be exercised without a network.
//
// Important distinction:
// - A 404 (or any non-2xx) is NOT an error at this layer. It is a normal
//   response; the engine decides what counts as a broken link.
// - Only transport failures (DNS, timeout, refused connection, TLS, ...)
//   come back as FetchError.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

// Every request identifies itself as a regular desktop browser. Some
// sites answer differently (or not at all) to obvious bot user agents.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.142 Safari/537.36";

/// A completed HTTP exchange: status code plus the raw body
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// 2xx means the link is alive
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Transport-level failure categories.
//
// These end up in the report's Code column, so each variant has a short
// uppercase marker that can't be confused with a numeric HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchError {
    /// Request exceeded the configured timeout
    Timeout,
    /// Redirect loop (more redirects than the client allows)
    TooManyRedirects,
    /// Could not resolve the hostname
    Dns,
    /// TCP connection failed (refused, unreachable, ...)
    Connect,
    /// TLS/SSL certificate problem
    Ssl,
    /// Anything else (malformed response, protocol error, ...)
    Other,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            FetchError::Timeout => "TIMEOUT",
            FetchError::TooManyRedirects => "REDIRECT_LOOP",
            FetchError::Dns => "DNS",
            FetchError::Connect => "CONNECT",
            FetchError::Ssl => "SSL",
            FetchError::Other => "ERROR",
        };
        write!(f, "{}", marker)
    }
}

impl FetchError {
    // Sorts a reqwest error into our failure categories.
    //
    // reqwest errors can happen for many reasons:
    // - Network timeout
    // - DNS resolution failure
    // - SSL certificate issues
    // - Too many redirects
    // - etc.
    fn from_reqwest(error: &reqwest::Error) -> Self {
        // Convert the error to a string once; reqwest does not expose
        // DNS/TLS failures as dedicated variants
        let error_string = error.to_string().to_lowercase();

        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            // Connection errors often mean DNS issues or host unreachable
            if error_string.contains("dns") {
                FetchError::Dns
            } else {
                FetchError::Connect
            }
        } else if error_string.contains("certificate") || error_string.contains("ssl") {
            FetchError::Ssl
        } else {
            FetchError::Other
        }
    }
}

// The fetcher boundary.
//
// #[async_trait] lets us have async methods in a trait object-safe way;
// the engine stores its fetcher behind this trait so tests can swap in
// a fake that serves a canned site graph.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Production fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the HTTP client all workers share (reqwest clients pool
    // connections internally, so one client is the right number).
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status().as_u16();

        // Reading the body can also fail mid-transfer; treat that like
        // any other transport failure
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = FetchResponse {
            status: 200,
            body: String::new(),
        };
        assert!(ok.is_success());

        let created = FetchResponse {
            status: 204,
            body: String::new(),
        };
        assert!(created.is_success());

        let not_found = FetchResponse {
            status: 404,
            body: String::new(),
        };
        assert!(!not_found.is_success());

        let redirect = FetchResponse {
            status: 301,
            body: String::new(),
        };
        assert!(!redirect.is_success());
    }

    #[test]
    fn test_error_markers_are_not_numeric() {
        // The report's Code column mixes HTTP status numbers with these
        // markers; they must never look like a status code
        for err in [
            FetchError::Timeout,
            FetchError::TooManyRedirects,
            FetchError::Dns,
            FetchError::Connect,
            FetchError::Ssl,
            FetchError::Other,
        ] {
            assert!(err.to_string().parse::<u16>().is_err());
        }
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(10)).is_ok());
    }
}
