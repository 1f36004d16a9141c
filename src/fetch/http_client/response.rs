//! HTTP response wrappers.

use std::collections::HashMap;

use reqwest::{Response, StatusCode};

fn header_map(response: &Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// GET response with the body still unread.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub(crate) response: Response,
}

impl HttpResponse {
    pub(crate) fn new(response: Response) -> Self {
        Self {
            status: response.status(),
            headers: header_map(&response),
            response,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// ETag header, verbatim (quotes included).
    pub fn etag(&self) -> Option<&str> {
        self.headers.get("etag").map(|s| s.as_str())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get("content-length")
            .and_then(|s| s.parse().ok())
    }

    pub async fn bytes(self) -> Result<Vec<u8>, reqwest::Error> {
        self.response.bytes().await.map(|b| b.to_vec())
    }
}

/// HEAD response wrapper (no body, just headers).
pub struct HeadResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
}

impl HeadResponse {
    pub(crate) fn new(response: &Response) -> Self {
        Self {
            status: response.status(),
            headers: header_map(response),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// ETag header, `None` when missing or empty.
    pub fn etag(&self) -> Option<&str> {
        self.headers
            .get("etag")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get("content-length")
            .and_then(|s| s.parse().ok())
    }
}
