//! HTTP request and response descriptors.
//!
//! # Design
//! Requests and responses are plain data. `VimeoClient` builds an
//! `HttpRequest` and parses an `HttpResponse`; an `HttpExecutor` sits in
//! between and is the only piece that touches the network. Each descriptor
//! is created for one call, moved into the next stage and then dropped.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Serialized JSON document.
    Json(String),
    /// Raw bytes, sent as-is.
    Bytes(Vec<u8>),
}

impl RequestBody {
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Json(s) => s.len(),
            RequestBody::Bytes(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// File uploads would flood debug logs otherwise.
impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Json(s) => f.debug_tuple("Json").field(s).finish(),
            RequestBody::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute: the API base joined with the resolved path, or the
/// pre-signed link of an upload ticket. When `suppress_auth` is set the
/// request carries no `Authorization` header.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub suppress_auth: bool,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("X-RateLimit-Remaining".to_string(), "99".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("x-ratelimit-remaining"), Some("99"));
        assert_eq!(response.header("x-ratelimit-limit"), None);
    }

    #[test]
    fn byte_bodies_are_summarised_in_debug_output() {
        let body = RequestBody::Bytes(vec![0; 4096]);
        assert_eq!(format!("{body:?}"), "Bytes(4096 bytes)");
        assert_eq!(body.len(), 4096);
    }

    #[test]
    fn method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }
}
