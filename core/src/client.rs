//! Stateless request builder and response interpreter for the Vimeo API.
//!
//! # Design
//! `VimeoClient` holds only the base URL and the access token and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. Both halves are thin wrappers over
//! [`VimeoClient::build`] and [`interpret`], driven by the entries in
//! [`crate::operation`].

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::operation::{self, Operation};
use crate::types::{Paginated, Picture, PrivacyDomain};

pub const ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";

/// How a response status was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// 404 at a call site that treats it as "absent".
    NotFound,
}

/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Clone)]
pub struct VimeoClient {
    base_url: String,
    access_token: Option<String>,
}

impl std::fmt::Debug for VimeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VimeoClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl VimeoClient {
    pub fn new(base_url: &str, access_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, config.access_token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Build the request for `op`.
    ///
    /// Every API operation is authenticated: fails with `Unauthorized` when
    /// no token is set, and with `Configuration` when a path placeholder is
    /// left unresolved. Only the upload PUT skips this path.
    pub fn build(
        &self,
        op: &Operation,
        segments: &[(&str, String)],
        query: Vec<(String, String)>,
        body: Option<RequestBody>,
    ) -> Result<HttpRequest, ApiError> {
        let token = self.access_token.as_deref().ok_or(ApiError::Unauthorized)?;
        let mut headers = vec![
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Authorization".to_string(), format!("bearer {token}")),
        ];
        if let Some(RequestBody::Json(_)) = body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let path = op.endpoint.resolve(segments)?;
        Ok(HttpRequest {
            method: op.method,
            url: format!("{}{path}", self.base_url),
            query,
            headers,
            body,
            suppress_auth: false,
        })
    }

    // -- pictures ---------------------------------------------------------

    pub fn build_get_pictures(&self, video_id: u64) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::GET_PICTURES,
            &[("clipId", video_id.to_string())],
            Vec::new(),
            None,
        )
    }

    pub fn build_get_picture(&self, video_id: u64, picture_id: u64) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::GET_PICTURE,
            &picture_segments(video_id, picture_id),
            Vec::new(),
            None,
        )
    }

    /// Ask for an upload ticket. `time` picks a frame (seconds into the
    /// video) instead of uploading a file.
    pub fn build_create_picture_ticket(
        &self,
        video_id: u64,
        time: Option<f32>,
        active: Option<bool>,
    ) -> Result<HttpRequest, ApiError> {
        let mut query = Vec::new();
        if let Some(time) = time {
            query.push(("time".to_string(), time.to_string()));
        }
        if let Some(active) = active {
            query.push(("active".to_string(), active.to_string()));
        }
        self.build(
            &operation::CREATE_PICTURE_TICKET,
            &[("clipId", video_id.to_string())],
            query,
            None,
        )
    }

    /// The byte PUT to a ticket's pre-signed link. Never authenticated.
    pub fn build_upload_picture_file(
        &self,
        link: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<HttpRequest, ApiError> {
        if !(link.starts_with("https://") || link.starts_with("http://")) {
            return Err(ApiError::configuration(format!(
                "upload link must be an absolute http(s) URL, got '{link}'"
            )));
        }
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: link.to_string(),
            query: Vec::new(),
            headers: vec![
                ("Content-Type".to_string(), content_type.to_string()),
                ("Content-Length".to_string(), bytes.len().to_string()),
            ],
            body: Some(RequestBody::Bytes(bytes)),
            suppress_auth: true,
        })
    }

    pub fn build_update_picture(
        &self,
        video_id: u64,
        picture_id: u64,
        active: Option<bool>,
    ) -> Result<HttpRequest, ApiError> {
        let query = active
            .map(|a| vec![("active".to_string(), a.to_string())])
            .unwrap_or_default();
        self.build(
            &operation::UPDATE_PICTURE,
            &picture_segments(video_id, picture_id),
            query,
            None,
        )
    }

    pub fn build_delete_picture(&self, video_id: u64, picture_id: u64) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::DELETE_PICTURE,
            &picture_segments(video_id, picture_id),
            Vec::new(),
            None,
        )
    }

    pub fn parse_get_pictures(
        &self,
        response: &HttpResponse,
    ) -> Result<Option<Paginated<Picture>>, ApiError> {
        interpret_page(response, &operation::GET_PICTURES)
    }

    pub fn parse_get_picture(&self, response: &HttpResponse) -> Result<Option<Picture>, ApiError> {
        interpret(response, &operation::GET_PICTURE)
    }

    pub fn parse_create_picture_ticket(&self, response: &HttpResponse) -> Result<Picture, ApiError> {
        interpret_required(response, &operation::CREATE_PICTURE_TICKET)
    }

    pub fn parse_upload_picture_file(&self, response: &HttpResponse) -> Result<(), ApiError> {
        if operation::upload_accepts(response.status) {
            if response.status == 400 {
                tracing::debug!(body = %response.body, "upload link answered 400, not treated as failure");
            }
            return Ok(());
        }
        Err(remote_error(response, operation::UPLOAD_ERROR_MESSAGE))
    }

    pub fn parse_update_picture(&self, response: &HttpResponse) -> Result<Option<Picture>, ApiError> {
        interpret(response, &operation::UPDATE_PICTURE)
    }

    pub fn parse_delete_picture(&self, response: &HttpResponse) -> Result<(), ApiError> {
        check_status(response, &operation::DELETE_PICTURE).map(|_| ())
    }

    // -- embed presets ----------------------------------------------------

    pub fn build_update_embed_preset(
        &self,
        video_id: u64,
        embed_preset_id: u64,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::UPDATE_EMBED_PRESET,
            &[
                ("clipId", video_id.to_string()),
                ("embedPresetId", embed_preset_id.to_string()),
            ],
            Vec::new(),
            None,
        )
    }

    pub fn parse_update_embed_preset(&self, response: &HttpResponse) -> Result<(), ApiError> {
        check_status(response, &operation::UPDATE_EMBED_PRESET).map(|_| ())
    }

    // -- privacy domains --------------------------------------------------

    pub fn build_get_privacy_domains(&self, video_id: u64) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::GET_PRIVACY_DOMAINS,
            &[("clipId", video_id.to_string())],
            Vec::new(),
            None,
        )
    }

    pub fn build_add_privacy_domain(&self, video_id: u64, domain: &str) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::ADD_PRIVACY_DOMAIN,
            &domain_segments(video_id, domain),
            Vec::new(),
            None,
        )
    }

    pub fn build_delete_privacy_domain(
        &self,
        video_id: u64,
        domain: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            &operation::DELETE_PRIVACY_DOMAIN,
            &domain_segments(video_id, domain),
            Vec::new(),
            None,
        )
    }

    pub fn parse_get_privacy_domains(
        &self,
        response: &HttpResponse,
    ) -> Result<Option<Paginated<PrivacyDomain>>, ApiError> {
        interpret_page(response, &operation::GET_PRIVACY_DOMAINS)
    }

    pub fn parse_add_privacy_domain(&self, response: &HttpResponse) -> Result<(), ApiError> {
        check_status(response, &operation::ADD_PRIVACY_DOMAIN).map(|_| ())
    }

    pub fn parse_delete_privacy_domain(&self, response: &HttpResponse) -> Result<(), ApiError> {
        check_status(response, &operation::DELETE_PRIVACY_DOMAIN).map(|_| ())
    }
}

fn picture_segments(video_id: u64, picture_id: u64) -> [(&'static str, String); 2] {
    [
        ("clipId", video_id.to_string()),
        ("pictureId", picture_id.to_string()),
    ]
}

fn domain_segments(video_id: u64, domain: &str) -> [(&'static str, String); 2] {
    [("clipId", video_id.to_string()), ("domain", domain.to_string())]
}

/// Classify `response` against the accepted statuses and 404 policy of `op`.
pub fn check_status(response: &HttpResponse, op: &Operation) -> Result<Outcome, ApiError> {
    if op.accepts(response.status) {
        return Ok(Outcome::Success);
    }
    if response.status == 404 && op.not_found_is_null {
        tracing::debug!(operation = op.name, "404 treated as absent");
        return Ok(Outcome::NotFound);
    }
    Err(remote_error(response, op.error_message))
}

/// Classify `response` and decode its body on success.
///
/// Returns `Ok(None)` only for a 404 at a call site that allows it.
pub fn interpret<T: DeserializeOwned>(
    response: &HttpResponse,
    op: &Operation,
) -> Result<Option<T>, ApiError> {
    match check_status(response, op)? {
        Outcome::NotFound => Ok(None),
        Outcome::Success => serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::malformed(op.error_message, e)),
    }
}

fn interpret_required<T: DeserializeOwned>(
    response: &HttpResponse,
    op: &Operation,
) -> Result<T, ApiError> {
    interpret(response, op)?.ok_or_else(|| remote_error(response, op.error_message))
}

fn interpret_page<T: DeserializeOwned>(
    response: &HttpResponse,
    op: &Operation,
) -> Result<Option<Paginated<T>>, ApiError> {
    let page: Option<Paginated<T>> = interpret(response, op)?;
    if let Some(page) = &page {
        page.check_consistency()
            .map_err(|reason| ApiError::MalformedResponse {
                message: format!("{} {reason}", op.error_message),
                source: None,
            })?;
    }
    Ok(page)
}

fn remote_error(response: &HttpResponse, message: &str) -> ApiError {
    ApiError::RemoteApi {
        message: message.to_string(),
        status_code: response.status,
        body: response.body.clone(),
    }
}
