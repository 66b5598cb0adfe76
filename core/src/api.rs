//! Async resource operations.
//!
//! Every public method runs the same pipeline: build the request (which
//! checks the token and path placeholders), execute it, record rate-limit
//! headers, then interpret the response. Nothing is retried; errors reach
//! the caller as the `ApiError` class they were raised with.

use std::sync::Arc;

use crate::client::VimeoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::{self, Operation};
use crate::rate_limit::{RateLimit, RateLimitSnapshot};
use crate::types::{Paginated, Picture, PrivacyDomain};
use crate::upload::BinaryContent;

pub struct Vimeo<E = ReqwestExecutor> {
    client: VimeoClient,
    executor: E,
    rate_limit: Arc<RateLimit>,
}

impl Vimeo<ReqwestExecutor> {
    /// Client backed by `reqwest`, configured from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_executor(
            VimeoClient::from_config(config),
            ReqwestExecutor::new(config)?,
        ))
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ClientConfig::from_env()?)
    }
}

impl<E: HttpExecutor> Vimeo<E> {
    pub fn with_executor(client: VimeoClient, executor: E) -> Self {
        Self {
            client,
            executor,
            rate_limit: Arc::new(RateLimit::new()),
        }
    }

    /// Share rate-limit state with another client talking to the same
    /// account.
    pub fn with_rate_limit(mut self, rate_limit: Arc<RateLimit>) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn client(&self) -> &VimeoClient {
        &self.client
    }

    /// Latest rate-limit headers seen by this client.
    pub fn rate_limit(&self) -> RateLimitSnapshot {
        self.rate_limit.snapshot()
    }

    async fn dispatch(&self, op: &Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(operation = op.name, method = %request.method, url = %request.url, "sending request");
        let response = self
            .executor
            .execute(request)
            .await
            .map_err(|e| e.in_context(op.error_message))
            .inspect_err(|e| tracing::warn!(operation = op.name, error = %e, "request failed"))?;
        tracing::debug!(operation = op.name, status = response.status, "received response");
        self.rate_limit.update(&response);
        Ok(response)
    }

    /// Run one operation end to end. `parse` is the matching `parse_*`.
    async fn call<T>(
        &self,
        op: &Operation,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&VimeoClient, &HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let request = request?;
        let response = self.dispatch(op, request).await?;
        parse(&self.client, &response).inspect_err(|e| {
            tracing::warn!(operation = op.name, error = %e, "{}", op.error_message);
        })
    }

    // -- pictures ---------------------------------------------------------

    /// All pictures of a video; `None` if the video does not exist.
    pub async fn get_pictures(&self, video_id: u64) -> Result<Option<Paginated<Picture>>, ApiError> {
        self.call(
            &operation::GET_PICTURES,
            self.client.build_get_pictures(video_id),
            VimeoClient::parse_get_pictures,
        )
        .await
    }

    pub async fn get_picture(&self, video_id: u64, picture_id: u64) -> Result<Option<Picture>, ApiError> {
        self.call(
            &operation::GET_PICTURE,
            self.client.build_get_picture(video_id, picture_id),
            VimeoClient::parse_get_picture,
        )
        .await
    }

    /// Request an upload ticket: a `Picture` whose `link` accepts one PUT of
    /// the image bytes. The ticket expires server-side if unused.
    pub async fn create_upload_picture_ticket(
        &self,
        video_id: u64,
        time: Option<f32>,
        active: Option<bool>,
    ) -> Result<Picture, ApiError> {
        self.call(
            &operation::CREATE_PICTURE_TICKET,
            self.client.build_create_picture_ticket(video_id, time, active),
            VimeoClient::parse_create_picture_ticket,
        )
        .await
    }

    /// Upload an image as a new picture of `video_id` and return its ticket.
    ///
    /// Seekable content positioned past the start is rewound first;
    /// unseekable content is sent from wherever it currently is. Failures
    /// after the ticket was issued are reported as `Upload` carrying it.
    pub async fn upload_picture_file<C>(&self, content: &mut C, video_id: u64) -> Result<Picture, ApiError>
    where
        C: BinaryContent + ?Sized,
    {
        if !content.readable() {
            return Err(ApiError::configuration("upload content must be readable"));
        }
        if content.seekable() && content.position() > 0 {
            content.rewind().await?;
        }

        let ticket = self.create_upload_picture_ticket(video_id, None, None).await?;
        let link = ticket.link.clone().ok_or_else(|| ApiError::Upload {
            message: "Upload ticket carries no upload link.".to_string(),
            ticket: Some(Box::new(ticket.clone())),
            status_code: None,
            source: None,
        })?;

        self.send_picture_bytes(content, &link)
            .await
            .map_err(|e| ApiError::upload(operation::UPLOAD_ERROR_MESSAGE, &ticket, e))
            .inspect_err(|e| tracing::warn!(video_id, error = %e, "picture upload failed"))?;

        tracing::info!(video_id, uri = ticket.uri.as_deref().unwrap_or_default(), "picture uploaded");
        Ok(ticket)
    }

    async fn send_picture_bytes<C>(&self, content: &mut C, link: &str) -> Result<(), ApiError>
    where
        C: BinaryContent + ?Sized,
    {
        let bytes = content.read_all().await?;
        let request = self
            .client
            .build_upload_picture_file(link, content.content_type(), bytes)?;
        tracing::debug!(url = %request.url, "uploading picture bytes");
        // The pre-signed host is not the API host: no rate-limit bookkeeping.
        let response = self.executor.execute(request).await?;
        self.client.parse_upload_picture_file(&response)
    }

    /// Toggle whether a picture is the active thumbnail. `None` if it does
    /// not exist.
    pub async fn update_picture(
        &self,
        video_id: u64,
        picture_id: u64,
        active: Option<bool>,
    ) -> Result<Option<Picture>, ApiError> {
        self.call(
            &operation::UPDATE_PICTURE,
            self.client.build_update_picture(video_id, picture_id, active),
            VimeoClient::parse_update_picture,
        )
        .await
    }

    pub async fn delete_picture(&self, video_id: u64, picture_id: u64) -> Result<(), ApiError> {
        self.call(
            &operation::DELETE_PICTURE,
            self.client.build_delete_picture(video_id, picture_id),
            VimeoClient::parse_delete_picture,
        )
        .await
    }

    // -- embed presets ----------------------------------------------------

    pub async fn update_embed_preset(&self, video_id: u64, embed_preset_id: u64) -> Result<(), ApiError> {
        self.call(
            &operation::UPDATE_EMBED_PRESET,
            self.client.build_update_embed_preset(video_id, embed_preset_id),
            VimeoClient::parse_update_embed_preset,
        )
        .await
    }

    // -- privacy domains --------------------------------------------------

    pub async fn get_privacy_domains(
        &self,
        video_id: u64,
    ) -> Result<Option<Paginated<PrivacyDomain>>, ApiError> {
        self.call(
            &operation::GET_PRIVACY_DOMAINS,
            self.client.build_get_privacy_domains(video_id),
            VimeoClient::parse_get_privacy_domains,
        )
        .await
    }

    /// Whitelist `domain` for embedding. The value goes into the URL path
    /// as-is, so it should already be a bare host name.
    pub async fn add_privacy_domain(&self, video_id: u64, domain: &str) -> Result<(), ApiError> {
        self.call(
            &operation::ADD_PRIVACY_DOMAIN,
            self.client.build_add_privacy_domain(video_id, domain),
            VimeoClient::parse_add_privacy_domain,
        )
        .await
    }

    pub async fn delete_privacy_domain(&self, video_id: u64, domain: &str) -> Result<(), ApiError> {
        self.call(
            &operation::DELETE_PRIVACY_DOMAIN,
            self.client.build_delete_privacy_domain(video_id, domain),
            VimeoClient::parse_delete_privacy_domain,
        )
        .await
    }
}
