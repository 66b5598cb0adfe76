//! Request execution.
//!
//! `HttpExecutor` is the single seam between the plain-data descriptors and
//! the network. `ReqwestExecutor` is the default implementation; tests swap
//! in their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};

#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Send `request` and return whatever the server answered.
    ///
    /// Non-2xx statuses are data, not errors; only failures that leave no
    /// response behind are reported as `Transport`.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<E: HttpExecutor + ?Sized> HttpExecutor for std::sync::Arc<E> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request).await
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::transport("failed to create HTTP client", e))?;
        Ok(Self { client })
    }

    /// Use an already configured `reqwest::Client`.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method: http_method,
            url,
            query,
            headers,
            body,
            suppress_auth,
        } = request;

        let mut builder = self.client.request(method(http_method), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (name, value) in &headers {
            if suppress_auth && name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            Some(RequestBody::Json(json)) => builder.body(json),
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "timed out"
            } else if e.is_connect() {
                "connection failed"
            } else {
                "request failed"
            };
            ApiError::transport(format!("{http_method} {url}: {reason}"), e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("{http_method} {url}: failed to read body"), e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
