//! Async client core for the Vimeo REST API: pictures, privacy domains and
//! embed presets.
//!
//! # Overview
//! Requests and responses are plain data. `VimeoClient` turns an operation
//! into an `HttpRequest` and an `HttpResponse` back into a typed result;
//! an `HttpExecutor` does the I/O in between. `Vimeo` chains the three for
//! each public operation and records rate-limit headers on the way.
//!
//! # Design
//! - `VimeoClient` is stateless: base URL and access token only.
//! - Per-operation behaviour (method, path template, accepted statuses,
//!   404 policy, error message) lives in the `operation` table.
//! - The executor is a trait so tests can run the whole pipeline without
//!   a network.
//! - The only shared mutable state is `RateLimit`, read through copies.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod http;
pub mod operation;
pub mod rate_limit;
pub mod types;
pub mod upload;

pub use api::Vimeo;
pub use client::VimeoClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use rate_limit::{RateLimit, RateLimitSnapshot};
pub use types::{Paginated, Paging, Picture, PrivacyDomain, Size};
pub use upload::{BinaryContent, BytesContent, FileContent};
