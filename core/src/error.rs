//! Error types for the Vimeo API client.
//!
//! # Design
//! One variant per failure class. Foreign errors (`reqwest`, `serde_json`,
//! `envy`) are converted once, where they enter the crate, and kept as the
//! `source`. Everything above that point propagates `ApiError` with `?`.
//! Transport failures gain the failing call's message on the way out;
//! upload failures are wrapped once in `Upload`.

use std::error::Error as StdError;

use thiserror::Error;

use crate::types::Picture;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors returned by the request builder, executor, interpreter and the
/// resource operations on top of them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A call argument or configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The operation needs an access token and none is configured.
    #[error("an access token is required for this operation")]
    Unauthorized,

    /// The request never produced an HTTP response.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The response status was accepted but the body did not decode.
    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The server answered with a status the operation does not accept.
    #[error("{message} (HTTP {status_code})")]
    RemoteApi {
        message: String,
        status_code: u16,
        body: String,
    },

    /// The second phase of a picture upload failed. `ticket` is the picture
    /// issued by the first phase, if any. `source` holds the inner
    /// `ApiError`; see [`ApiError::upload_cause`].
    #[error("{message}")]
    Upload {
        message: String,
        ticket: Option<Box<Picture>>,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },
}

impl ApiError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn malformed(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Wrap a failure from the byte-upload phase, keeping the ticket.
    ///
    /// A failure that is already an `Upload` error is returned unchanged.
    pub fn upload(message: impl Into<String>, ticket: &Picture, cause: ApiError) -> Self {
        if matches!(cause, ApiError::Upload { .. }) {
            return cause;
        }
        Self::Upload {
            message: message.into(),
            ticket: Some(Box::new(ticket.clone())),
            status_code: cause.status_code(),
            source: Some(Box::new(cause)),
        }
    }

    /// Prefix a `Transport` message with the failing call's own message.
    /// Other classes already carry it and are returned unchanged.
    pub fn in_context(self, context: &str) -> Self {
        match self {
            Self::Transport { message, source } => Self::Transport {
                message: format!("{context} {message}"),
                source,
            },
            other => other,
        }
    }

    /// HTTP status attached to this error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status_code, .. } => Some(*status_code),
            Self::Upload { status_code, .. } => *status_code,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// The ticket of a failed upload.
    pub fn upload_ticket(&self) -> Option<&Picture> {
        match self {
            Self::Upload { ticket, .. } => ticket.as_deref(),
            _ => None,
        }
    }

    /// The error that made an upload fail.
    pub fn upload_cause(&self) -> Option<&ApiError> {
        match self {
            Self::Upload {
                source: Some(source),
                ..
            } => source.downcast_ref::<ApiError>(),
            _ => None,
        }
    }
}

impl From<envy::Error> for ApiError {
    fn from(err: envy::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status_code: u16) -> ApiError {
        ApiError::RemoteApi {
            message: "Error retrieving picture for video.".to_string(),
            status_code,
            body: String::new(),
        }
    }

    #[test]
    fn remote_error_exposes_status() {
        let err = remote(404);
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Error retrieving picture for video. (HTTP 404)"
        );
    }

    #[test]
    fn transport_error_has_no_status() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::transport("connection failed", io);
        assert_eq!(err.status_code(), None);
        assert!(err.source().is_some());
    }

    #[test]
    fn upload_keeps_ticket_and_inner_status() {
        let ticket = Picture {
            link: Some("https://upload.example/abc".to_string()),
            ..Picture::default()
        };
        let err = ApiError::upload("Error uploading picture file.", &ticket, remote(500));
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(
            err.upload_ticket().and_then(|t| t.link.as_deref()),
            Some("https://upload.example/abc")
        );
        assert!(matches!(
            err.source().and_then(|s| s.downcast_ref::<ApiError>()),
            Some(ApiError::RemoteApi { status_code: 500, .. })
        ));
    }

    #[test]
    fn upload_is_not_wrapped_twice() {
        let ticket = Picture::default();
        let inner = ApiError::upload("first", &ticket, remote(400));
        let outer = ApiError::upload("second", &ticket, inner);
        assert_eq!(outer.to_string(), "first");
        assert!(matches!(
            outer.source().and_then(|s| s.downcast_ref::<ApiError>()),
            Some(ApiError::RemoteApi { .. })
        ));
    }

    #[test]
    fn upload_cause_is_the_inner_error() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = ApiError::upload(
            "Error uploading picture file.",
            &Picture::default(),
            ApiError::transport("PUT https://upload.example/abc: timed out", io),
        );
        let cause = err.upload_cause().unwrap();
        assert!(matches!(cause, ApiError::Transport { .. }));
        // The chain continues below the inner error.
        assert!(cause.source().is_some());
        assert!(remote(500).upload_cause().is_none());
    }

    #[test]
    fn context_prefixes_transport_message_only() {
        let err = ApiError::Transport {
            message: "GET x: timed out".to_string(),
            source: None,
        }
        .in_context("Error retrieving picture for video.");
        assert_eq!(
            err.to_string(),
            "transport error: Error retrieving picture for video. GET x: timed out"
        );

        let err = remote(500).in_context("ignored");
        assert_eq!(err.to_string(), "Error retrieving picture for video. (HTTP 500)");
    }
}
