//! Declarative table of every API operation.
//!
//! Each entry states how a call is sent (method, endpoint) and how its
//! response is judged (accepted statuses, whether 404 means "absent", the
//! message attached to failures). The builder and interpreter in
//! `client` read these entries instead of hard-coding per-call logic.

use crate::endpoints::Endpoint;
use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    pub endpoint: Endpoint,
    pub success: &'static [u16],
    /// A 404 yields "absent" instead of an error.
    pub not_found_is_null: bool,
    pub error_message: &'static str,
}

impl Operation {
    pub fn accepts(&self, status: u16) -> bool {
        self.success.contains(&status)
    }
}

pub const GET_PICTURES: Operation = Operation {
    name: "get pictures",
    method: HttpMethod::Get,
    endpoint: Endpoint::Pictures,
    success: &[200],
    not_found_is_null: true,
    error_message: "Error retrieving pictures for video.",
};

pub const GET_PICTURE: Operation = Operation {
    name: "get picture",
    method: HttpMethod::Get,
    endpoint: Endpoint::Picture,
    success: &[200],
    not_found_is_null: true,
    error_message: "Error retrieving picture for video.",
};

pub const CREATE_PICTURE_TICKET: Operation = Operation {
    name: "create upload picture ticket",
    method: HttpMethod::Post,
    endpoint: Endpoint::Pictures,
    success: &[200, 201],
    not_found_is_null: false,
    error_message: "Error generating upload picture ticket.",
};

pub const UPDATE_PICTURE: Operation = Operation {
    name: "update picture",
    method: HttpMethod::Patch,
    endpoint: Endpoint::Picture,
    success: &[200],
    not_found_is_null: true,
    error_message: "Error updating picture for video.",
};

pub const DELETE_PICTURE: Operation = Operation {
    name: "delete picture",
    method: HttpMethod::Delete,
    endpoint: Endpoint::Picture,
    success: &[200, 204],
    not_found_is_null: true,
    error_message: "Error deleting picture for video.",
};

pub const UPDATE_EMBED_PRESET: Operation = Operation {
    name: "update embed preset",
    method: HttpMethod::Put,
    endpoint: Endpoint::EmbedPreset,
    success: &[200, 204],
    not_found_is_null: true,
    error_message: "Error updating embed preset for video.",
};

pub const GET_PRIVACY_DOMAINS: Operation = Operation {
    name: "get privacy domains",
    method: HttpMethod::Get,
    endpoint: Endpoint::PrivacyDomains,
    success: &[200],
    not_found_is_null: true,
    error_message: "Error getting privacy domains for video.",
};

pub const ADD_PRIVACY_DOMAIN: Operation = Operation {
    name: "add privacy domain",
    method: HttpMethod::Put,
    endpoint: Endpoint::PrivacyDomain,
    success: &[200, 201, 204],
    not_found_is_null: true,
    error_message: "Error adding privacy domain for video.",
};

pub const DELETE_PRIVACY_DOMAIN: Operation = Operation {
    name: "delete privacy domain",
    method: HttpMethod::Delete,
    endpoint: Endpoint::PrivacyDomain,
    success: &[200, 204],
    not_found_is_null: false,
    error_message: "Error deleting privacy domain for video.",
};

/// Whether the pre-signed upload link accepted the bytes. Any 2xx counts
/// and a 400 is not treated as a failure.
pub fn upload_accepts(status: u16) -> bool {
    (200..300).contains(&status) || status == 400
}

pub const UPLOAD_ERROR_MESSAGE: &str = "Error uploading picture file.";

pub const ALL: &[Operation] = &[
    GET_PICTURES,
    GET_PICTURE,
    CREATE_PICTURE_TICKET,
    UPDATE_PICTURE,
    DELETE_PICTURE,
    UPDATE_EMBED_PRESET,
    GET_PRIVACY_DOMAINS,
    ADD_PRIVACY_DOMAIN,
    DELETE_PRIVACY_DOMAIN,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_accepts_some_2xx() {
        for op in ALL {
            assert!(!op.success.is_empty(), "{}", op.name);
            assert!(op.success.iter().all(|s| (200..300).contains(s)), "{}", op.name);
        }
    }

    #[test]
    fn names_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn only_domain_delete_and_ticket_surface_404() {
        let strict: Vec<_> = ALL
            .iter()
            .filter(|op| !op.not_found_is_null)
            .map(|op| op.name)
            .collect();
        assert_eq!(strict, ["create upload picture ticket", "delete privacy domain"]);
    }

    #[test]
    fn upload_accepts_any_2xx_and_400() {
        for status in [200, 201, 202, 204, 299, 400] {
            assert!(upload_accepts(status), "{status}");
        }
        for status in [301, 401, 403, 404, 413, 500] {
            assert!(!upload_accepts(status), "{status}");
        }
    }
}
