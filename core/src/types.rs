//! Domain models for the picture, privacy-domain and paging payloads.
//!
//! These mirror the remote JSON shape and are read-only views of server
//! state: nothing here is mutated after decoding.

use serde::{Deserialize, Deserializer, Serialize};

/// One rendition of a picture.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Size {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_with_play_button: Option<String>,
}

/// A thumbnail attached to a video.
///
/// An upload ticket is also a `Picture`: its `link` is the pre-signed URL
/// the file bytes are sent to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Picture {
    pub active: bool,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub resource_key: Option<String>,
}

/// A referrer domain allowed to embed a video.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacyDomain {
    pub domain: String,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub allow_hd: bool,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Links to neighbouring pages of a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}

/// One page of a remote collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paginated<T> {
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub paging: Paging,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    /// Reject pages whose item count contradicts their own metadata.
    pub fn check_consistency(&self) -> Result<(), String> {
        let count = self.data.len();
        if self.per_page > 0 && count > self.per_page as usize {
            return Err(format!(
                "page holds {count} items but per_page is {}",
                self.per_page
            ));
        }
        if count > self.total as usize {
            return Err(format!(
                "page holds {count} items but total is {}",
                self.total
            ));
        }
        Ok(())
    }

    pub fn has_next(&self) -> bool {
        self.paging.next.is_some()
    }
}

/// `allow_hd` is documented as a boolean but has been observed as 0/1.
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_decodes_remote_shape() {
        let json = r#"{
            "active": true,
            "uri": "/videos/42/pictures/1",
            "type": "custom",
            "sizes": [{"width": 640, "height": 360, "link": "https://i.example/1_640.jpg"}],
            "link": "https://i.example/1.jpg",
            "resource_key": "abc123"
        }"#;
        let picture: Picture = serde_json::from_str(json).unwrap();
        assert!(picture.active);
        assert_eq!(picture.kind.as_deref(), Some("custom"));
        assert_eq!(picture.sizes.len(), 1);
        assert_eq!(picture.sizes[0].width, 640);
        assert!(picture.sizes[0].link_with_play_button.is_none());
        assert_eq!(picture.resource_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn picture_tolerates_missing_optional_fields() {
        let picture: Picture = serde_json::from_str(r#"{"active":false}"#).unwrap();
        assert!(!picture.active);
        assert!(picture.sizes.is_empty());
        assert!(picture.link.is_none());
    }

    #[test]
    fn privacy_domain_accepts_bool_and_int_flag() {
        let a: PrivacyDomain =
            serde_json::from_str(r#"{"domain":"example.com","allow_hd":true}"#).unwrap();
        let b: PrivacyDomain =
            serde_json::from_str(r#"{"domain":"example.com","allow_hd":0}"#).unwrap();
        let c: PrivacyDomain = serde_json::from_str(r#"{"domain":"example.com"}"#).unwrap();
        assert!(a.allow_hd);
        assert!(!b.allow_hd);
        assert!(!c.allow_hd);
    }

    #[test]
    fn paginated_without_paging_block() {
        let page: Paginated<Picture> = serde_json::from_str(
            r#"{"data":[{"active":true,"uri":"/videos/42/pictures/1"}],"total":1,"page":1,"per_page":25}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert!(!page.has_next());
        assert!(page.check_consistency().is_ok());
    }

    #[test]
    fn paginated_rejects_overfull_page() {
        let page = Paginated {
            total: 10,
            page: 1,
            per_page: 1,
            paging: Paging::default(),
            data: vec![Picture::default(), Picture::default()],
        };
        assert!(page.check_consistency().is_err());
    }

    #[test]
    fn paginated_rejects_more_items_than_total() {
        let page = Paginated {
            total: 0,
            page: 1,
            per_page: 25,
            paging: Paging::default(),
            data: vec![PrivacyDomain::default()],
        };
        assert!(page.check_consistency().is_err());
    }
}
