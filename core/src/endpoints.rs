//! Path templates for every endpoint the client talks to.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::ApiError;

/// Characters escaped inside a single path segment. Domain names and numeric
/// ids pass through untouched.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Pictures,
    Picture,
    PrivacyDomains,
    PrivacyDomain,
    EmbedPreset,
}

impl Endpoint {
    pub fn template(self) -> &'static str {
        match self {
            Endpoint::Pictures => "/videos/{clipId}/pictures",
            Endpoint::Picture => "/videos/{clipId}/pictures/{pictureId}",
            Endpoint::PrivacyDomains => "/videos/{clipId}/privacy/domains",
            // The domain is a path segment, not a query parameter.
            Endpoint::PrivacyDomain => "/videos/{clipId}/privacy/domains/{domain}",
            Endpoint::EmbedPreset => "/videos/{clipId}/presets/{embedPresetId}",
        }
    }

    /// Placeholder names in template order.
    pub fn placeholders(self) -> Vec<&'static str> {
        self.template()
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }

    /// Substitute every placeholder with its segment value.
    ///
    /// Fails with `Configuration` when a placeholder has no value or an empty
    /// one. Segments not named by the template are ignored.
    pub fn resolve(self, segments: &[(&str, String)]) -> Result<String, ApiError> {
        let mut path = String::with_capacity(self.template().len() + 16);
        for seg in self.template().split('/').skip(1) {
            path.push('/');
            match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = segments
                        .iter()
                        .find(|(k, _)| *k == name)
                        .map(|(_, v)| v.as_str())
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| {
                            ApiError::configuration(format!(
                                "missing value for path placeholder '{name}' in {}",
                                self.template()
                            ))
                        })?;
                    path.extend(utf8_percent_encode(value, PATH_SEGMENT));
                }
                None => path.push_str(seg),
            }
        }
        Ok(path)
    }
}
