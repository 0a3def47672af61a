//! Page identity used to scope persisted annotations.

use std::fmt;
use thiserror::Error;
use url::Url;

/// Prefix shared by every annotation record key.
pub const KEY_PREFIX: &str = "scribble:";

/// Page identity errors.
#[derive(Debug, Error)]
pub enum PageKeyError {
    #[error("Invalid page URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Storage key for one document: `scribble:<origin><path>`.
///
/// Query string and fragment are not part of the key, so `/p?q=1` and
/// `/p?q=2` share one annotation set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey(String);

impl PageKey {
    /// Parse a document URL and derive its key.
    pub fn from_url(input: &str) -> Result<Self, PageKeyError> {
        let url = Url::parse(input).map_err(|source| PageKeyError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;
        Ok(Self::from_parsed(&url))
    }

    /// Derive the key from an already parsed URL.
    ///
    /// Opaque origins (`file:`, `data:`) serialize as `null`, as browsers do.
    pub fn from_parsed(url: &Url) -> Self {
        Self(format!(
            "{KEY_PREFIX}{}{}",
            url.origin().ascii_serialization(),
            url.path()
        ))
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_and_fragment_ignored() {
        let a = PageKey::from_url("https://x.test/p?q=1").unwrap();
        let b = PageKey::from_url("https://x.test/p?q=2#top").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "scribble:https://x.test/p");
    }

    #[test]
    fn test_port_is_part_of_origin() {
        let key = PageKey::from_url("http://x.test:8080/docs/a.html").unwrap();
        assert_eq!(key.as_str(), "scribble:http://x.test:8080/docs/a.html");

        let default_port = PageKey::from_url("https://x.test:443/p").unwrap();
        assert_eq!(default_port.as_str(), "scribble:https://x.test/p");
    }

    #[test]
    fn test_different_paths_differ() {
        let a = PageKey::from_url("https://x.test/a").unwrap();
        let b = PageKey::from_url("https://x.test/b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_root_path() {
        let key = PageKey::from_url("https://x.test").unwrap();
        assert_eq!(key.to_string(), "scribble:https://x.test/");
    }

    #[test]
    fn test_invalid_url() {
        let result = PageKey::from_url("not a url");
        assert!(matches!(result, Err(PageKeyError::InvalidUrl { .. })));
    }
}
