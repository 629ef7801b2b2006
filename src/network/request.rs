//! Request descriptors and URL construction.

use crate::domain::FetchError;
use reqwest::Method;
use url::Url;

/// Everything needed to issue one catalog request.
///
/// Query parameters keep their insertion order and are already stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub base_url: String,
    /// Path appended to `base_url`, starting with `/`.
    pub path: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Starts a `GET` descriptor for `path` under `base_url`.
    #[must_use]
    pub fn get(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            method: Method::GET,
            query: Vec::new(),
        }
    }

    /// Appends one query parameter, stringifying the value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Builds the fully-qualified URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidRequest`] if the base URL does not parse,
    /// is not an `http(s)` URL, or the joined path is malformed.
    pub fn url(&self) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| FetchError::InvalidRequest(format!("malformed URL {raw:?}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidRequest(format!(
                "unsupported URL scheme {:?}",
                url.scheme()
            )));
        }

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}
