//! Upstream target and outbound request translation.
//!
//! # Responsibilities
//! - Join the base URL and the captured path
//! - Merge query parameters into the target URL
//! - Copy inbound headers and inject the credential
//!
//! # Design Decisions
//! - Plain concatenation: a trailing `/` on the base URL is not collapsed,
//!   and dot segments (`..`, `%2e%2e`) are sent as written, never resolved
//! - Query segments travel still encoded; only their order changes
//! - The credential header is set, never appended
//! - The inbound `Host` is dropped; the client derives it from the target

use axum::http::{header, uri::PathAndQuery, HeaderMap, HeaderName, HeaderValue, Uri};

use crate::config::UpstreamConfig;
use crate::proxy::error::ForwardError;
use crate::proxy::types::{query_name, split_query};

/// Header carrying the credential on every outbound request.
pub const CREDENTIAL_HEADER: HeaderName = HeaderName::from_static("apikey");

/// The upstream API and the credential it expects.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    base_url: String,
    api_key: String,
}

impl UpstreamTarget {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    /// Build the outbound URI for a captured path and inbound query segments.
    ///
    /// The path is appended to the base URL byte for byte. Any query already
    /// on the base URL joins the inbound segments; segments are sorted by
    /// decoded name, and the sort is stable so values of one name keep their
    /// order.
    pub fn target_uri(&self, path: &str, query: &[String]) -> Result<Uri, ForwardError> {
        let (base, base_query) = match self.base_url.split_once('?') {
            Some((base, base_query)) => (base, split_query(base_query)),
            None => (self.base_url.as_str(), Vec::new()),
        };

        let mut segments: Vec<&str> = base_query.iter().map(String::as_str).collect();
        segments.extend(query.iter().map(String::as_str));
        segments.sort_by_key(|segment| query_name(segment));

        let raw = format!("{}{}", base, path);
        let malformed = |e: &dyn std::fmt::Display| ForwardError::MalformedUrl(format!("{}: {}", raw, e));
        let uri = raw.parse::<Uri>().map_err(|e| malformed(&e))?;

        // `path()` is `/` when the base has no path of its own.
        let mut path_and_query = uri.path().to_string();
        if !segments.is_empty() {
            path_and_query.push('?');
            path_and_query.push_str(&segments.join("&"));
        }

        let mut parts = uri.into_parts();
        parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().map_err(|e| malformed(&e))?);
        Uri::from_parts(parts).map_err(|e| malformed(&e))
    }

    /// Copy inbound headers and set the credential.
    pub fn outbound_headers(&self, inbound: &HeaderMap) -> Result<HeaderMap, ForwardError> {
        let mut headers = HeaderMap::with_capacity(inbound.len() + 1);
        for (name, value) in inbound {
            if name == header::HOST {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }

        let mut credential = HeaderValue::from_str(&self.api_key).map_err(|e| {
            ForwardError::RequestConstruction(format!("invalid {} value: {}", CREDENTIAL_HEADER, e))
        })?;
        credential.set_sensitive(true);
        headers.insert(CREDENTIAL_HEADER, credential);

        Ok(headers)
    }
}
