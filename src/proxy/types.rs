//! Request-scoped values passed through the forwarder.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
};
use percent_encoding::percent_decode_str;

/// An inbound request reduced to what the forwarder needs.
///
/// Built by the HTTP layer, but constructible directly so forwarding can be
/// exercised without a listener.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    /// Path after the mount prefix: empty or starting with `/`.
    pub path: String,
    pub headers: HeaderMap,
    /// Raw `name=value` query segments in arrival order, still encoded.
    /// Names may repeat.
    pub query: Vec<String>,
    pub body: Body,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: Body::empty(),
        }
    }

    /// Split an HTTP request mounted under `mount_prefix`.
    pub fn from_request(request: Request<Body>, mount_prefix: &str) -> Self {
        let (parts, body) = request.into_parts();
        let full_path = parts.uri.path();
        let path = full_path
            .strip_prefix(mount_prefix)
            .unwrap_or(full_path)
            .to_string();
        let query = parts
            .uri
            .query()
            .map(split_query)
            .unwrap_or_default();

        Self {
            method: parts.method,
            path,
            headers: parts.headers,
            query,
            body,
        }
    }
}

/// Split a query string into its non-empty `&`-separated segments.
///
/// Segments are kept encoded so bytes that are not UTF-8 and escapes the
/// upstream may interpret differently reach it unchanged.
pub fn split_query(raw: &str) -> Vec<String> {
    raw.split('&')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decoded name of a query segment, as raw bytes.
pub fn query_name(segment: &str) -> Vec<u8> {
    let name = segment.split_once('=').map_or(segment, |(name, _)| name);
    let name = name.replace('+', " ");
    percent_decode_str(&name).collect()
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(uri: &str) -> InboundRequest {
        let request = Request::builder()
            .method(Method::PATCH)
            .uri(uri)
            .header("x-one", "1")
            .body(Body::empty())
            .unwrap();
        InboundRequest::from_request(request, "/api")
    }

    #[test]
    fn strips_mount_prefix() {
        assert_eq!(split("/api/instance/create").path, "/instance/create");
        assert_eq!(split("/api/").path, "/");
        assert_eq!(split("/api").path, "");
    }

    #[test]
    fn keeps_method_headers_and_repeated_query() {
        let inbound = split("/api/chat?number=1&tag=a+b&&number=2");
        assert_eq!(inbound.method, Method::PATCH);
        assert_eq!(inbound.headers["x-one"], "1");
        assert_eq!(inbound.query, vec!["number=1", "tag=a+b", "number=2"]);
    }

    #[test]
    fn query_bytes_stay_encoded() {
        let inbound = split("/api/chat?sig=%FF%FE&bad=%zz");
        assert_eq!(inbound.query, vec!["sig=%FF%FE", "bad=%zz"]);
    }

    #[test]
    fn query_names_decode_to_bytes() {
        assert_eq!(query_name("a+b=1"), b"a b");
        assert_eq!(query_name("%FFx=1"), vec![0xFF, b'x']);
        assert_eq!(query_name("flag"), b"flag");
        assert_eq!(query_name("%zz=1"), b"%zz");
    }
}
