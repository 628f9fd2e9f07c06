//! Single-shot request forwarding to the upstream API.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → upstream.rs (target URL, merged query, headers + credential)
//!     → hyper client (one attempt, no retries)
//!     → buffer full body
//!     → UpstreamResponse
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{ProxyConfig, TimeoutConfig};
use crate::proxy::error::ForwardError;
use crate::proxy::types::{InboundRequest, UpstreamResponse};
use crate::proxy::upstream::{UpstreamTarget, CREDENTIAL_HEADER};
use crate::security::headers::redacted;

/// Forwards inbound requests to one upstream, injecting the credential.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct Forwarder {
    target: Arc<UpstreamTarget>,
    client: Client<HttpConnector, Body>,
    upstream_timeout: Option<Duration>,
}

impl Forwarder {
    pub fn new(target: UpstreamTarget, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(timeouts.connect_secs.map(Duration::from_secs));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            target: Arc::new(target),
            client,
            upstream_timeout: timeouts.upstream_secs.map(Duration::from_secs),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(UpstreamTarget::from_config(&config.upstream), &config.timeouts)
    }

    /// Translate an inbound request into the outbound one.
    pub fn build_request(&self, inbound: InboundRequest) -> Result<Request<Body>, ForwardError> {
        let uri = self.target.target_uri(&inbound.path, &inbound.query)?;
        let headers = self.target.outbound_headers(&inbound.headers)?;

        let mut request = Request::builder()
            .method(inbound.method)
            .uri(uri)
            .body(inbound.body)
            .map_err(|e| ForwardError::RequestConstruction(e.to_string()))?;
        *request.headers_mut() = headers;

        Ok(request)
    }

    /// Forward one request and buffer the upstream response.
    pub async fn forward(&self, inbound: InboundRequest) -> Result<UpstreamResponse, ForwardError> {
        let request = self.build_request(inbound)?;

        tracing::debug!(
            upstream_url = %request.uri(),
            method = %request.method(),
            headers = ?redacted(request.headers(), &[CREDENTIAL_HEADER]),
            "Sending request upstream"
        );

        let response = match self.upstream_timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request))
                .await
                .map_err(|_| {
                    ForwardError::UpstreamUnreachable(format!("no response within {:?}", limit))
                })??,
            None => self.exchange(request).await?,
        };

        if response.status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                status = response.status.as_u16(),
                body = %String::from_utf8_lossy(&response.body),
                "Upstream rejected credential"
            );
        }

        Ok(response)
    }

    async fn exchange(&self, request: Request<Body>) -> Result<UpstreamResponse, ForwardError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| ForwardError::UpstreamUnreachable(error_chain(&e)))?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), usize::MAX)
            .await
            .map_err(|e| ForwardError::BodyRead(error_chain(&e)))?;

        Ok(UpstreamResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// Render an error with its sources, e.g. `client error (Connect): tcp connect error: Connection refused`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
