//! Response relay.
//!
//! # Responsibilities
//! - Turn a buffered upstream response into the client response
//! - Copy status and every header, keeping repeated values
//!
//! # Design Decisions
//! - Status is relayed exactly, no remapping
//! - `Transfer-Encoding` is dropped; the buffered body is re-framed

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};

use crate::proxy::UpstreamResponse;

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if name == header::TRANSFER_ENCODING {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        response
    }
}
