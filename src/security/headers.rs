//! Header inspection helpers.
//!
//! # Responsibilities
//! - Resolve the client address behind trusted proxies
//! - Redact secrets before headers reach the logs
//!
//! # Design Decisions
//! - `X-Forwarded-For` is only believed when the TCP peer is trusted
//! - The chain is walked right to left; the first untrusted hop is the client

use std::net::{IpAddr, SocketAddr};

use axum::http::{HeaderMap, HeaderName};

/// `X-Forwarded-For` header name.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Peers allowed to report the client address via `X-Forwarded-For`.
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies {
    addrs: Vec<IpAddr>,
}

impl TrustedProxies {
    /// Entries that do not parse are skipped; validation reports them.
    pub fn from_config(entries: &[String]) -> Self {
        Self {
            addrs: entries.iter().filter_map(|e| e.parse().ok()).collect(),
        }
    }

    pub fn is_trusted(&self, ip: IpAddr) -> bool {
        self.addrs.contains(&ip)
    }

    /// Best guess at the originating client address.
    pub fn client_ip(&self, peer: Option<SocketAddr>, headers: &HeaderMap) -> Option<IpAddr> {
        let peer_ip = peer?.ip();
        if !self.is_trusted(peer_ip) {
            return Some(peer_ip);
        }

        let hops: Vec<IpAddr> = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|hop| hop.trim().parse().ok())
            .collect();

        hops.iter()
            .rev()
            .find(|ip| !self.is_trusted(**ip))
            .or_else(|| hops.first())
            .copied()
            .or(Some(peer_ip))
    }
}

/// Header pairs for logging, with the values of `secret` names masked.
pub fn redacted(headers: &HeaderMap, secret: &[HeaderName]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if secret.contains(name) || value.is_sensitive() {
                "<redacted>".to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name.to_string(), shown)
        })
        .collect()
}
