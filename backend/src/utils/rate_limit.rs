use axum::http::HeaderMap;
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::time::{Duration, Instant};
use crate::constants::RATE_LIMIT_WINDOW_SECONDS;

/// Sliding-window request counter keyed by client
#[derive(Debug)]
pub struct RateLimiter {
    requests: HashMap<String, Vec<Instant>>,
    max_requests_per_window: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self::with_window(max_requests_per_minute, Duration::from_secs(RATE_LIMIT_WINDOW_SECONDS))
    }

    pub fn with_window(max_requests_per_window: u32, window: Duration) -> Self {
        Self {
            requests: HashMap::new(),
            max_requests_per_window,
            window,
        }
    }

    pub fn can_make_request(&mut self, key: &str) -> bool {
        let now = Instant::now();
        let window_start = now.checked_sub(self.window).unwrap_or(now);

        // Drop expired requests, and clients left with none
        self.requests.retain(|_, times| {
            times.retain(|&time| time > window_start);
            !times.is_empty()
        });

        let requests = self.requests.entry(key.to_string()).or_default();
        if requests.len() < self.max_requests_per_window as usize {
            requests.push(now);
            true
        } else {
            if requests.is_empty() {
                self.requests.remove(key);
            }
            false
        }
    }

    /// Number of clients with requests inside the current window
    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}

/// Client address for rate limiting.
///
/// Forwarding headers are client-controlled, so they are only consulted when
/// the server sits behind a proxy that overwrites them. Otherwise the socket
/// peer address is used.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(ip) = forwarded_ip(headers) {
            return ip;
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let ip_headers = [
        "cf-connecting-ip",      // Cloudflare
        "x-forwarded-for",       // Standard proxy header
        "x-real-ip",             // Nginx
        "x-client-ip",           // Apache
    ];

    for header_name in &ip_headers {
        if let Some(header_value) = headers.get(*header_name) {
            if let Ok(ip_str) = header_value.to_str() {
                // x-forwarded-for can be a comma-separated list, take the first one
                let ip = ip_str.split(',').next().unwrap_or(ip_str).trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    None
}
