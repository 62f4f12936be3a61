use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// How the client address is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientIpSource {
    /// First hop of `X-Forwarded-For`, then `X-Real-IP`, then the peer address.
    #[default]
    ForwardedHeaders,
    /// Only the peer address of the connection.
    PeerAddr,
}

impl ClientIpSource {
    /// Resolve the client address, or an empty string when nothing is known.
    ///
    /// The peer address is only available when the server was started with
    /// `into_make_service_with_connect_info::<SocketAddr>()`.
    pub fn resolve<B>(self, request: &Request<B>) -> String {
        if self == ClientIpSource::ForwardedHeaders {
            if let Some(ip) = forwarded_ip(request.headers()) {
                return ip;
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default()
    }
}

/// Forwarded candidates that do not parse as an IP address are ignored.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let first_hop = header_str(headers, X_FORWARDED_FOR)
        .and_then(|chain| chain.split(',').next())
        .and_then(parse_ip);

    first_hop
        .or_else(|| header_str(headers, X_REAL_IP).and_then(parse_ip))
        .map(|ip| ip.to_string())
}

fn parse_ip(candidate: &str) -> Option<IpAddr> {
    candidate.trim().parse().ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)], peer: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut req = builder.body(()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            req.extensions_mut().insert(ConnectInfo(addr));
        }
        req
    }

    #[test]
    fn test_forwarded_for_first_hop_wins() {
        let req = request(
            &[
                ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
                ("x-real-ip", "198.51.100.2"),
            ],
            Some("10.0.0.1:5000"),
        );
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request(&[("x-real-ip", "198.51.100.2")], Some("10.0.0.1:5000"));
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "198.51.100.2");
    }

    #[test]
    fn test_peer_addr_fallback() {
        let req = request(&[], Some("192.0.2.10:443"));
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "192.0.2.10");
    }

    #[test]
    fn test_peer_addr_ignores_headers() {
        let req = request(&[("x-forwarded-for", "203.0.113.7")], Some("192.0.2.10:443"));
        assert_eq!(ClientIpSource::PeerAddr.resolve(&req), "192.0.2.10");
    }

    #[test]
    fn test_invalid_forwarded_for_falls_back_to_peer() {
        let req = request(&[("x-forwarded-for", "unknown")], Some("192.0.2.10:443"));
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "192.0.2.10");
    }

    #[test]
    fn test_invalid_forwarded_for_falls_back_to_real_ip() {
        let req = request(
            &[("x-forwarded-for", "<script>, 10.0.0.1"), ("x-real-ip", "2001:db8::1")],
            Some("192.0.2.10:443"),
        );
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "2001:db8::1");
    }

    #[test]
    fn test_invalid_real_ip_falls_back_to_peer() {
        let req = request(&[("x-real-ip", "localhost")], Some("192.0.2.10:443"));
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "192.0.2.10");
    }

    #[test]
    fn test_unknown_is_empty() {
        let req = request(&[], None);
        assert_eq!(ClientIpSource::ForwardedHeaders.resolve(&req), "");
    }
}
