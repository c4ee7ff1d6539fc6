use std::net::SocketAddr;

/// Identity used when neither a forwarded header nor a peer address exists.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the rate-limit identity of a request.
///
/// The first entry of `X-Forwarded-For` wins when present and non-empty,
/// otherwise the peer IP (port dropped).
pub fn client_identity(forwarded_for: Option<&str>, peer: Option<SocketAddr>) -> String {
    if let Some(first) = forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
    {
        return first.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
