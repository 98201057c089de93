//! Host extraction from git remote URLs.
//!
//! Passports are matched against the host of `remote.origin.url`, compared
//! byte for byte, so the host is sliced out of the URL as written rather
//! than normalized.

/// Extract the host of a git remote URL.
///
/// Supported forms:
/// - `scheme://[user[:password]@]host[:port]/path` (`https`, `ssh`, `git`, ...)
/// - scp-like `[user@]host:path`
///
/// Returns `None` for local paths, `file://` URLs and anything without a
/// host.
pub fn remote_host(remote_url: &str) -> Option<&str> {
    let url = remote_url.trim();

    let authority = if let Some((_, rest)) = url.split_once("://") {
        rest.split('/').next().unwrap_or_default()
    } else if let Some((head, _)) = url.split_once(':') {
        // `./dir:with-colon` is a path, not scp syntax.
        if head.contains('/') {
            return None;
        }
        head
    } else {
        return None;
    };

    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = strip_port(host_port);
    (!host.is_empty()).then_some(host)
}

fn strip_port(host_port: &str) -> &str {
    // Bracketed IPv6 literal.
    if host_port.starts_with('[') {
        return match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => host_port,
        };
    }
    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    }
}
