//! Target URL checks for the site evaluation endpoint.
//!
//! A target must be an absolute URL with an `http` or `https` scheme and a
//! host that is an IP literal (dotted IPv4 or bracketed IPv6) or a domain
//! name ending in an alphabetic top-level domain.

use std::net::{Ipv4Addr, Ipv6Addr};

use validator::{ValidateUrl, ValidationError};

/// Schemes accepted for evaluation targets (compared case-insensitively).
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Message returned to clients when a target URL is rejected.
pub const INVALID_URL_MESSAGE: &str = "URL must be a valid HTTP or HTTPS URL";

const MAX_LABEL_LEN: usize = 63;

/// Returns `true` when `candidate` is an absolute HTTP(S) URL with a routable host.
pub fn is_http_url(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((scheme, rest)) = candidate.split_once("://") else {
        return false;
    };

    if !ALLOWED_SCHEMES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = match authority.rsplit_once('@') {
        Some((_, host_port)) => host_port,
        None => authority,
    };

    let host_ok = match split_host_port(host_port) {
        Some(Host::Ipv6(inner)) => inner.parse::<Ipv6Addr>().is_ok(),
        Some(Host::Name(name)) => name.parse::<Ipv4Addr>().is_ok() || is_domain_name(name),
        None => false,
    };

    host_ok && candidate.validate_url()
}

/// `validator` custom-function adapter for [`is_http_url`].
pub fn validate_http_url(candidate: &str) -> Result<(), ValidationError> {
    if is_http_url(candidate) {
        return Ok(());
    }
    let mut err = ValidationError::new("http_url");
    err.message = Some(INVALID_URL_MESSAGE.into());
    Err(err)
}

enum Host<'a> {
    /// Contents of a `[...]` literal, brackets stripped.
    Ipv6(&'a str),
    Name(&'a str),
}

/// Host part of `host[:port]` or `[v6][:port]`. `None` unless the port, when
/// present, is a non-empty decimal that fits in a `u16`.
fn split_host_port(host_port: &str) -> Option<Host<'_>> {
    let (host, port) = if let Some(bracketed) = host_port.strip_prefix('[') {
        let (inner, tail) = bracketed.split_once(']')?;
        let port = match tail {
            "" => None,
            _ => Some(tail.strip_prefix(':')?),
        };
        (Host::Ipv6(inner), port)
    } else {
        match host_port.split_once(':') {
            Some((name, port)) => (Host::Name(name), Some(port)),
            None => (Host::Name(host_port), None),
        }
    };

    let port_ok = match port {
        None => true,
        Some(p) => p.bytes().all(|b| b.is_ascii_digit()) && p.parse::<u16>().is_ok(),
    };
    port_ok.then_some(host)
}

/// Dotted domain name: letters, digits, and inner hyphens per label, with a
/// top-level domain of at least two letters (or an `xn--` punycode label).
fn is_domain_name(name: &str) -> bool {
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.chars().count() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return false;
    }

    let tld = labels[labels.len() - 1];
    let is_punycode = tld.len() > 4
        && tld
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("xn--"));
    is_punycode || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}
