//! Request guard: blocks outbound targets on internal networks and cleans
//! untrusted text before it can reach a generated prompt.

use std::error::Error;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

pub const DEFAULT_PROMPT_LENGTH: usize = 3000;

const METADATA_HOSTNAME: &str = "metadata.google.internal";
const METADATA_IPV4: Ipv4Addr = Ipv4Addr::new(169, 254, 169, 254);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    InvalidUrl,
    SchemeNotAllowed(String),
    InternalAddress(String),
    CloudMetadata(String),
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "invalid URL"),
            Self::SchemeNotAllowed(scheme) => write!(f, "scheme not allowed: {scheme}"),
            Self::InternalAddress(host) => {
                write!(f, "access to internal addresses forbidden: {host}")
            }
            Self::CloudMetadata(host) => {
                write!(f, "cloud metadata access forbidden: {host}")
            }
        }
    }
}

impl Error for GuardError {}

/// Validates a caller-supplied URL before any network access.
///
/// A missing scheme defaults to `https`. Only `http` and `https` pass, and
/// the host must not resolve into the loopback, private, link-local, or
/// cloud-metadata ranges.
///
/// # Errors
/// Returns `GuardError` when the URL does not parse, carries a disallowed
/// scheme, or targets an internal or metadata address.
pub fn validate_external_url(raw: &str) -> Result<Url, GuardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GuardError::InvalidUrl);
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|_| GuardError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(GuardError::SchemeNotAllowed(other.to_string())),
    }

    let host = url.host().ok_or(GuardError::InvalidUrl)?;
    let display = host_display(&host);
    if is_blocked_host(&host) {
        return Err(GuardError::InternalAddress(display));
    }
    if is_metadata_host(&host) {
        return Err(GuardError::CloudMetadata(display));
    }

    Ok(url)
}

/// Cleans untrusted free text before it is embedded in a generated prompt.
///
/// Truncates to `max_length` characters on the raw input, then strips ASCII
/// control characters (keeping newline, carriage return, and tab), then
/// collapses CRLF pairs to a single newline, then trims the ends. The
/// truncate-before-cleanup order is load-bearing for boundary behavior.
#[must_use]
pub fn sanitize_for_prompt(text: &str, max_length: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let cleaned: String = text
        .chars()
        .take(max_length)
        .filter(|ch| !is_stripped_control(*ch))
        .collect();
    cleaned.replace("\r\n", "\n").trim().to_string()
}

const fn is_stripped_control(ch: char) -> bool {
    matches!(ch, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

fn host_display(host: &Host<&str>) -> String {
    match host {
        Host::Domain(domain) => (*domain).to_string(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    }
}

fn is_blocked_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => is_blocked_domain(domain),
        Host::Ipv4(addr) => is_blocked_ipv4(*addr),
        Host::Ipv6(addr) => is_blocked_ipv6(*addr),
    }
}

fn is_blocked_domain(domain: &str) -> bool {
    let lowered = domain.to_ascii_lowercase();
    lowered == "localhost" || lowered.ends_with(".localhost") || lowered == METADATA_HOSTNAME
}

fn is_blocked_ipv4(addr: Ipv4Addr) -> bool {
    addr.is_loopback() || addr.is_private() || addr.is_link_local() || addr.octets()[0] == 0
}

fn is_blocked_ipv6(addr: Ipv6Addr) -> bool {
    let segments = addr.segments();
    addr.is_loopback()
        || addr.is_unspecified()
        || (segments[0] & 0xfe00) == 0xfc00
        || (segments[0] & 0xffc0) == 0xfe80
}

fn is_metadata_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain.eq_ignore_ascii_case(METADATA_HOSTNAME),
        Host::Ipv4(addr) => *addr == METADATA_IPV4,
        Host::Ipv6(_) => false,
    }
}
