// ABOUTME: URL validation: scheme, loopback/private-host blocklist, and the supported-domain
// ABOUTME: whitelist. The sole SSRF gate -- nothing is fetched without a ValidatedUrl.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use url::{Host, Url};

use crate::error::ValidationError;
use crate::scenario::SourceKind;

/// The curated domains the pipeline may fetch from. A hostname matches if
/// it equals the domain or is a subdomain of it.
pub const SUPPORTED_DOMAINS: [(&str, SourceKind); 2] = [
    ("booth.pm", SourceKind::Booth),
    ("talto.cc", SourceKind::Talto),
];

const BLOCKED_HOSTNAMES: [&str; 1] = ["localhost"];

/// A URL that passed validation, plus the whitelist domain it matched.
///
/// Only `validate` constructs this type; the fetch paths take it instead of
/// a raw string, so an unvalidated URL cannot reach the network layer.
///
/// The check is purely syntactic and host-based: it does not resolve DNS or
/// re-check the address at connect time, and IPv6 private/ULA ranges are
/// not covered. Known limitation carried from the original design.
#[derive(Debug, Clone)]
pub struct ValidatedUrl {
    url: Url,
    source: SourceKind,
}

impl ValidatedUrl {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Validate a candidate URL string. Rules apply in order, first failure
/// wins: absolute-URL parse, https-only scheme, loopback blocklist,
/// private IPv4 literal blocklist, supported-domain whitelist.
pub fn validate(input: &str) -> Result<ValidatedUrl, ValidationError> {
    let url = Url::parse(input).map_err(|_| ValidationError::InvalidUrl)?;

    if url.scheme() != "https" {
        return Err(ValidationError::InsecureScheme);
    }

    let source = match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.to_ascii_lowercase();
            if BLOCKED_HOSTNAMES.contains(&domain.as_str()) {
                return Err(ValidationError::BlockedHost);
            }
            match_supported_domain(&domain).ok_or(ValidationError::UnsupportedDomain)?
        }
        Some(Host::Ipv4(ip)) => {
            if ip == Ipv4Addr::LOCALHOST || ip.is_unspecified() || is_private_ipv4(ip) {
                return Err(ValidationError::BlockedHost);
            }
            // An IP literal can never match the domain whitelist.
            return Err(ValidationError::UnsupportedDomain);
        }
        Some(Host::Ipv6(ip)) => {
            if ip.is_loopback() {
                return Err(ValidationError::BlockedHost);
            }
            return Err(ValidationError::UnsupportedDomain);
        }
        None => return Err(ValidationError::InvalidUrl),
    };

    Ok(ValidatedUrl { url, source })
}

fn match_supported_domain(host: &str) -> Option<SourceKind> {
    for (domain, source) in SUPPORTED_DOMAINS {
        if host == domain || host.ends_with(&format!(".{}", domain)) {
            return Some(source);
        }
    }
    None
}

/// RFC1918 private ranges. Loopback and unspecified literals are handled
/// separately; other reserved ranges are not checked.
fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let private_10: Ipv4Net = "10.0.0.0/8".parse().unwrap();
    let private_172: Ipv4Net = "172.16.0.0/12".parse().unwrap();
    let private_192: Ipv4Net = "192.168.0.0/16".parse().unwrap();

    private_10.contains(&ip) || private_172.contains(&ip) || private_192.contains(&ip)
}
