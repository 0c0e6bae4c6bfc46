//! SSRF-guarded link fetching.
//!
//! Every gate fails closed: an unparseable URL, an unresolvable host, a
//! private-range address, a timeout or a broken transfer all fold into a
//! rejected outcome. Redirects are followed by hand so that each hop passes
//! the same scheme, DNS and address gates as the first request.

use std::net::IpAddr;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, LOCATION};
use serde::Serialize;
use tokio::net::lookup_host;
use tracing::{debug, warn};
use url::{Host, Url};

use crate::config::AppConfig;
use crate::core::error::LensError;

/// Why a fetch was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MalformedUrl,
    DisallowedScheme,
    UnresolvableHost,
    ForbiddenAddress,
    TooManyRedirects,
    BadRedirect,
    FetchFailed,
}

/// Total result of resolving one candidate URL.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched {
        final_url: String,
        body: Vec<u8>,
        charset: Option<String>,
    },
    Rejected {
        url: String,
        reason: RejectReason,
    },
}

/// Validates and fetches untrusted URLs within hard resource bounds.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    client: reqwest::Client,
    byte_cap: usize,
    max_hops: usize,
    allow_private: bool,
}

impl LinkResolver {
    pub fn new(config: &AppConfig) -> Result<Self, LensError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            // Hops are validated and followed manually.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            byte_cap: config.fetch_byte_cap,
            max_hops: config.max_redirect_hops,
            allow_private: config.allow_private_networks,
        })
    }

    /// Validate and fetch one URL. Never errors outward.
    pub async fn resolve(&self, raw: &str) -> FetchOutcome {
        let rejected = |reason: RejectReason| {
            warn!("link rejected ({reason:?}): {raw}");
            FetchOutcome::Rejected {
                url: raw.to_string(),
                reason,
            }
        };

        let Ok(mut current) = Url::parse(raw) else {
            return rejected(RejectReason::MalformedUrl);
        };

        for _hop in 0..=self.max_hops {
            if let Err(reason) = self.vet(&current).await {
                return rejected(reason);
            }

            let resp = match self.client.get(current.as_str()).send().await {
                Ok(resp) => resp,
                Err(err) => {
                    debug!("fetch error for {current}: {err}");
                    return rejected(RejectReason::FetchFailed);
                }
            };

            if resp.status().is_redirection() {
                let Some(next) = resp
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|loc| current.join(loc).ok())
                else {
                    return rejected(RejectReason::BadRedirect);
                };
                current = next;
                continue;
            }

            let charset = charset_from_response(&resp);
            return match self.read_capped(resp).await {
                Ok(body) => FetchOutcome::Fetched {
                    final_url: current.to_string(),
                    body,
                    charset,
                },
                Err(err) => {
                    debug!("body read error for {current}: {err}");
                    rejected(RejectReason::FetchFailed)
                }
            };
        }

        rejected(RejectReason::TooManyRedirects)
    }

    /// Scheme, DNS and address gates for one hop. Resolution runs fresh on
    /// every call so a swapped-in record is re-checked against the forbidden
    /// ranges.
    async fn vet(&self, url: &Url) -> Result<(), RejectReason> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RejectReason::DisallowedScheme);
        }

        let addrs: Vec<IpAddr> = match url.host() {
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            Some(Host::Domain(domain)) => {
                let port = url.port_or_known_default().unwrap_or(80);
                match lookup_host((domain, port)).await {
                    Ok(found) => found.map(|addr| addr.ip()).collect(),
                    Err(_) => return Err(RejectReason::UnresolvableHost),
                }
            }
            None => return Err(RejectReason::MalformedUrl),
        };

        if addrs.is_empty() {
            return Err(RejectReason::UnresolvableHost);
        }
        if !self.allow_private && addrs.iter().any(|ip| is_forbidden_addr(*ip)) {
            return Err(RejectReason::ForbiddenAddress);
        }
        Ok(())
    }

    /// Read at most `byte_cap` bytes of the body, whatever the server claims.
    async fn read_capped(&self, mut resp: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            let remaining = self.byte_cap.saturating_sub(body.len());
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Loopback, private, link-local and otherwise non-routable destinations.
fn is_forbidden_addr(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_unspecified()
                || v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            let seg = v6.segments();
            if v6.is_unspecified()
                || v6.is_loopback()
                || (seg[0] & 0xfe00) == 0xfc00 // unique local fc00::/7
                || (seg[0] & 0xffc0) == 0xfe80 // link local fe80::/10
            {
                return true;
            }
            // v4-mapped and v4-compatible addresses answer for their inner v4.
            match v6.to_ipv4() {
                Some(v4) => is_forbidden_addr(IpAddr::V4(v4)),
                None => false,
            }
        }
    }
}

fn charset_from_response(resp: &reqwest::Response) -> Option<String> {
    let content_type = resp.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        key.eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches('"').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn resolver() -> LinkResolver {
        LinkResolver::new(&AppConfig::default()).unwrap()
    }

    fn forbidden(addr: &str) -> bool {
        is_forbidden_addr(addr.parse().unwrap())
    }

    #[test]
    fn loopback_and_private_v4_ranges_are_forbidden() {
        assert!(forbidden("127.0.0.1"));
        assert!(forbidden("0.0.0.0"));
        assert!(forbidden("10.0.0.1"));
        assert!(forbidden("192.168.1.1"));
        assert!(forbidden("172.16.0.1"));
        assert!(forbidden("172.31.255.255"));
        assert!(forbidden("169.254.169.254"));
    }

    #[test]
    fn public_v4_addresses_are_allowed() {
        assert!(!forbidden("8.8.8.8"));
        assert!(!forbidden("1.1.1.1"));
        // 172.x outside the /12 block is public
        assert!(!forbidden("172.32.0.1"));
        assert!(!forbidden("172.15.0.1"));
    }

    #[test]
    fn v6_special_ranges_are_forbidden() {
        assert!(forbidden("::1"));
        assert!(forbidden("::"));
        assert!(forbidden("fe80::1"));
        assert!(forbidden("fc00::1"));
        assert!(forbidden("fd12:3456::1"));
        // v4-mapped private address
        assert!(forbidden("::ffff:10.0.0.1"));
        assert!(forbidden("::ffff:127.0.0.1"));
    }

    #[test]
    fn public_v6_addresses_are_allowed() {
        assert!(!forbidden("2606:4700::1111"));
        assert!(!forbidden("::ffff:8.8.8.8"));
    }

    #[test]
    fn typed_addresses_agree_with_parsed_ones() {
        assert!(is_forbidden_addr(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 7))));
        assert!(is_forbidden_addr(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[tokio::test]
    async fn unparseable_urls_are_rejected() {
        let outcome = resolver().resolve("not a url at all").await;
        assert_eq!(
            outcome,
            FetchOutcome::Rejected {
                url: "not a url at all".to_string(),
                reason: RejectReason::MalformedUrl,
            }
        );
    }

    #[tokio::test]
    async fn non_http_schemes_are_rejected() {
        let outcome = resolver().resolve("ftp://files.example.com/x").await;
        assert!(matches!(
            outcome,
            FetchOutcome::Rejected {
                reason: RejectReason::DisallowedScheme,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unresolvable_hosts_fail_closed() {
        let outcome = resolver()
            .resolve("http://definitely-not-a-real-host.invalid/")
            .await;
        assert!(matches!(
            outcome,
            FetchOutcome::Rejected {
                reason: RejectReason::UnresolvableHost,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn loopback_literals_are_rejected_before_any_request() {
        let outcome = resolver().resolve("https://127.0.0.1:9/secret").await;
        assert!(matches!(
            outcome,
            FetchOutcome::Rejected {
                reason: RejectReason::ForbiddenAddress,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn v6_loopback_literals_are_rejected() {
        let outcome = resolver().resolve("http://[::1]/admin").await;
        assert!(matches!(
            outcome,
            FetchOutcome::Rejected {
                reason: RejectReason::ForbiddenAddress,
                ..
            }
        ));
    }
}
