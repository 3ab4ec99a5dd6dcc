//! Rejects scrape targets that point at the local machine or a private network.
//!
//! The host checks are lexical: they compare the hostname as the URL parser
//! canonicalizes it and do not resolve DNS. IPv4 literals are normalized by
//! the parser first, so `http://2130706433/` is seen as `127.0.0.1`. Beyond
//! that the rules are prefix matches: `172.` covers all of `172.0.0.0/8`
//! rather than just `172.16.0.0/12`, and `127.0.0.2` is not caught.

use reqwest::Url;

const LOOPBACK_HOSTS: [&str; 4] = ["localhost", "127.0.0.1", "0.0.0.0", "[::1]"];
const PRIVATE_PREFIXES: [&str; 3] = ["10.", "192.168.", "172."];
const INTERNAL_SUFFIXES: [&str; 2] = [".local", ".internal"];

/// URL policy applied before any network call and on every redirect hop.
#[derive(Debug, Clone, Default)]
pub struct UrlGuard {
    allowed_hosts: Vec<String>,
}

impl UrlGuard {
    /// A guard with no exemptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A guard that lets the given hosts through the loopback, private-range,
    /// and internal-suffix checks. Scheme and parse checks still apply.
    #[must_use]
    pub fn with_allowed_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Returns `true` if `url` must not be fetched. Unparsable input is blocked.
    #[must_use]
    pub fn is_blocked(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.is_blocked_url(&parsed),
            Err(_) => true,
        }
    }

    pub(crate) fn is_blocked_url(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return true;
        }
        let Some(host) = url.host_str() else {
            return true;
        };
        let host = host.to_ascii_lowercase();

        if self.allowed_hosts.iter().any(|allowed| *allowed == host) {
            return false;
        }

        is_local_host(&host)
    }
}

/// Checks a guard-less URL string against the default policy.
#[must_use]
pub fn is_blocked(url: &str) -> bool {
    UrlGuard::new().is_blocked(url)
}

fn is_local_host(host: &str) -> bool {
    LOOPBACK_HOSTS.contains(&host)
        || PRIVATE_PREFIXES.iter().any(|p| host.starts_with(p))
        || INTERNAL_SUFFIXES.iter().any(|s| host.ends_with(s))
}
