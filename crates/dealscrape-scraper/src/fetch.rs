//! HTTP fetcher for product pages.

use std::time::Duration;

use dealscrape_core::{AppConfig, DEFAULT_SCRAPER_USER_AGENT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect, Client, ClientBuilder, Url};
use thiserror::Error;

use crate::error::ScraperError;
use crate::guard::UrlGuard;
use crate::retry::retry_with_backoff;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";
const MAX_REDIRECTS: usize = 10;
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for fetching and guarding scrape targets.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    /// Whole-request deadline, including reading the body.
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Wait before retry `n` is `retry_backoff_base * n`.
    pub retry_backoff_base: Duration,
    /// Hosts exempt from the private-network checks of [`UrlGuard`].
    pub allowed_hosts: Vec<String>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_SCRAPER_USER_AGENT.to_owned(),
            max_retries: 2,
            retry_backoff_base: Duration::from_secs(1),
            allowed_hosts: Vec::new(),
        }
    }
}

impl ScraperSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.scraper_request_timeout_secs),
            user_agent: config.scraper_user_agent.clone(),
            max_retries: config.scraper_max_retries,
            retry_backoff_base: Duration::from_secs(config.scraper_retry_backoff_base_secs),
            allowed_hosts: config.scraper_allowed_hosts.clone(),
        }
    }
}

#[derive(Debug, Error)]
#[error("redirect to blocked URL {0}")]
struct BlockedRedirect(String);

/// Follows up to [`MAX_REDIRECTS`] hops, refusing any hop the guard blocks.
fn guarded_redirects(guard: UrlGuard) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if guard.is_blocked_url(attempt.url()) {
            let target = attempt.url().to_string();
            tracing::warn!(url = %target, "refusing redirect to blocked URL");
            attempt.error(BlockedRedirect(target))
        } else if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

/// Client settings shared by every fetcher: deadlines, browser headers and
/// the guarded redirect policy.
pub(crate) fn client_builder(settings: &ScraperSettings, guard: UrlGuard) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

    Client::builder()
        .timeout(settings.request_timeout)
        .connect_timeout(settings.request_timeout.min(MAX_CONNECT_TIMEOUT))
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .redirect(guarded_redirects(guard))
}

/// Downloads product pages as text, with browser-like headers and retries.
///
/// Cheap to share: holds one pooled `reqwest::Client`.
pub struct HtmlFetcher {
    client: Client,
    max_retries: u32,
    retry_backoff_base: Duration,
}

impl HtmlFetcher {
    /// Builds the underlying HTTP client.
    ///
    /// `guard` is re-applied to every redirect hop.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed
    /// (an invalid `User-Agent` header value, or TLS initialisation failure).
    pub fn new(settings: &ScraperSettings, guard: UrlGuard) -> Result<Self, ScraperError> {
        let client = client_builder(settings, guard).build()?;
        Ok(Self::with_client(client, settings))
    }

    /// Wraps an already configured client; retry settings come from `settings`.
    pub(crate) fn with_client(client: Client, settings: &ScraperSettings) -> Self {
        Self {
            client,
            max_retries: settings.max_retries,
            retry_backoff_base: settings.retry_backoff_base,
        }
    }

    /// GETs `url` and returns the response body.
    ///
    /// Network errors, timeouts and non-2xx statuses are retried with linear
    /// backoff; the last error is returned once retries run out.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: `url` does not parse (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: non-2xx after all retries.
    /// - [`ScraperError::Http`]: transport failure or timeout after all
    ///   retries, or a redirect refused by the guard (not retried).
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        retry_with_backoff(self.max_retries, self.retry_backoff_base, || {
            let parsed = parsed.clone();
            async move {
                tracing::debug!(url, "fetching page");
                let response = self.client.get(parsed).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
