pub mod extractor;


use anyhow::{Context, anyhow};
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::Agent;
use url::Url;

use self::extractor::{PageSummary, extract_summary};
use crate::config::FetchConfig;
use crate::{AdvisorError, Result};

/// Fixed browser-like user agent sent with every page request
pub const FETCH_USER_AGENT: &str = "Mozilla/5.0";
/// Fixed timeout for page requests
pub const FETCH_TIMEOUT_SECONDS: u64 = 20;
/// Largest response body read from a page, well above ureq's 10 MB default
pub const FETCH_BODY_LIMIT_BYTES: u64 = 64 * 1024 * 1024;

/// Blocking HTTP client that downloads a single page
#[derive(Debug, Clone)]
pub struct PageFetcher {
    agent: Agent,
    fail_on_error_status: bool,
}

impl PageFetcher {
    /// Create a new page fetcher with the given retrieval policy
    #[inline]
    pub fn new(config: &FetchConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(FETCH_TIMEOUT_SECONDS)))
            .user_agent(FETCH_USER_AGENT)
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            fail_on_error_status: config.fail_on_error_status,
        }
    }

    /// Fetch `url` and extract its SEO summary.
    ///
    /// Only retrieval can fail; any HTML is accepted by the extractor.
    #[inline]
    pub fn analyze(&self, url: &Url) -> Result<PageSummary> {
        let html = self.fetch(url)?;
        let summary = extract_summary(&html);

        info!(
            "Extracted {} words, {} h1 and {} h2 headings from {}",
            summary.word_count,
            summary.headings_h1.len(),
            summary.headings_h2.len(),
            url
        );

        Ok(summary)
    }

    /// Perform a single HTTP GET request and return the response body
    #[inline]
    pub fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Making HTTP GET request to: {}", url);

        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| fetch_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            if self.fail_on_error_status {
                debug!("HTTP request failed with status {}: {}", status, url);
                return Err(fetch_error(url, &format!("HTTP error {}", status.as_u16())));
            }
            warn!(
                "HTTP status {} for {}, parsing the error page anyway",
                status, url
            );
        }

        // Decodes using the charset of the Content-Type header
        let text = response
            .body_mut()
            .with_config()
            .limit(FETCH_BODY_LIMIT_BYTES)
            .read_to_string()
            .map_err(|e| fetch_error(url, &e))?;
        debug!("Successfully read {} bytes from {}", text.len(), url);

        Ok(text)
    }
}

impl Default for PageFetcher {
    /// Create a fetcher with the fail-fast status policy
    #[inline]
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

fn fetch_error(url: &Url, error: &dyn std::fmt::Display) -> AdvisorError {
    AdvisorError::Fetch {
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// Validate and normalize a URL
#[inline]
pub fn validate_url(url_str: &str) -> Result<Url> {
    parse_http_url(url_str.trim()).map_err(|e| AdvisorError::Input(format!("{e:#}")))
}

fn parse_http_url(url_str: &str) -> anyhow::Result<Url> {
    let url = Url::parse(url_str).with_context(|| format!("Invalid URL format: {}", url_str))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("URL must use HTTP or HTTPS scheme: {}", url_str));
    }

    if url.host_str().is_none() {
        return Err(anyhow!("URL must have a valid host: {}", url_str));
    }

    Ok(url)
}

/// The Search Console URL-prefix property for a page (`scheme://host[:port]/`)
#[inline]
pub fn site_property(url: &Url) -> String {
    format!("{}/", url.origin().ascii_serialization())
}
