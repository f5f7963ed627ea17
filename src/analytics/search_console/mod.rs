
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::{DateRange, QueryRow, round_to};
use crate::config::{ConfigError, OAuthCredentials, SearchConsoleConfig};
use crate::{AdvisorError, Result};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Blocking client for the Search Console search analytics API
#[derive(Debug, Clone)]
pub struct SearchConsoleClient {
    agent: ureq::Agent,
    credentials: OAuthCredentials,
    token_url: Url,
    api_base_url: Url,
    row_limit: u32,
}

/// Short-lived bearer token obtained from the refresh-token grant
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    #[inline]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchAnalyticsRequest {
    start_date: NaiveDate,
    end_date: NaiveDate,
    dimensions: Vec<&'static str>,
    row_limit: u32,
}

#[derive(Debug, Deserialize)]
struct SearchAnalyticsResponse {
    #[serde(default)]
    rows: Vec<ApiRow>,
}

#[derive(Debug, Deserialize)]
struct ApiRow {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    clicks: f64,
    #[serde(default)]
    impressions: f64,
    #[serde(default)]
    ctr: f64,
    #[serde(default)]
    position: f64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl SearchConsoleClient {
    #[inline]
    pub fn new(config: &SearchConsoleConfig, credentials: OAuthCredentials) -> Result<Self> {
        let token_url = Url::parse(&config.token_url)
            .map_err(|_| ConfigError::InvalidUrl(config.token_url.clone()))?;
        let api_base_url = Url::parse(&config.api_base_url)
            .map_err(|_| ConfigError::InvalidUrl(config.api_base_url.clone()))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            credentials,
            token_url,
            api_base_url,
            row_limit: config.row_limit,
        })
    }

    /// Authorize and fetch query rows for `site` over the 28 days ending on `today`
    #[inline]
    pub fn fetch_query_rows(&self, site: &str, today: NaiveDate) -> Result<Vec<QueryRow>> {
        let token = self.authorize()?;
        self.query(&token, site, DateRange::last_28_days(today))
    }

    /// Exchange the refresh token for an access token
    #[inline]
    pub fn authorize(&self) -> Result<AccessToken> {
        debug!("Requesting Search Console access token from {}", self.token_url);

        let mut response = self
            .agent
            .post(self.token_url.as_str())
            .send_form([
                ("grant_type", "refresh_token"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
            ])
            .map_err(|e| AdvisorError::Auth(format!("Token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AdvisorError::Auth(format!("Failed to read token response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<TokenErrorResponse>(&body).map_or_else(
                |_| format!("HTTP {}", status.as_u16()),
                |err| match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
            );
            warn!("Token request rejected with status {}", status.as_u16());
            return Err(AdvisorError::Auth(detail));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisorError::Auth(format!("Failed to parse token response: {e}")))?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AdvisorError::Auth("Token response has no access_token".to_string()))?;

        debug!(
            "Obtained access token (expires in {:?} seconds)",
            token.expires_in
        );
        Ok(AccessToken(access_token))
    }

    /// Run a search analytics query grouped by search query
    #[inline]
    pub fn query(
        &self,
        token: &AccessToken,
        site: &str,
        range: DateRange,
    ) -> Result<Vec<QueryRow>> {
        let url = self.query_url(site)?;

        let request = SearchAnalyticsRequest {
            start_date: range.start,
            end_date: range.end,
            dimensions: vec!["query"],
            row_limit: self.row_limit,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| AdvisorError::Analytics(format!("Failed to serialize query: {e}")))?;

        debug!(
            "Querying Search Console for {} from {} to {}",
            site, range.start, range.end
        );

        let mut response = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token.secret()))
            .send(&request_json)
            .map_err(|e| AdvisorError::Analytics(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AdvisorError::Analytics(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                |_| format!("HTTP {}", status.as_u16()),
                |err| format!("HTTP {}: {}", status.as_u16(), err.error.message),
            );
            return Err(if status.as_u16() == 401 {
                AdvisorError::Auth(detail)
            } else {
                AdvisorError::Analytics(detail)
            });
        }

        let parsed: SearchAnalyticsResponse = serde_json::from_str(&body)
            .map_err(|e| AdvisorError::Analytics(format!("Failed to parse response: {e}")))?;

        let rows: Vec<QueryRow> = parsed.rows.into_iter().filter_map(into_query_row).collect();
        info!("Retrieved {} query rows for {}", rows.len(), site);

        Ok(rows)
    }

    /// `{api_base_url}sites/{site}/searchAnalytics/query` with the site percent-encoded
    fn query_url(&self, site: &str) -> Result<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidUrl(self.api_base_url.to_string()))?
            .pop_if_empty()
            .extend(["sites", site, "searchAnalytics", "query"]);
        Ok(url)
    }
}

fn into_query_row(row: ApiRow) -> Option<QueryRow> {
    let query = row.keys.into_iter().next()?;

    Some(QueryRow {
        query,
        clicks: row.clicks.max(0.0).round() as u64,
        impressions: row.impressions.max(0.0).round() as u64,
        ctr: round_to(row.ctr * 100.0, 2),
        position: round_to(row.position, 1),
    })
}
