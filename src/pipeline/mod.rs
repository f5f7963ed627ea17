
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::analytics::{PROMPT_ROW_LIMIT, QueryRow, SearchConsoleClient, top_queries};
use crate::config::Config;
use crate::crawler::extractor::PageSummary;
use crate::crawler::{PageFetcher, site_property};
use crate::recommendations::{OpenAiClient, RecommendationRequester};
use crate::{AdvisorError, Result};

/// One analysis run as requested by the user
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub url: Url,
    pub niche: String,
    /// Search Console property; defaults to the origin of `url`
    pub site: Option<String>,
    pub use_analytics: bool,
}

/// Everything produced by one run of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    pub niche: String,
    pub summary: PageSummary,
    pub query_rows: Option<Vec<QueryRow>>,
    pub recommendations: String,
}

/// Fetch, optional analytics, then recommendations, in that order.
/// The first failing step aborts the run.
#[derive(Debug)]
pub struct Pipeline {
    fetcher: PageFetcher,
    analytics: Option<SearchConsoleClient>,
    requester: RecommendationRequester,
}

impl Pipeline {
    /// Build the pipeline from configuration.
    ///
    /// Fails with a configuration error when the completion API key is
    /// missing; analytics is only enabled when complete OAuth credentials exist.
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;

        let client = OpenAiClient::new(&config.openai, api_key)?;
        let requester =
            RecommendationRequester::new(client, config.openai.response_language.clone());

        let analytics = match config.search_console.credentials() {
            Some(credentials) => Some(SearchConsoleClient::new(
                &config.search_console,
                credentials,
            )?),
            None => {
                debug!("Search Console credentials not configured, analytics disabled");
                None
            }
        };

        Ok(Self {
            fetcher: PageFetcher::new(&config.fetch),
            analytics,
            requester,
        })
    }

    #[inline]
    pub fn analytics_enabled(&self) -> bool {
        self.analytics.is_some()
    }

    /// Run every step for `request`, reporting progress on `bar`
    #[inline]
    pub fn run(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
        bar: &ProgressBar,
    ) -> Result<AnalysisReport> {
        let niche = request.niche.trim();
        if niche.is_empty() {
            return Err(AdvisorError::Input("niche must not be empty".to_string()));
        }

        info!("Analysing {} for niche '{}'", request.url, niche);

        bar.set_message(format!("Fetching {}", request.url));
        let summary = self.fetcher.analyze(&request.url)?;

        let query_rows = match (&self.analytics, request.use_analytics) {
            (Some(client), true) => {
                let site = request
                    .site
                    .clone()
                    .unwrap_or_else(|| site_property(&request.url));
                bar.set_message(format!("Loading Search Console data for {site}"));
                let rows = client.fetch_query_rows(&site, today)?;
                Some(top_queries(rows, PROMPT_ROW_LIMIT))
            }
            _ => None,
        };

        bar.set_message("Generating SEO recommendations");
        let recommendations =
            self.requester
                .request_recommendations(&summary, niche, query_rows.as_deref())?;

        Ok(AnalysisReport {
            url: request.url.to_string(),
            niche: niche.to_string(),
            summary,
            query_rows,
            recommendations,
        })
    }
}

/// Spinner shown on stderr while a step runs; hidden when nobody is watching
#[inline]
pub fn progress_spinner() -> ProgressBar {
    if console::user_attended_stderr() {
        let bar = ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("style template is valid"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    }
}
