// Recommendations module
// Builds the SEO consultant prompt and submits it to the completion service

pub mod openai;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::Result;
use crate::analytics::{PROMPT_ROW_LIMIT, QueryRow, render_query_table, top_queries};
use crate::crawler::extractor::PageSummary;

pub use openai::{ChatMessage, OpenAiClient, TEMPERATURE};

/// Turns a page summary into free-text SEO recommendations
#[derive(Debug, Clone)]
pub struct RecommendationRequester {
    client: OpenAiClient,
    response_language: String,
}

impl RecommendationRequester {
    #[inline]
    pub fn new(client: OpenAiClient, response_language: impl Into<String>) -> Self {
        Self {
            client,
            response_language: response_language.into(),
        }
    }

    /// Ask the model for recommendations. The reply is returned as-is.
    #[inline]
    pub fn request_recommendations(
        &self,
        summary: &PageSummary,
        niche: &str,
        analytics_rows: Option<&[QueryRow]>,
    ) -> Result<String> {
        let prompt = build_prompt(summary, niche, analytics_rows, &self.response_language);
        debug!("Built prompt with {} characters", prompt.len());
        self.client.complete(&prompt)
    }
}

/// Assemble the single user message sent to the model.
///
/// When analytics rows are given, only the top [`PROMPT_ROW_LIMIT`] by
/// impressions are embedded.
pub fn build_prompt(
    summary: &PageSummary,
    niche: &str,
    analytics_rows: Option<&[QueryRow]>,
    response_language: &str,
) -> String {
    let top_rows = analytics_rows.map(|rows| top_queries(rows.to_vec(), PROMPT_ROW_LIMIT));

    let analytics_section = top_rows
        .as_deref()
        .map(|rows| {
            format!(
                "\nSEARCH CONSOLE DATA (last 28 days, top {PROMPT_ROW_LIMIT} queries by impressions):\n{}\n",
                render_query_table(rows)
            )
        })
        .unwrap_or_default();
    let quick_wins_task = if top_rows.is_some() {
        "5. Point out quick wins from the Search Console queries (high impressions, low CTR or positions 5 to 20).\n"
    } else {
        ""
    };

    format!(
        "You are a senior SEO consultant.

Goal: improve the organic SEO of this page for the niche \"{niche}\".

PAGE DATA:
- Title: {title}
- Meta description: {meta_description}
- H1: {h1:?}
- H2: {h2:?}
- Word count: {word_count}
- Text: {excerpt}
{analytics_section}
Tasks:
1. List 10 priority keywords (as a table).
2. Suggest a new title (at most 60 characters) and meta description (at most 155 characters).
3. Describe on-page improvements (content and structure).
4. Suggest 3 new strategic pages or articles.
{quick_wins_task}
Answer in {response_language}, well structured.",
        title = summary.title,
        meta_description = summary.meta_description,
        h1 = summary.headings_h1,
        h2 = summary.headings_h2,
        word_count = summary.word_count,
        excerpt = summary.excerpt,
    )
}
