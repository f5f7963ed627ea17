use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Search Console authorization failed: {0}")]
    Auth(String),

    #[error("Search Console query failed: {0}")]
    Analytics(String),

    #[error("Recommendation request failed: {0}")]
    Request(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl AdvisorError {
    /// Short, single-line message suitable for showing to the user.
    /// The full error (including its source chain) is printed separately.
    #[inline]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Config(_) => {
                "The configuration is incomplete. Run `seo-advisor config` or set OPENAI_API_KEY."
            }
            Self::Fetch { .. } => "Could not download the page to analyse.",
            Self::Auth(_) => "Search Console authorization failed. Check the OAuth credentials.",
            Self::Analytics(_) => "Could not retrieve Search Console data for this site.",
            Self::Request(_) => "The recommendation service did not return a response.",
            Self::Input(_) => "Provide a valid http(s) URL and a non-empty niche.",
            Self::Io(_) | Self::Other(_) => "Error during the analysis.",
        }
    }
}

pub mod analytics;
pub mod commands;
pub mod config;
pub mod crawler;
pub mod pipeline;
pub mod recommendations;
