use anyhow::Context;
use chrono::Local;
use console::style;
use dialoguer::Input;
use tracing::info;

use crate::analytics::render_query_table;
use crate::config::Config;
use crate::crawler::extractor::PageSummary;
use crate::crawler::{PageFetcher, validate_url};
use crate::pipeline::{AnalysisReport, AnalysisRequest, Pipeline, progress_spinner};
use crate::{AdvisorError, Result};

/// Options collected by the `analyze` command
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub url: String,
    pub niche: Option<String>,
    pub site: Option<String>,
    pub no_analytics: bool,
    pub json: bool,
}

/// Analyse a page and print SEO recommendations
#[inline]
pub fn analyze(options: AnalyzeOptions) -> Result<()> {
    if options.url.trim().is_empty() {
        return Err(AdvisorError::Input("URL must not be empty".to_string()));
    }
    let url = validate_url(&options.url)?;

    let config = Config::load()?;
    // The API key is checked here so a missing key is reported before prompting or fetching
    let pipeline = Pipeline::from_config(&config)?;

    let niche = match options.niche {
        Some(niche) => niche,
        None => prompt_niche()?,
    };
    if niche.trim().is_empty() {
        return Err(AdvisorError::Input("niche must not be empty".to_string()));
    }

    if !options.no_analytics && !pipeline.analytics_enabled() {
        info!("Search Console credentials not configured, continuing without analytics");
    }

    let request = AnalysisRequest {
        url,
        niche,
        site: options.site,
        use_analytics: !options.no_analytics,
    };

    let bar = progress_spinner();
    let result = pipeline.run(&request, Local::now().date_naive(), &bar);
    bar.finish_and_clear();
    let report = result?;

    if options.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Fetch a page and print the extracted summary without contacting the model
#[inline]
pub fn extract(url: &str, json: bool) -> Result<()> {
    let url = validate_url(url)?;
    let config = Config::load()?;

    let bar = progress_spinner();
    bar.set_message(format!("Fetching {url}"));
    let result = PageFetcher::new(&config.fetch).analyze(&url);
    bar.finish_and_clear();
    let summary = result?;

    if json {
        print_json(&summary)?;
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn prompt_niche() -> Result<String> {
    let niche: String = Input::new()
        .with_prompt("Niche / search intent (e.g. canalizador Lisboa)")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Niche cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Failed to read niche")?;
    Ok(niche)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_summary(summary: &PageSummary) {
    println!("{}", style("📄 Page Summary").bold().cyan());
    println!("  Title: {}", summary.title);
    println!("  Meta description: {}", summary.meta_description);
    println!("  H1: {}", format_headings(&summary.headings_h1));
    println!("  H2: {}", format_headings(&summary.headings_h2));
    println!("  Word count: {}", summary.word_count);
    println!();
    println!("{}", style("Excerpt:").bold());
    println!("{}", summary.excerpt);
}

fn print_report(report: &AnalysisReport) {
    println!("{} {}", style("🔍 Analysed:").bold(), report.url);
    println!("{} {}", style("🎯 Niche:").bold(), report.niche);
    println!();
    print_summary(&report.summary);

    if let Some(rows) = &report.query_rows {
        println!();
        println!(
            "{}",
            style("📊 Search Console (last 28 days)").bold().cyan()
        );
        if rows.is_empty() {
            println!("  No query data for this property.");
        } else {
            println!("{}", render_query_table(rows));
        }
    }

    println!();
    println!("{}", style("📈 SEO Recommendations").bold().green());
    println!("{}", report.recommendations);
}

fn format_headings(headings: &[String]) -> String {
    if headings.is_empty() {
        style("(none)").dim().to_string()
    } else {
        headings.join(" | ")
    }
}
