use clap::{Parser, Subcommand};
use console::style;
use seo_advisor::commands::{AnalyzeOptions, analyze, extract};
use seo_advisor::config::{run_interactive_config, show_config};
use seo_advisor::{AdvisorError, Result};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "seo-advisor")]
#[command(about = "Analyse a web page and get SEO recommendations from a language model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a page and generate SEO recommendations
    Analyze {
        /// URL of the page to analyse
        url: String,
        /// Target niche or search intent, e.g. "canalizador Lisboa". Prompted for when omitted
        #[arg(long)]
        niche: Option<String>,
        /// Search Console property to query. Defaults to the origin of the URL
        #[arg(long)]
        site: Option<String>,
        /// Skip Search Console data even when credentials are configured
        #[arg(long)]
        no_analytics: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a page and show the extracted SEO fields only
    Extract {
        /// URL of the page to extract
        url: String,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure API keys and settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            url,
            niche,
            site,
            no_analytics,
            json,
        } => analyze(AnalyzeOptions {
            url,
            niche,
            site,
            no_analytics,
            json,
        }),
        Commands::Extract { url, json } => extract(&url, json),
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
            Ok(())
        }
    }
}

fn report_error(error: &AdvisorError) {
    eprintln!("{}", style(error.user_message()).red().bold());
    eprintln!("{error:?}");
}
