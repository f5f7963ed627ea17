
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Password};
use std::path::Path;
use std::time::Duration;

use super::settings::CONFIG_FILE_NAME;
use super::{Config, ConfigError, OpenAiConfig, SearchConsoleConfig};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 SEO Advisor Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("OpenAI Configuration").bold().yellow());
    eprintln!("The API key is required to generate recommendations.");
    eprintln!();

    configure_openai(&mut config.openai)?;

    eprintln!();
    eprintln!("{}", style("Search Console Configuration").bold().yellow());
    eprintln!("Optional: OAuth client credentials and a refresh token add query data to the analysis.");
    eprintln!();

    if Confirm::new()
        .with_prompt("Configure Search Console access?")
        .default(config.search_console.credentials().is_some())
        .interact()?
    {
        configure_search_console(&mut config.search_console)?;
    }

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_openai_connection(&config.openai) {
        eprintln!("{}", style("✓ OpenAI API reachable with this key!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not verify the OpenAI API key").yellow()
        );
        eprintln!("You can continue, but analyses will fail until the key is valid.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("OpenAI Settings:").bold().yellow());
    eprintln!(
        "  API Key: {}",
        style(mask_secret(config.openai.api_key.as_deref())).cyan()
    );
    eprintln!("  Base URL: {}", style(&config.openai.base_url).cyan());
    eprintln!("  Model: {}", style(&config.openai.model).cyan());
    eprintln!(
        "  Timeout: {}",
        style(format!("{}s", config.openai.timeout_seconds)).cyan()
    );
    eprintln!(
        "  Response Language: {}",
        style(&config.openai.response_language).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Fetch Settings:").bold().yellow());
    eprintln!(
        "  Fail on error status: {}",
        style(config.fetch.fail_on_error_status).cyan()
    );

    let search_console = &config.search_console;
    eprintln!();
    eprintln!("{}", style("Search Console Settings:").bold().yellow());
    eprintln!(
        "  Client ID: {}",
        style(search_console.client_id.as_deref().unwrap_or("(not set)")).cyan()
    );
    eprintln!(
        "  Client Secret: {}",
        style(mask_secret(search_console.client_secret.as_deref())).cyan()
    );
    eprintln!(
        "  Refresh Token: {}",
        style(mask_secret(search_console.refresh_token.as_deref())).cyan()
    );
    eprintln!("  Row Limit: {}", style(search_console.row_limit).cyan());
    match search_console.credentials() {
        Some(_) => eprintln!("  Analytics: {}", style("enabled").green()),
        None => eprintln!("  Analytics: {}", style("disabled").dim()),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

/// Show only the last four characters of a secret
fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(value) => {
            let chars: Vec<char> = value.chars().collect();
            if chars.len() <= 8 {
                "****".to_string()
            } else {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("****{tail}")
            }
        }
    }
}

fn load_existing_config() -> Result<Config> {
    let config_dir = Config::config_dir().context("Failed to locate config directory")?;
    load_config_for_editing(&config_dir)
}

/// Load only what is stored in the config file. Environment overrides are
/// left out so the wizard never persists secrets taken from the environment,
/// and a broken file is reported instead of being replaced with defaults.
fn load_config_for_editing(config_dir: &Path) -> Result<Config> {
    let config = Config::load_from(config_dir).with_context(|| {
        format!(
            "Existing configuration could not be loaded; fix or remove {} and retry",
            config_dir.join(CONFIG_FILE_NAME).display()
        )
    })?;

    if config.config_file_path().exists() {
        eprintln!("{}", style("Found existing configuration.").green());
    } else {
        eprintln!(
            "{}",
            style("No existing configuration found. Using defaults.").yellow()
        );
    }

    Ok(config)
}

fn configure_openai(openai: &mut OpenAiConfig) -> Result<()> {
    let api_key = Password::new()
        .with_prompt("OpenAI API key (leave empty to keep the current one)")
        .allow_empty_password(true)
        .interact()?;

    let base_url: String = Input::new()
        .with_prompt("API base URL")
        .default(openai.base_url.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let mut temp_config = OpenAiConfig::default();
            temp_config.set_base_url(input.clone())?;
            Ok(())
        })
        .interact_text()?;

    let model: String = Input::new()
        .with_prompt("Chat model")
        .default(openai.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let timeout_seconds: u64 = Input::new()
        .with_prompt("Request timeout in seconds")
        .default(openai.timeout_seconds)
        .validate_with(|input: &u64| -> Result<(), &str> {
            if *input == 0 {
                Err("Timeout must be greater than 0")
            } else if *input > 600 {
                Err("Timeout must be 600 seconds or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let language: String = Input::new()
        .with_prompt("Language of the recommendations")
        .default(openai.response_language.clone())
        .interact_text()?;

    if !api_key.trim().is_empty() {
        openai.api_key = Some(api_key.trim().to_string());
    }
    openai.set_base_url(base_url)?;
    openai.set_model(model)?;
    openai.set_timeout_seconds(timeout_seconds)?;
    openai.set_response_language(language)?;

    Ok(())
}

fn configure_search_console(search_console: &mut SearchConsoleConfig) -> Result<()> {
    let client_id: String = Input::new()
        .with_prompt("OAuth client ID")
        .default(search_console.client_id.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let client_secret = Password::new()
        .with_prompt("OAuth client secret (leave empty to keep the current one)")
        .allow_empty_password(true)
        .interact()?;

    let refresh_token = Password::new()
        .with_prompt("OAuth refresh token (leave empty to keep the current one)")
        .allow_empty_password(true)
        .interact()?;

    let row_limit: u32 = Input::new()
        .with_prompt("Maximum query rows to request")
        .default(search_console.row_limit)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if *input == 0 || *input > 25_000 {
                Err("Row limit must be between 1 and 25000")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    search_console.client_id = Some(client_id.trim().to_string()).filter(|id| !id.is_empty());
    if !client_secret.trim().is_empty() {
        search_console.client_secret = Some(client_secret.trim().to_string());
    }
    if !refresh_token.trim().is_empty() {
        search_console.refresh_token = Some(refresh_token.trim().to_string());
    }
    search_console.set_row_limit(row_limit)?;

    Ok(())
}

/// Lists models with the configured key; any 2xx answer means the key works
fn test_openai_connection(openai: &OpenAiConfig) -> bool {
    let Some(api_key) = openai.api_key.as_deref() else {
        return false;
    };
    let url = format!("{}/models", openai.base_url.trim_end_matches('/'));

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(5)))
        .build()
        .into();

    agent
        .get(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .call()
        .is_ok()
}
