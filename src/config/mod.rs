// Configuration management module
// Handles the TOML configuration file and secret overrides from the environment

pub mod interactive;
pub mod settings;


pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    Config, ConfigError, FetchConfig, OAuthCredentials, OpenAiConfig, SearchConsoleConfig,
};
