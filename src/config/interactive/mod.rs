
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};
use std::path::Path;
use std::time::Duration;

use super::{ApiConfig, Config, ConfigError, GeminiConfig, NewsConfig};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 India Facts Configuration Setup").bold().cyan());
    eprintln!();

    let config_dir = Config::config_dir().context("Failed to locate config directory")?;
    let mut config = load_existing_config(&config_dir);

    eprintln!("{}", style("Knowledge API").bold().yellow());
    eprintln!("Backend that serves /api/knowledge and accepts new entries.");
    eprintln!();
    configure_api(&mut config.api)?;

    eprintln!();
    eprintln!("{}", style("News Sources").bold().yellow());
    eprintln!("API keys are optional; without them news commands return placeholders.");
    eprintln!();
    configure_news(&mut config.news)?;
    configure_gemini(&mut config.gemini)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_api_connection(&config.api) {
        eprintln!("{}", style("✓ Knowledge API reachable!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not reach the knowledge API").yellow()
        );
        eprintln!("You can continue; the bundled fallback knowledge will be used until it is up.");
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
    let config = Config::load_default().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Knowledge API:").bold().yellow());
    eprintln!("  Base URL: {}", style(&config.api.base_url).cyan());
    eprintln!("  Timeout: {}s", style(config.api.timeout_seconds).cyan());
    match config.api.knowledge_url() {
        Ok(url) => eprintln!("  Collection URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  Collection URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!("{}", style("News:").bold().yellow());
    eprintln!("  Endpoint: {}", style(&config.news.endpoint).cyan());
    eprintln!("  API key: {}", key_status(config.news.api_key.as_deref()));
    eprintln!("  Max articles: {}", style(config.news.max_articles).cyan());

    eprintln!();
    eprintln!("{}", style("State headlines:").bold().yellow());
    eprintln!("  Model: {}", style(&config.gemini.model).cyan());
    eprintln!("  API key: {}", key_status(config.gemini.api_key.as_deref()));
    eprintln!(
        "  Cache TTL: {}s",
        style(config.gemini.cache_ttl_seconds).cyan()
    );

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn key_status(key: Option<&str>) -> console::StyledObject<&'static str> {
    if key.is_some() {
        style("configured").green()
    } else {
        style("not set").dim()
    }
}

fn load_existing_config(config_dir: &Path) -> Config {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            }
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            config
        },
    )
}

fn configure_api(api: &mut ApiConfig) -> Result<()> {
    let base_url: String = Input::new()
        .with_prompt("Knowledge API base URL")
        .default(api.base_url.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let candidate = ApiConfig {
                base_url: input.clone(),
                ..ApiConfig::default()
            };
            candidate.validate()
        })
        .interact_text()?;

    let timeout_seconds: u64 = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(api.timeout_seconds)
        .validate_with(|input: &u64| -> Result<(), &str> {
            if (1..=300).contains(input) {
                Ok(())
            } else {
                Err("Timeout must be between 1 and 300 seconds")
            }
        })
        .interact_text()?;

    api.set_base_url(base_url)?;
    api.set_timeout_seconds(timeout_seconds)?;

    Ok(())
}

fn configure_news(news: &mut NewsConfig) -> Result<()> {
    let api_key: String = Input::new()
        .with_prompt("News API key (leave empty to skip)")
        .default(news.api_key.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let max_articles: usize = Input::new()
        .with_prompt("Articles per request")
        .default(news.max_articles)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (1..=100).contains(input) {
                Ok(())
            } else {
                Err("Article limit must be between 1 and 100")
            }
        })
        .interact_text()?;

    news.api_key = Some(api_key).filter(|key| !key.trim().is_empty());
    news.set_max_articles(max_articles)?;

    Ok(())
}

fn configure_gemini(gemini: &mut GeminiConfig) -> Result<()> {
    let api_key: String = Input::new()
        .with_prompt("Gemini API key (leave empty to skip)")
        .default(gemini.api_key.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let model: String = Input::new()
        .with_prompt("Gemini model")
        .default(gemini.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    gemini.api_key = Some(api_key).filter(|key| !key.trim().is_empty());
    gemini.set_model(model)?;

    Ok(())
}

/// Any HTTP answer from the collection endpoint counts as reachable
fn test_api_connection(api: &ApiConfig) -> bool {
    let Ok(url) = api.knowledge_url() else {
        return false;
    };

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(5)))
        .build()
        .into();

    match agent.get(url.as_str()).call() {
        Ok(_) | Err(ureq::Error::StatusCode(_)) => true,
        Err(_) => false,
    }
}
