use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
        ConfigAction::Path => path(config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "expertbot Configuration".bold());
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "store".cyan());
            println!("  path: {}", config.store_path().display());
            println!();

            println!("{}:", "api".cyan());
            println!("  base_url: {}", config.api.base_url);
            println!("  key_env: {}", config.api.key_env);
            println!("  timeout_secs: {}", config.api.timeout_secs);
            println!();

            println!("{}:", "defaults".cyan());
            println!("  model: {}", config.defaults.model);
            println!("  temperature: {}", config.default_temperature());
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        "store.path" => Some(config.store_path().display().to_string()),
        "api.base_url" => Some(config.api.base_url.clone()),
        "api.key_env" => Some(config.api.key_env.clone()),
        "api.timeout_secs" => Some(config.api.timeout_secs.to_string()),
        "defaults.model" => Some(config.defaults.model.clone()),
        "defaults.temperature" => Some(config.default_temperature().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn path(config: &Config) -> Result<()> {
    println!("{} {}", "directory:".bold(), Config::expertbot_dir().display());
    println!("{} {}", "experts:".bold(), config.store_path().display());
    println!("{} {}", "env file:".bold(), Config::env_file().display());
    Ok(())
}
