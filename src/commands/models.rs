use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::gateway::{DEFAULT_MAX_TOKENS, MODELS};

#[derive(Serialize)]
struct ModelInfo {
    name: &'static str,
    max_tokens: u32,
    default: bool,
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let models: Vec<ModelInfo> = MODELS
        .iter()
        .map(|&(name, max_tokens)| ModelInfo {
            name,
            max_tokens,
            default: name == config.defaults.model,
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&models)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&models)?),
        OutputFormat::Text => {
            println!("{}", "Available Models".cyan().bold());
            println!();
            for model in &models {
                let marker = if model.default { " (default)".yellow().to_string() } else { String::new() };
                println!("  {}{}", model.name.green(), marker);
                println!("    Max tokens: {}", model.max_tokens);
            }
            println!();
            println!(
                "  {}",
                format!("Other model names fall back to {} max tokens", DEFAULT_MAX_TOKENS).dimmed()
            );
        }
    }

    Ok(())
}
