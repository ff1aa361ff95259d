//! Stored expert browsing

use colored::*;
use eyre::Result;

use super::{load_experts, open_store};
use crate::cli::{ExpertsAction, OutputFormat};
use crate::config::Config;
use crate::expert::resolver::{AUTO_SELECT, AUTO_SELECT_LABEL};
use crate::persona::Persona;

pub fn run(action: ExpertsAction, config: &Config) -> Result<()> {
    match action {
        ExpertsAction::List { format } => list_experts(OutputFormat::resolve(format), config),
        ExpertsAction::Show { name, format } => show_expert(&name, OutputFormat::resolve(format), config),
    }
}

fn list_experts(format: OutputFormat, config: &Config) -> Result<()> {
    let store = open_store(config);
    let experts = load_experts(&store);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&experts)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&experts)?),
        OutputFormat::Text => {
            println!("{}", "Available Experts:".bold());
            println!();
            println!("  {} {} ({})", "●".cyan(), AUTO_SELECT.bold(), AUTO_SELECT_LABEL.dimmed());

            if experts.is_empty() {
                println!();
                println!("  {} No experts saved in {}", "(none)".dimmed(), store.path().display());
                println!();
                println!("  Create one with: {}", "expertbot ask \"<request>\"".cyan());
            } else {
                for expert in &experts {
                    println!("  {} {}", "●".green(), expert.name.bold());
                    println!("    {}", truncate(&expert.description, 100).dimmed());
                }
            }
        }
    }

    Ok(())
}

fn show_expert(name: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let store = open_store(config);
    let experts = load_experts(&store);

    let Some(expert) = experts.into_iter().find(|p| p.name == name) else {
        eprintln!("{} Expert '{}' not found in {}", "✗".red(), name, store.path().display());
        std::process::exit(1);
    };

    print_expert(&expert, format)
}

fn print_expert(expert: &Persona, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(expert)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(expert)?),
        OutputFormat::Text => {
            println!("{} {}", "Expert:".bold(), expert.name.green().bold());
            println!();
            println!("{}", "Description:".bold());
            for line in expert.description.lines() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
