pub mod ask;
pub mod chat;
pub mod completions;
pub mod config;
pub mod experts;
pub mod models;

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::{GenerationArgs, OutputFormat};
use crate::config::Config;
use crate::error::ExpertError;
use crate::gateway::{CompletionGateway, GroqBackend, Temperature};
use crate::persona::{JsonPersonaStore, Persona, PersonaStore};
use crate::pipeline::{Phase, SessionState};

/// Model and temperature after applying config defaults
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub model: String,
    pub temperature: Temperature,
}

impl Settings {
    pub fn resolve(args: &GenerationArgs, config: &Config) -> Self {
        Self {
            model: args.model.clone().unwrap_or_else(|| config.defaults.model.clone()),
            temperature: args.temperature.unwrap_or_else(|| config.default_temperature()),
        }
    }
}

pub(crate) fn open_store(config: &Config) -> JsonPersonaStore {
    JsonPersonaStore::new(config.store_path())
}

pub(crate) fn build_gateway(config: &Config) -> CompletionGateway {
    CompletionGateway::new(Box::new(GroqBackend::new(&config.api, Config::env_file())))
}

/// Stored experts, or an empty list (with a warning) when the store is unreadable
pub(crate) fn load_experts(store: &dyn PersonaStore) -> Vec<Persona> {
    match store.list() {
        Ok(personas) => personas,
        Err(e) => {
            report(&e);
            Vec::new()
        }
    }
}

/// Print a pipeline error as a warning or an error line on stderr
pub(crate) fn report(err: &ExpertError) {
    if err.is_warning() {
        eprintln!("{} {}", "⚠".yellow(), err.to_string().yellow());
    } else {
        eprintln!("{} {}", "✗".red(), err.to_string().red());
    }
}

#[derive(Serialize)]
struct SessionView<'a> {
    phase: Phase,
    expert: &'a str,
    expert_description: &'a str,
    answer: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    refined_answer: &'a str,
}

/// Render the current session contents
pub(crate) fn render_session(session: &SessionState, format: OutputFormat) -> Result<()> {
    let view = SessionView {
        phase: session.phase(),
        expert: session.persona_name(),
        expert_description: session.persona_description(),
        answer: session.original_answer(),
        refined_answer: session.refined_answer(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&view)?),
        OutputFormat::Text => {
            if !view.expert.is_empty() {
                println!("{} {}", "Expert:".bold(), view.expert.green().bold());
                println!();
            }

            println!("{}", "Expert analysis:".bold());
            println!("{}", view.expert_description);
            println!();

            println!("{}", "Expert answer:".bold());
            println!("{}", view.answer);

            if !view.refined_answer.is_empty() {
                println!();
                println!("{}", "Refined answer:".bold());
                println!("{}", view.refined_answer);
            }
        }
    }

    Ok(())
}
