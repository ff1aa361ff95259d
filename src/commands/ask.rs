//! One-shot fetch (and optional refine)

use colored::*;
use eyre::Result;

use super::{Settings, build_gateway, open_store, render_session, report};
use crate::cli::{GenerationArgs, OutputFormat};
use crate::config::Config;
use crate::pipeline::{AnswerPipeline, FetchRequest, SessionState};

pub fn run(
    request: String,
    generation: GenerationArgs,
    refine: bool,
    format: Option<OutputFormat>,
    config: &Config,
) -> Result<()> {
    let format = OutputFormat::resolve(format);
    let settings = Settings::resolve(&generation, config);
    let store = open_store(config);
    let gateway = build_gateway(config);
    let pipeline = AnswerPipeline::new(&gateway, &store);
    let mut session = SessionState::new();

    eprintln!(
        "{} Asking {} with {} (temperature {}, max tokens {})...",
        "→".blue(),
        generation.expert.to_string().cyan(),
        settings.model.cyan(),
        settings.temperature,
        gateway.max_tokens_for(&settings.model)
    );

    let fetch_request = FetchRequest {
        user_input: request,
        selection: generation.expert,
        model: settings.model.clone(),
        temperature: settings.temperature,
    };

    let fetched = pipeline.fetch(&mut session, fetch_request);
    if let Err(e) = &fetched {
        report(e);
    }

    if refine && fetched.is_ok() {
        eprintln!("{} Refining answer...", "→".blue());
        if let Err(e) = pipeline.refine_session(&mut session) {
            report(&e);
        }
    }

    render_session(&session, format)?;

    if fetched.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
