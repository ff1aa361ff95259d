//! Interactive session
//!
//! A plain line fetches an answer for it; slash commands trigger refine,
//! reset, and change the expert, model, or temperature.

use colored::*;
use eyre::{Context, Result};
use std::io::{self, BufRead, Write};

use super::{Settings, build_gateway, load_experts, open_store, render_session, report};
use crate::cli::{GenerationArgs, OutputFormat};
use crate::config::Config;
use crate::expert::ExpertSelection;
use crate::expert::resolver::AUTO_SELECT_LABEL;
use crate::gateway::{Temperature, model_names};
use crate::pipeline::{AnswerPipeline, FetchRequest, SessionState};

const HELP: &str = "\
Type a request to have it answered by the best expert.

  /refine          refine the current answer
  /reset           clear the session
  /show            show the current answer again
  /expert <name>   answer with a stored expert (\"auto\" to create one)
  /experts         list stored experts
  /model <name>    switch model
  /temp <value>    set creativity level (0.0 - 1.0)
  /help            show this help
  /quit            leave";

#[derive(Debug, Clone, PartialEq)]
enum ChatCommand {
    Fetch(String),
    Refine,
    Reset,
    Show,
    Expert(ExpertSelection),
    Experts,
    Model(String),
    Temperature(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> ChatCommand {
    let line = line.trim();
    if line.is_empty() {
        return ChatCommand::Empty;
    }

    let Some(command) = line.strip_prefix('/') else {
        return ChatCommand::Fetch(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name.to_lowercase().as_str() {
        "refine" => ChatCommand::Refine,
        "reset" => ChatCommand::Reset,
        "show" => ChatCommand::Show,
        "expert" => ChatCommand::Expert(ExpertSelection::parse(arg)),
        "experts" => ChatCommand::Experts,
        "model" => ChatCommand::Model(arg.to_string()),
        "temp" | "temperature" => ChatCommand::Temperature(arg.to_string()),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(line.to_string()),
    }
}

pub fn run(generation: GenerationArgs, config: &Config) -> Result<()> {
    let mut settings = Settings::resolve(&generation, config);
    let mut selection = generation.expert;
    let store = open_store(config);
    let gateway = build_gateway(config);
    let pipeline = AnswerPipeline::new(&gateway, &store);
    let mut session = SessionState::new();

    println!("{}", "expertbot".bold());
    println!("{}", "Type a request, /help for commands, /quit to leave.".dimmed());
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(
            "{} {} {} ",
            format!("[{}]", selection).cyan(),
            format!("[{} @ {}]", settings.model, settings.temperature).dimmed(),
            ">".bold()
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read input")?;

        match parse_line(&line) {
            ChatCommand::Empty => continue,
            ChatCommand::Quit => break,
            ChatCommand::Help => println!("{}", HELP),
            ChatCommand::Fetch(request) => {
                log::info!("Chat fetch with expert '{}'", selection);
                let fetch_request = FetchRequest {
                    user_input: request,
                    selection: selection.clone(),
                    model: settings.model.clone(),
                    temperature: settings.temperature,
                };
                if let Err(e) = pipeline.fetch(&mut session, fetch_request) {
                    report(&e);
                }
                println!();
                render_session(&session, OutputFormat::Text)?;
            }
            ChatCommand::Refine => match pipeline.refine_session(&mut session) {
                Ok(()) => {
                    println!();
                    render_session(&session, OutputFormat::Text)?;
                }
                Err(e) => report(&e),
            },
            ChatCommand::Reset => {
                session.reset();
                println!("{} Session cleared", "✓".green());
            }
            ChatCommand::Show => render_session(&session, OutputFormat::Text)?,
            ChatCommand::Expert(new_selection) => {
                selection = new_selection;
                println!("{} Expert: {}", "✓".green(), selection.to_string().cyan());
            }
            ChatCommand::Experts => {
                println!("  {} {}", "●".green(), AUTO_SELECT_LABEL.dimmed());
                for persona in load_experts(&store) {
                    println!("  {} {}", "●".green(), persona.name.bold());
                }
            }
            ChatCommand::Model(model) => {
                if model_names().contains(&model.as_str()) {
                    settings.model = model;
                    println!(
                        "{} Model: {} (max tokens {})",
                        "✓".green(),
                        settings.model.cyan(),
                        gateway.max_tokens_for(&settings.model)
                    );
                } else {
                    eprintln!(
                        "{} Unknown model '{}'. Available: {}",
                        "✗".red(),
                        model,
                        model_names().join(", ")
                    );
                }
            }
            ChatCommand::Temperature(value) => match value.parse::<Temperature>() {
                Ok(temperature) => {
                    settings.temperature = temperature;
                    println!("{} Temperature: {}", "✓".green(), settings.temperature);
                }
                Err(e) => eprintln!("{} {}", "✗".red(), e),
            },
            ChatCommand::Unknown(input) => {
                eprintln!("{} Unknown command: {} (try /help)", "✗".red(), input);
            }
        }
    }

    Ok(())
}
