use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::expert::ExpertSelection;
use crate::gateway::{self, Temperature};

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "expertbot",
    about = "Answer requests through the expert best suited to them",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/expertbot/logs/expertbot.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to expertbot.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Generation settings shared by `ask` and `chat`
#[derive(clap::Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Expert name from the store, or "auto" to create one for the request
    #[arg(long, short = 'e', default_value = "auto")]
    pub expert: ExpertSelection,

    /// Model (defaults to config defaults.model)
    #[arg(long, short = 'm', value_parser = PossibleValuesParser::new(gateway::model_names()))]
    pub model: Option<String>,

    /// Creativity level between 0.0 and 1.0 (defaults to config defaults.temperature)
    #[arg(long, short = 't')]
    pub temperature: Option<Temperature>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a single request, optionally refining the answer
    Ask {
        /// The request to answer
        request: String,

        #[command(flatten)]
        generation: GenerationArgs,

        /// Run a refinement pass on the answer
        #[arg(long)]
        refine: bool,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Interactive session with fetch, refine and reset
    Chat {
        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Browse stored experts
    Experts {
        #[command(subcommand)]
        action: ExpertsAction,
    },

    /// List available models and their token limits
    Models {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ExpertsAction {
    /// List stored experts
    List {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show one expert
    Show {
        /// Expert name (exact match)
        name: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },

    /// Print the expertbot directory and store location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_defaults_to_auto_expert() {
        let cli = Cli::try_parse_from(["expertbot", "ask", "Explain tides"]).unwrap();
        match cli.command {
            Commands::Ask {
                request,
                generation,
                refine,
                ..
            } => {
                assert_eq!(request, "Explain tides");
                assert_eq!(generation.expert, ExpertSelection::Auto);
                assert!(generation.model.is_none());
                assert!(generation.temperature.is_none());
                assert!(!refine);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_with_named_expert_and_settings() {
        let cli = Cli::try_parse_from([
            "expertbot",
            "ask",
            "Bake bread",
            "--expert",
            "Master Baker",
            "-m",
            "gemma-7b-it",
            "-t",
            "0.25",
            "--refine",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask { generation, refine, .. } => {
                assert_eq!(generation.expert, ExpertSelection::Named("Master Baker".to_string()));
                assert_eq!(generation.model.as_deref(), Some("gemma-7b-it"));
                assert_eq!(generation.temperature.unwrap().value(), 0.25);
                assert!(refine);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_rejects_unknown_model() {
        assert!(Cli::try_parse_from(["expertbot", "ask", "hi", "-m", "gpt-4"]).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        assert!(Cli::try_parse_from(["expertbot", "ask", "hi", "-t", "1.5"]).is_err());
    }
}
