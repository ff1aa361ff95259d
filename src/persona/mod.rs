//! Expert personas
//!
//! A persona is a named role with a description used to frame generation
//! prompts. Personas are synthesized on demand and kept in a small JSON
//! store so they can be reused across sessions.

pub mod store;

use serde::{Deserialize, Serialize};

pub use store::{JsonPersonaStore, PersonaStore};

/// A named expert persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display and selection key (e.g., "Marine Biologist")
    #[serde(rename = "agent", alias = "agente")]
    pub name: String,

    /// Expertise and voice of the persona
    #[serde(alias = "descricao")]
    pub description: String,
}

impl Persona {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}
