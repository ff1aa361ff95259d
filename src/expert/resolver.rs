//! Expert resolution

use serde::Serialize;

use super::prompts;
use crate::error::{ExpertError, Result};
use crate::gateway::{CompletionGateway, Temperature};
use crate::persona::PersonaStore;

/// Keyword that requests a freshly synthesized expert
pub const AUTO_SELECT: &str = "auto";

/// Label shown for [`ExpertSelection::Auto`] in expert pickers
pub const AUTO_SELECT_LABEL: &str = "Create (or choose) an expert...";

/// Which expert should answer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExpertSelection {
    /// Synthesize and save a new expert for this request
    #[default]
    Auto,
    /// Reuse a stored expert by exact name
    Named(String),
}

impl ExpertSelection {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(AUTO_SELECT) || trimmed == AUTO_SELECT_LABEL {
            ExpertSelection::Auto
        } else {
            ExpertSelection::Named(trimmed.to_string())
        }
    }
}

impl std::str::FromStr for ExpertSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for ExpertSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpertSelection::Auto => write!(f, "{}", AUTO_SELECT),
            ExpertSelection::Named(name) => write!(f, "{}", name),
        }
    }
}

/// The persona that will answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedExpert {
    pub title: String,
    pub description: String,
}

/// Split a phase-one reply at its first period into title and description.
///
/// Abbreviations before the real delimiter ("Dr. Who. ...") split early;
/// replies are taken at face value. A title that would select
/// [`ExpertSelection::Auto`] is rejected, since it could never be chosen by
/// name afterwards.
pub fn parse_expert_reply(reply: &str) -> Result<ResolvedExpert> {
    let (title, description) = reply
        .split_once('.')
        .ok_or_else(|| ExpertError::MalformedPersonaResponse(reply.to_string()))?;

    let title = title.trim();
    if ExpertSelection::parse(title) == ExpertSelection::Auto {
        return Err(ExpertError::MalformedPersonaResponse(reply.to_string()));
    }

    Ok(ResolvedExpert {
        title: title.to_string(),
        description: description.trim().to_string(),
    })
}

pub struct ExpertResolver<'a> {
    gateway: &'a CompletionGateway,
    store: &'a dyn PersonaStore,
}

impl<'a> ExpertResolver<'a> {
    pub fn new(gateway: &'a CompletionGateway, store: &'a dyn PersonaStore) -> Self {
        Self { gateway, store }
    }

    /// Produce the expert for `user_input`.
    ///
    /// `Auto` costs one completion and one store append; `Named` only reads
    /// the store.
    pub fn resolve(
        &self,
        user_input: &str,
        selection: &ExpertSelection,
        model: &str,
        temperature: Temperature,
    ) -> Result<ResolvedExpert> {
        match selection {
            ExpertSelection::Auto => {
                let reply = self
                    .gateway
                    .complete(&prompts::expert_synthesis(user_input), model, temperature)?;
                let expert = parse_expert_reply(&reply)?;

                self.store.append(&expert.title, &expert.description)?;
                log::info!("Synthesized expert '{}'", expert.title);
                Ok(expert)
            }
            ExpertSelection::Named(name) => {
                let persona = self
                    .store
                    .find_by_name(name)?
                    .ok_or_else(|| ExpertError::UnknownExpert(name.clone()))?;

                log::info!("Using stored expert '{}'", persona.name);
                Ok(ResolvedExpert {
                    title: persona.name,
                    description: persona.description,
                })
            }
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory persona store for resolver and pipeline tests

    use std::cell::{Cell, RefCell};

    use crate::error::{ExpertError, Result};
    use crate::persona::{Persona, PersonaStore};

    #[derive(Default)]
    pub struct MemoryStore {
        personas: RefCell<Vec<Persona>>,
        appends: Cell<usize>,
        fail_appends: bool,
    }

    impl MemoryStore {
        pub fn with(personas: &[(&str, &str)]) -> Self {
            Self {
                personas: RefCell::new(personas.iter().map(|(n, d)| Persona::new(n, d)).collect()),
                ..Default::default()
            }
        }

        pub fn read_only() -> Self {
            Self {
                fail_appends: true,
                ..Default::default()
            }
        }

        pub fn append_count(&self) -> usize {
            self.appends.get()
        }

        pub fn names(&self) -> Vec<String> {
            self.personas.borrow().iter().map(|p| p.name.clone()).collect()
        }
    }

    impl PersonaStore for MemoryStore {
        fn list(&self) -> Result<Vec<Persona>> {
            Ok(self.personas.borrow().clone())
        }

        fn append(&self, name: &str, description: &str) -> Result<()> {
            if self.fail_appends {
                return Err(ExpertError::persistence("read-only store"));
            }
            self.appends.set(self.appends.get() + 1);
            self.personas.borrow_mut().push(Persona::new(name, description));
            Ok(())
        }
    }
}
