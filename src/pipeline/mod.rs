//! Answer pipeline
//!
//! Phase two answers a request in the resolved expert's voice; phase three
//! refines a previous answer. [`AnswerPipeline::fetch`] and
//! [`AnswerPipeline::refine_session`] are the session triggers: they apply
//! results to a [`SessionState`] and hand any error back for reporting.

pub mod session;

use crate::error::{ExpertError, Result};
use crate::expert::{ExpertResolver, ResolvedExpert, prompts};
use crate::gateway::{CompletionGateway, Temperature};
use crate::persona::PersonaStore;

pub use session::{FetchRequest, Phase, SessionState};

/// Result of phase two
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub expert: ResolvedExpert,
    pub text: String,
}

pub struct AnswerPipeline<'a> {
    gateway: &'a CompletionGateway,
    store: &'a dyn PersonaStore,
}

impl<'a> AnswerPipeline<'a> {
    pub fn new(gateway: &'a CompletionGateway, store: &'a dyn PersonaStore) -> Self {
        Self { gateway, store }
    }

    /// Resolve the expert, then answer in its voice
    pub fn answer(&self, request: &FetchRequest) -> Result<Answer> {
        let resolver = ExpertResolver::new(self.gateway, self.store);
        let expert = resolver.resolve(
            &request.user_input,
            &request.selection,
            &request.model,
            request.temperature,
        )?;

        let prompt = prompts::expert_answer(&expert.title, &request.user_input);
        let text = self.gateway.complete(&prompt, &request.model, request.temperature)?;

        Ok(Answer { expert, text })
    }

    /// Ask the same expert to review and improve `prior_answer`
    pub fn refine(
        &self,
        title: &str,
        prior_answer: &str,
        user_input: &str,
        model: &str,
        temperature: Temperature,
    ) -> Result<String> {
        if prior_answer.trim().is_empty() {
            return Err(ExpertError::NoPriorAnswer);
        }

        let prompt = prompts::refinement(title, user_input, prior_answer);
        self.gateway.complete(&prompt, model, temperature)
    }

    /// Fetch trigger: always replaces the session's persona and answers
    pub fn fetch(&self, session: &mut SessionState, request: FetchRequest) -> Result<()> {
        match self.answer(&request) {
            Ok(answer) => {
                session.record_answer(request, answer.expert, answer.text);
                Ok(())
            }
            Err(e) => {
                log::warn!("Fetch failed: {}", e);
                session.record_failed_fetch(request);
                Err(e)
            }
        }
    }

    /// Refine trigger: needs an original answer, keeps it untouched. Runs with
    /// the model and temperature of the fetch that produced the answer.
    pub fn refine_session(&self, session: &mut SessionState) -> Result<()> {
        let Some(request) = session.last_request().filter(|_| session.phase() != Phase::Idle) else {
            return Err(ExpertError::NoPriorAnswer);
        };

        let result = self.refine(
            session.persona_name(),
            session.original_answer(),
            &request.user_input,
            &request.model,
            request.temperature,
        );

        match result {
            Ok(refined) => {
                session.record_refinement(refined);
                Ok(())
            }
            Err(e) => {
                log::warn!("Refine failed: {}", e);
                session.record_refinement(String::new());
                Err(e)
            }
        }
    }
}
