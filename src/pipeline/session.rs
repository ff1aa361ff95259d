//! Per-session answer state
//!
//! Owned by whoever drives the session (one `ask` invocation, one `chat`
//! loop) and changed only through the fetch/refine/reset transitions.

use serde::Serialize;

use crate::expert::{ExpertSelection, ResolvedExpert};
use crate::gateway::Temperature;

/// Where a session is in the fetch/refine cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing fetched yet, or the last fetch failed, or reset
    Idle,
    /// An original answer is available
    Answered,
    /// A refined answer is available alongside the original
    Refined,
}

/// Inputs of a Fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub user_input: String,
    pub selection: ExpertSelection,
    pub model: String,
    pub temperature: Temperature,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    persona_name: String,
    persona_description: String,
    original_answer: String,
    refined_answer: String,
    #[serde(skip)]
    last_request: Option<FetchRequest>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitespace-only answers count as absent
    pub fn phase(&self) -> Phase {
        if self.original_answer.trim().is_empty() {
            Phase::Idle
        } else if self.refined_answer.trim().is_empty() {
            Phase::Answered
        } else {
            Phase::Refined
        }
    }

    pub fn persona_name(&self) -> &str {
        &self.persona_name
    }

    pub fn persona_description(&self) -> &str {
        &self.persona_description
    }

    pub fn original_answer(&self) -> &str {
        &self.original_answer
    }

    pub fn refined_answer(&self) -> &str {
        &self.refined_answer
    }

    pub fn last_request(&self) -> Option<&FetchRequest> {
        self.last_request.as_ref()
    }

    /// Fetch succeeded: replace everything, drop any refinement
    pub(crate) fn record_answer(&mut self, request: FetchRequest, expert: ResolvedExpert, answer: String) {
        self.persona_name = expert.title;
        self.persona_description = expert.description;
        self.original_answer = answer;
        self.refined_answer.clear();
        self.last_request = Some(request);
    }

    /// Fetch failed: the session shows "no persona resolved"
    pub(crate) fn record_failed_fetch(&mut self, request: FetchRequest) {
        self.persona_name.clear();
        self.persona_description.clear();
        self.original_answer.clear();
        self.refined_answer.clear();
        self.last_request = Some(request);
    }

    /// Refine finished; an empty string records a failed refinement
    pub(crate) fn record_refinement(&mut self, refined: String) {
        self.refined_answer = refined;
    }

    /// Back to a freshly started session
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
