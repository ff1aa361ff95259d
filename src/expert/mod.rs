//! Expert selection
//!
//! Decides which persona answers a request: either a stored persona picked
//! by name, or a new one synthesized from the request itself.

pub mod prompts;
pub mod resolver;

pub use resolver::{ExpertResolver, ExpertSelection, ResolvedExpert};
