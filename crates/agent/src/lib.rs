//! The tutoring agents — the heart of Padhai.
//!
//! Every student query takes the same short path:
//!
//! 1. **Dispatch**: the [`Dispatcher`] asks the model which specialist fits
//!    the query, given the student's stored summaries
//! 2. **Run**: the chosen agent ([`DiscoverAgent`], [`TutorAgent`],
//!    [`AssessAgent`], [`GuideAgent`]) issues its own completion
//! 3. **Persist**: assessments append to the interaction log and the
//!    [`SummarySynthesizer`] rewrites the tracking summary
//!
//! [`Orchestrator`] binds these steps behind the operations the HTTP and
//! CLI surfaces call.

pub mod assess;
pub mod chat;
pub mod discover;
pub mod dispatcher;
pub mod guide;
pub mod locks;
pub mod orchestrator;
pub mod prompts;
pub mod synthesizer;
pub mod tutor;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assess::AssessAgent;
pub use chat::{AgentDeps, ChatModel};
pub use discover::DiscoverAgent;
pub use dispatcher::{Dispatcher, Routing};
pub use guide::GuideAgent;
pub use locks::ProfileLocks;
pub use orchestrator::{AgentReply, AgentRequest, AgentSettings, Orchestrator, Registration};
pub use synthesizer::SummarySynthesizer;
pub use tutor::{Tone, TutorAgent};
