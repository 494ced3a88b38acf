//! # Padhai Core
//!
//! Domain types, traits, and error definitions for the Padhai tutoring
//! service. This crate has **no framework dependencies**: it defines the
//! student profile model, the agent label vocabulary, and the two seams
//! (`Provider`, `ProfileStore`) that every other crate implements against.
//!
//! Implementations live in their own crates so tests can swap in stubs for
//! the language model and the document store.

pub mod error;
pub mod label;
pub mod message;
pub mod profile;
pub mod provider;
pub mod session;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, StoreError};
pub use label::AgentLabel;
pub use message::{Message, Role};
pub use profile::{Interaction, StudentId, StudentIdentity, StudentProfile, SummaryField};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Session, SessionId};
pub use store::ProfileStore;
