//! Completion endpoint implementations for Padhai.
//!
//! All providers implement the `padhai_core::Provider` trait.
//! `build_from_config` turns the `[provider]` section into the single
//! provider every agent shares.

pub mod factory;
pub mod openai_compat;

pub use factory::build_from_config;
pub use openai_compat::OpenAiCompatProvider;
