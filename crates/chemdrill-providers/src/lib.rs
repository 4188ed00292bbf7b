//! chemdrill-providers: question providers and attempt sinks.
//!
//! Implements the `QuestionProvider` and `AttemptSink` traits for an
//! OpenAI-compatible generator, a remote quiz service, and an offline
//! provider that serves the built-in questions.

pub mod config;
mod http;
pub mod mock;
pub mod offline;
pub mod openai;
pub mod remote;

pub use chemdrill_core::error::ProviderError;
pub use config::{create_backend, load_config, Backend, ChemdrillConfig, ProviderConfig};
