//! Translation relay: resolves a language pair to a machine translation model,
//! forwards the text to an inference provider and normalizes the answer.

pub mod config;
pub mod error;
pub mod languages;
pub mod provider;
pub mod server;
pub mod translation;
