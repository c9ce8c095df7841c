//! Supported languages and translation directions.
//!
//! # Architecture
//!
//! - `pair`: `LanguagePair` and `ModelId` value types
//! - `registry`: the immutable pair → model and code → name tables
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::languages::{LanguagePair, LanguageRegistry};
//!
//! let registry = LanguageRegistry::builtin();
//! let model = registry.resolve(&LanguagePair::new("en", "fr"));
//! ```

mod pair;
mod registry;

pub use pair::{LanguagePair, ModelId};
pub use registry::LanguageRegistry;
