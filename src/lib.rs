//! Translation-memoization filter core.
//!
//! Given a rendered text fragment and a target locale, derives a stable
//! content key, looks up a prior machine translation in a persistent store,
//! and on miss asks an external provider, persists the outcome, and
//! optionally annotates the result with an edit affordance. Every failure
//! path degrades to the original text so the surrounding page always
//! renders.

pub mod config;
pub mod error;
mod hash;
pub mod logging;
mod markup;
pub mod provider;
mod service;
pub mod store;

pub use config::{FilterConfig, load_config};
pub use error::{ConfigError, ProviderError, StoreError};
pub use hash::content_key;
pub use markup::MarkupGuard;
pub use provider::{GoogleTranslate, Provider, ProviderFuture, Translated};
pub use service::{FilterOptions, RequestContext, TranslationService};
pub use store::{NewRecord, Origin, TextFormat, TranslationRecord, TranslationStore};
