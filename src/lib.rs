//! # translation-suggest
//!
//! Pluggable translation suggestion providers for localization tools.
//!
//! Each provider is a thin adapter over one external translation service,
//! exposing the same capability surface so new engines can be added without
//! touching existing ones:
//!
//! - [`GoogleTranslate`] — the public Google web translation endpoint
//! - [`OpenAiTranslate`] — the OpenAI chat-completions API, with best-effort
//!   source language detection (LLM primary, local statistical fallback,
//!   30-day cache)
//!
//! Placeholder tokens embedded in localized strings (e.g. `:name`) are
//! extracted before the engine call and reinjected afterwards so they survive
//! translation unchanged; see [`placeholder`].
//!
//! # Example
//!
//! ```ignore
//! use translation_suggest::{GoogleTranslate, SuggestionProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut provider = GoogleTranslate::new()?;
//!     provider.set_target(Some("fr"));
//!
//!     let suggestion = provider.translate(Some("Hello :name!")).await?;
//!     println!("{}", suggestion); // "Bonjour :name!"
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod detection;
pub mod engine;
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod openai_translate;
pub mod placeholder;
pub mod provider;
pub mod report;


pub use cache::{detection_cache_key, DetectionCache, MemoryDetectionCache, DETECTION_TTL};
pub use detection::detect_language;
pub use engine::{ChatEngine, ChatMessage, ChatRequest, TextTranslationEngine};
pub use error::{SuggestError, SuggestResult};
pub use google_translate::{GoogleTranslate, GoogleWebEngine};
pub use mock::{MockChatEngine, MockMode, MockTranslationEngine};
pub use openai_translate::{OpenAiChatClient, OpenAiConfig, OpenAiTranslate};
pub use placeholder::{PlaceholderPattern, PreserveMode, DEFAULT_PLACEHOLDER_PATTERN};
pub use provider::{create_provider, SuggestionProvider, DEFAULT_TARGET_LANG};
pub use report::{ErrorReporter, LogReporter};
