//! Translation suggestion provider contract.
//!
//! Every provider adapts one external translation engine to the same small
//! capability surface: identification (`id`/`engine`/`icon`), configuration
//! (source/target language, placeholder handling) and translation of one or
//! many strings. Providers share the contract but not code; new engines are
//! added by implementing this trait, never by modifying existing providers.
//!
//! # Fixed policies
//!
//! - `translate(None)` and `translate(Some(""))` return `Ok("")` without
//!   calling the engine.
//! - Single-item `translate` surfaces engine and configuration failures as
//!   typed [`SuggestError`]s to its caller.
//! - `translate_many` never fails: each per-item error is caught, reported
//!   exactly once through the provider's [`ErrorReporter`], and recorded as
//!   `None` for that key. The returned map always has the input's key set.
//! - `set_target(None)` resets the target to [`DEFAULT_TARGET_LANG`] instead
//!   of leaving it unset.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{SuggestError, SuggestResult};
use crate::google_translate::GoogleTranslate;
use crate::openai_translate::OpenAiTranslate;
use crate::placeholder::PreserveMode;

/// Target language used when none is configured
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Common capability contract for translation suggestion providers
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Stable short identifier, e.g. `"google"`
    fn id(&self) -> &'static str;

    /// Human-readable engine name, e.g. `"Google Translate"`
    fn engine(&self) -> &'static str;

    /// Presentation icon identifier
    fn icon(&self) -> &'static str;

    /// Configure placeholder handling
    fn preserve_parameters(&mut self, mode: PreserveMode);

    /// Set the source language; `None` means "detect automatically"
    fn set_source(&mut self, lang: Option<&str>);

    /// Set the target language; `None` falls back to [`DEFAULT_TARGET_LANG`]
    fn set_target(&mut self, lang: Option<&str>);

    /// Translate one string, preserving configured placeholders
    async fn translate(&self, text: Option<&str>) -> SuggestResult<String>;

    /// Translate every entry of a key → text mapping independently
    async fn translate_many(
        &self,
        texts: &HashMap<String, String>,
    ) -> HashMap<String, Option<String>>;
}

/// Create a provider by its short identifier
///
/// `"openai"` reads its credentials from the environment; see
/// [`crate::openai_translate::OpenAiConfig::from_env`].
pub fn create_provider(name: &str) -> SuggestResult<Box<dyn SuggestionProvider>> {
    match name.to_lowercase().as_str() {
        "google" => Ok(Box::new(GoogleTranslate::new()?)),
        "openai" => Ok(Box::new(OpenAiTranslate::from_env()?)),
        _ => Err(SuggestError::Config(format!(
            "Unknown translation provider: {}",
            name
        ))),
    }
}

/// Normalize a language code by stripping region or script information
///
/// `en-US` → `en`, `zh-Hans` → `zh`, `EN` → `en`, `en` → `en`.
pub fn normalize_lang_code(code: &str) -> String {
    code.split('-').next().unwrap_or(code).to_lowercase()
}

/// Validate that a language code is in acceptable format
///
/// Accepts only non-empty codes of ASCII alphanumerics, hyphens and
/// underscores, following ISO 639 conventions.
pub fn validate_lang_code(code: &str) -> SuggestResult<()> {
    if code.is_empty() {
        return Err(SuggestError::Config(
            "Language code is empty".to_string(),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SuggestError::Config(format!(
            "Invalid characters in language code: {}",
            code
        )));
    }

    Ok(())
}

#[cfg(test)]
impl std::fmt::Debug for dyn SuggestionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionProvider")
            .field("id", &self.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lang_code_with_region() {
        assert_eq!(normalize_lang_code("en-US"), "en");
        assert_eq!(normalize_lang_code("fr-FR"), "fr");
    }

    #[test]
    fn test_normalize_lang_code_with_script() {
        assert_eq!(normalize_lang_code("zh-Hans"), "zh");
        assert_eq!(normalize_lang_code("sr-Latn"), "sr");
    }

    #[test]
    fn test_normalize_lang_code_lowercases() {
        assert_eq!(normalize_lang_code("EN"), "en");
        assert_eq!(normalize_lang_code("EN-US"), "en");
    }

    #[test]
    fn test_normalize_lang_code_already_simple() {
        assert_eq!(normalize_lang_code("en"), "en");
    }

    #[test]
    fn test_validate_lang_code_valid() {
        assert!(validate_lang_code("en").is_ok());
        assert!(validate_lang_code("en-US").is_ok());
        assert!(validate_lang_code("de_DE").is_ok());
    }

    #[test]
    fn test_validate_lang_code_invalid() {
        assert!(validate_lang_code("").is_err());
        assert!(validate_lang_code("en@invalid").is_err());
        assert!(validate_lang_code("fr#bad").is_err());
    }

    #[test]
    fn test_create_provider_google() {
        let provider = create_provider("google").unwrap();
        assert_eq!(provider.id(), "google");
    }

    #[test]
    fn test_create_provider_is_case_insensitive() {
        let provider = create_provider("Google").unwrap();
        assert_eq!(provider.id(), "google");
    }

    #[test]
    fn test_create_provider_unknown() {
        match create_provider("deepl") {
            Err(SuggestError::Config(msg)) => assert!(msg.contains("deepl")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }
}
