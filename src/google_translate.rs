//! Google Translate suggestion provider.
//!
//! [`GoogleWebEngine`] talks to the public web translation endpoint
//! (`translate.googleapis.com/translate_a/single`), the same endpoint the
//! in-browser widget uses: no API key, `sl=auto` for source detection, and a
//! JSON array response whose first element holds the translated segments.
//! [`GoogleTranslate`] wraps it with placeholder preservation and the batch
//! error-isolation contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;

use crate::engine::TextTranslationEngine;
use crate::error::{SuggestError, SuggestResult};
use crate::placeholder::{PlaceholderPattern, PreserveMode};
use crate::provider::{
    normalize_lang_code, validate_lang_code, SuggestionProvider, DEFAULT_TARGET_LANG,
};
use crate::report::{ErrorReporter, LogReporter};

const GOOGLE_WEB_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Client for the free Google web translation endpoint
pub struct GoogleWebEngine {
    client: Client,
    base_url: String,
}

impl GoogleWebEngine {
    /// Create a new engine against the public endpoint
    pub fn new() -> SuggestResult<Self> {
        Self::with_base_url(GOOGLE_WEB_ENDPOINT)
    }

    /// Create a new engine against a custom endpoint URL
    pub fn with_base_url(base_url: impl Into<String>) -> SuggestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SuggestError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl std::fmt::Debug for GoogleWebEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleWebEngine")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl TextTranslationEngine for GoogleWebEngine {
    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> SuggestResult<String> {
        let source = if source == "auto" {
            "auto".to_string()
        } else {
            validate_lang_code(source)?;
            normalize_lang_code(source)
        };
        validate_lang_code(target)?;
        let target = normalize_lang_code(target);

        let response = self
            .client
            .get(&self.base_url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            error!("Google web endpoint error ({}): {}", status, body);
            return Err(SuggestError::Engine(format!(
                "Google web endpoint error ({}): {}",
                status, body
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            SuggestError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        // The first array element holds [translated, original, ...] segments
        let segments = json.get(0).and_then(|v| v.as_array()).ok_or_else(|| {
            SuggestError::InvalidResponse("missing translation segment array".to_string())
        })?;

        let mut result = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
                result.push_str(part);
            }
        }

        if result.is_empty() && !text.is_empty() {
            return Err(SuggestError::InvalidResponse(
                "response contained no translated text".to_string(),
            ));
        }

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Google Translate"
    }
}

/// Translation suggestion provider backed by Google's web translation service
pub struct GoogleTranslate {
    engine: Arc<dyn TextTranslationEngine>,
    reporter: Arc<dyn ErrorReporter>,
    source: Option<String>,
    target: String,
    preserve: PreserveMode,
}

impl GoogleTranslate {
    /// Create a provider against the public web endpoint, with placeholder
    /// preservation enabled and the default target language
    pub fn new() -> SuggestResult<Self> {
        Ok(Self::with_engine(Arc::new(GoogleWebEngine::new()?)))
    }

    /// Create a provider around an injected engine
    pub fn with_engine(engine: Arc<dyn TextTranslationEngine>) -> Self {
        Self {
            engine,
            reporter: Arc::new(LogReporter),
            source: None,
            target: DEFAULT_TARGET_LANG.to_string(),
            preserve: PreserveMode::Default,
        }
    }

    /// Replace the error reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set the source language; `None` requests automatic detection
    pub fn with_source(mut self, lang: Option<&str>) -> Self {
        self.set_source(lang);
        self
    }

    /// Set the target language; `None` falls back to the default target
    pub fn with_target(mut self, lang: Option<&str>) -> Self {
        self.set_target(lang);
        self
    }

    /// Configure placeholder handling
    pub fn with_preserve(mut self, mode: impl Into<PreserveMode>) -> Self {
        self.preserve_parameters(mode.into());
        self
    }

    /// Currently configured source language, if any
    pub fn source_lang(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Currently configured target language
    pub fn target_lang(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl SuggestionProvider for GoogleTranslate {
    fn id(&self) -> &'static str {
        "google"
    }

    fn engine(&self) -> &'static str {
        "Google Translate"
    }

    fn icon(&self) -> &'static str {
        "google"
    }

    fn preserve_parameters(&mut self, mode: PreserveMode) {
        self.preserve = mode;
    }

    fn set_source(&mut self, lang: Option<&str>) {
        self.source = lang.map(|l| l.to_string());
    }

    fn set_target(&mut self, lang: Option<&str>) {
        self.target = lang.unwrap_or(DEFAULT_TARGET_LANG).to_string();
    }

    async fn translate(&self, text: Option<&str>) -> SuggestResult<String> {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(String::new()),
        };

        let pattern = PlaceholderPattern::from_mode(&self.preserve)?;
        let (input, originals) = match &pattern {
            Some(p) => {
                let extraction = p.extract(text);
                (extraction.masked, extraction.originals)
            }
            None => (text.to_string(), Vec::new()),
        };

        let source = self.source.as_deref().unwrap_or("auto");
        let translated = self
            .engine
            .translate_text(&input, source, &self.target)
            .await?;

        Ok(match &pattern {
            Some(p) => p.reinject(&translated, &originals),
            None => translated,
        })
    }

    async fn translate_many(
        &self,
        texts: &HashMap<String, String>,
    ) -> HashMap<String, Option<String>> {
        let mut results = HashMap::with_capacity(texts.len());

        for (key, text) in texts {
            match self.translate(Some(text)).await {
                Ok(translated) => {
                    results.insert(key.clone(), Some(translated));
                }
                Err(e) => {
                    self.reporter
                        .report(&format!("google translate_many[{}]", key), &e);
                    results.insert(key.clone(), None);
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMode, MockTranslationEngine};
    use crate::report::CollectingReporter;

    fn provider_with(mode: MockMode) -> (GoogleTranslate, Arc<MockTranslationEngine>) {
        let engine = Arc::new(MockTranslationEngine::new(mode));
        let provider = GoogleTranslate::with_engine(engine.clone());
        (provider, engine)
    }

    #[test]
    fn test_identity() {
        let (provider, _) = provider_with(MockMode::NoOp);
        assert_eq!(provider.id(), "google");
        assert_eq!(provider.engine(), "Google Translate");
        assert_eq!(provider.icon(), "google");
    }

    #[test]
    fn test_defaults() {
        let (provider, _) = provider_with(MockMode::NoOp);
        assert_eq!(provider.source_lang(), None);
        assert_eq!(provider.target_lang(), DEFAULT_TARGET_LANG);
    }

    #[test]
    fn test_set_target_none_falls_back_to_default() {
        let (mut provider, _) = provider_with(MockMode::NoOp);
        provider.set_target(Some("fr"));
        assert_eq!(provider.target_lang(), "fr");
        provider.set_target(None);
        assert_eq!(provider.target_lang(), "en");
    }

    #[tokio::test]
    async fn test_translate_none_and_empty_skip_the_engine() {
        let (provider, engine) = provider_with(MockMode::Suffix);
        assert_eq!(provider.translate(None).await.unwrap(), "");
        assert_eq!(provider.translate(Some("")).await.unwrap(), "");
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_preserves_placeholders_through_identity_engine() {
        let (provider, engine) = provider_with(MockMode::NoOp);
        let result = provider
            .translate(Some("Hello :name, you have :count messages"))
            .await
            .unwrap();

        assert_eq!(result, "Hello :name, you have :count messages");
        // The engine saw masked markers, not the raw placeholders
        assert_eq!(engine.requests(), vec!["Hello #{0}, you have #{1} messages"]);
    }

    #[tokio::test]
    async fn test_translate_survives_marker_reordering() {
        let (provider, _) = provider_with(MockMode::Reorder);
        let result = provider.translate(Some("from :a to :b")).await.unwrap();
        // Reorder reverses words: "#{1} to #{0} from" → ":b to :a from"
        assert_eq!(result, ":b to :a from");
    }

    #[tokio::test]
    async fn test_preserve_disabled_passes_placeholders_untouched() {
        let (mut provider, engine) = provider_with(MockMode::NoOp);
        provider.preserve_parameters(PreserveMode::Disabled);

        let result = provider.translate(Some("Hello :name")).await.unwrap();

        assert_eq!(result, "Hello :name");
        assert_eq!(engine.requests(), vec!["Hello :name"]);
    }

    #[tokio::test]
    async fn test_custom_pattern_via_builder() {
        let engine = Arc::new(MockTranslationEngine::new(MockMode::NoOp));
        let provider =
            GoogleTranslate::with_engine(engine.clone()).with_preserve(r"\{\{(\w+)\}\}");

        let result = provider.translate(Some("Hi {{name}}")).await.unwrap();

        assert_eq!(result, "Hi {{name}}");
        assert_eq!(engine.requests(), vec!["Hi #{0}"]);
    }

    #[tokio::test]
    async fn test_translate_propagates_engine_errors() {
        let (provider, _) = provider_with(MockMode::Error("unreachable".to_string()));
        match provider.translate(Some("hello")).await {
            Err(SuggestError::Engine(msg)) => assert_eq!(msg, "unreachable"),
            other => panic!("expected Engine error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_suffix_shows_configured_target() {
        let engine = Arc::new(MockTranslationEngine::new(MockMode::Suffix));
        let provider = GoogleTranslate::with_engine(engine).with_target(Some("fr"));
        assert_eq!(provider.translate(Some("hello")).await.unwrap(), "hello_fr");
    }

    #[tokio::test]
    async fn test_translate_many_isolates_failures() {
        let engine = Arc::new(MockTranslationEngine::new(MockMode::FailOn(
            "boom".to_string(),
        )));
        let reporter = Arc::new(CollectingReporter::default());
        let provider = GoogleTranslate::with_engine(engine).with_reporter(reporter.clone());

        let mut texts = HashMap::new();
        texts.insert("a".to_string(), "hello".to_string());
        texts.insert("b".to_string(), "boom".to_string());

        let results = provider.translate_many(&texts).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results["a"], Some("hello_en".to_string()));
        assert_eq!(results["b"], None);
        // The failure was reported exactly once
        assert_eq!(reporter.count(), 1);
    }

    #[tokio::test]
    async fn test_translate_many_empty_input() {
        let (provider, engine) = provider_with(MockMode::Suffix);
        let results = provider.translate_many(&HashMap::new()).await;
        assert!(results.is_empty());
        assert_eq!(engine.call_count(), 0);
    }

    #[test]
    fn test_web_engine_construction() {
        assert!(GoogleWebEngine::new().is_ok());
    }
}
