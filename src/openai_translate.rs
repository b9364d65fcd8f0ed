//! OpenAI translation suggestion provider.
//!
//! [`OpenAiChatClient`] is a thin chat-completions client carrying explicit
//! credentials ([`OpenAiConfig`], usually loaded from the environment).
//! [`OpenAiTranslate`] wraps it with a translation prompt, placeholder
//! preservation, the batch error-isolation contract, and best-effort source
//! language detection with a TTL cache (see [`crate::detection`]).

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;

use crate::cache::{DetectionCache, MemoryDetectionCache};
use crate::detection::detect_language;
use crate::engine::{ChatEngine, ChatMessage, ChatRequest};
use crate::error::{SuggestError, SuggestResult};
use crate::placeholder::{PlaceholderPattern, PreserveMode};
use crate::provider::{SuggestionProvider, DEFAULT_TARGET_LANG};
use crate::report::{ErrorReporter, LogReporter};

/// Model used when none is configured
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

const OPENAI_API_ENDPOINT: &str = "https://api.openai.com";

const SYSTEM_PROMPT: &str = "You are a professional translator. You always preserve \
parameters like :name or #{0} during translation.\n\
Avoid hallucinations. Never wrap the translation in quotes or formatting.";

/// Credentials and connection settings for the OpenAI API
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key (required)
    pub api_key: String,
    /// Optional organization identifier
    pub organization: Option<String>,
    /// Optional project identifier
    pub project: Option<String>,
    /// Model used for translation and detection
    pub model: String,
    /// API endpoint base URL
    pub endpoint: String,
}

impl OpenAiConfig {
    /// Create a config with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            organization: None,
            project: None,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            endpoint: OPENAI_API_ENDPOINT.to_string(),
        }
    }

    /// Load the config from the environment
    ///
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_ORGANIZATION`,
    /// `OPENAI_PROJECT` and `OPENAI_MODEL` (optional).
    pub fn from_env() -> SuggestResult<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            SuggestError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let mut config = Self::new(api_key);
        config.organization = env::var("OPENAI_ORGANIZATION").ok();
        config.project = env::var("OPENAI_PROJECT").ok();
        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set the organization identifier
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the project identifier
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the endpoint base URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"***")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completions client for the OpenAI API
pub struct OpenAiChatClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiChatClient {
    /// Create a new client
    pub fn new(config: OpenAiConfig) -> SuggestResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SuggestError::Config(
                "OpenAI API key cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SuggestError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

impl std::fmt::Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl ChatEngine for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> SuggestResult<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let mut http_request = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request);

        if let Some(organization) = &self.config.organization {
            http_request = http_request.header("OpenAI-Organization", organization);
        }
        if let Some(project) = &self.config.project {
            http_request = http_request.header("OpenAI-Project", project);
        }

        let response = http_request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            error!("OpenAI API error ({}): {}", status, body);
            return Err(SuggestError::Engine(format!(
                "OpenAI API error ({}): {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            SuggestError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                SuggestError::InvalidResponse("response contained no choices".to_string())
            })
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}

/// Translation suggestion provider backed by the OpenAI chat API
pub struct OpenAiTranslate {
    engine: Arc<dyn ChatEngine>,
    cache: Arc<dyn DetectionCache>,
    reporter: Arc<dyn ErrorReporter>,
    model: String,
    source: Option<String>,
    target: String,
    preserve: PreserveMode,
    last_detected: RwLock<Option<String>>,
}

impl OpenAiTranslate {
    /// Create a provider from an explicit config
    pub fn new(config: OpenAiConfig) -> SuggestResult<Self> {
        let model = config.model.clone();
        Ok(Self::with_engine(
            Arc::new(OpenAiChatClient::new(config)?),
            model,
        ))
    }

    /// Create a provider with credentials from the environment
    pub fn from_env() -> SuggestResult<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Create a provider around an injected chat engine
    pub fn with_engine(engine: Arc<dyn ChatEngine>, model: impl Into<String>) -> Self {
        Self {
            engine,
            cache: Arc::new(MemoryDetectionCache::new()),
            reporter: Arc::new(LogReporter),
            model: model.into(),
            source: None,
            target: DEFAULT_TARGET_LANG.to_string(),
            preserve: PreserveMode::Default,
            last_detected: RwLock::new(None),
        }
    }

    /// Replace the detection cache
    pub fn with_cache(mut self, cache: Arc<dyn DetectionCache>) -> Self {
        self.cache = cache;
        self
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

    /// Source language recorded by the most recent successful `translate`
    pub fn last_detected_source(&self) -> Option<String> {
        self.last_detected.read().clone()
    }

    /// Detect the source language of `text`
    ///
    /// Sets the source language to "detect automatically", performs a full
    /// translation and returns the source language that translation recorded.
    /// This has exactly the cost and side effects of calling [`translate`]
    /// (one translation completion, plus one detection completion on a
    /// detection-cache miss).
    ///
    /// [`translate`]: SuggestionProvider::translate
    pub async fn detect(&mut self, text: &str) -> SuggestResult<Option<String>> {
        if text.is_empty() {
            return Ok(None);
        }

        self.set_source(None);
        self.translate(Some(text)).await?;
        Ok(self.last_detected_source())
    }

    fn build_prompt(&self, text: &str) -> String {
        let source = self.source.as_deref().unwrap_or("auto");
        format!(
            "Translate the following text from \"{}\" to \"{}\".\n\
             Return only the translated text without quotes or markdown formatting.\n\
             \n\
             Text:\n\
             {}",
            source, self.target, text
        )
    }
}

#[async_trait]
impl SuggestionProvider for OpenAiTranslate {
    fn id(&self) -> &'static str {
        "openai"
    }

    fn engine(&self) -> &'static str {
        "OpenAI Translate"
    }

    fn icon(&self) -> &'static str {
        "openai"
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

        let request = ChatRequest::new(&self.model)
            .temperature(0.2)
            .system(SYSTEM_PROMPT)
            .user(self.build_prompt(&input));

        let reply = self.engine.complete(request).await?;
        let translated = reply.trim().to_string();

        // Record the source language of this translation: the configured one,
        // or the detection chain's best effort on the source text. Detection
        // failures never fail the translation.
        let detected = match &self.source {
            Some(lang) => Some(lang.clone()),
            None => {
                detect_language(
                    self.engine.as_ref(),
                    &self.model,
                    self.cache.as_ref(),
                    self.reporter.as_ref(),
                    text,
                )
                .await
            }
        };
        *self.last_detected.write() = detected;

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
                        .report(&format!("openai translate_many[{}]", key), &e);
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
    use crate::mock::MockChatEngine;
    use crate::report::CollectingReporter;

    fn provider_with(engine: MockChatEngine) -> (OpenAiTranslate, Arc<MockChatEngine>) {
        let engine = Arc::new(engine);
        let provider = OpenAiTranslate::with_engine(engine.clone(), DEFAULT_OPENAI_MODEL);
        (provider, engine)
    }

    #[test]
    fn test_identity() {
        let (provider, _) = provider_with(MockChatEngine::with_replies(Vec::<String>::new()));
        assert_eq!(provider.id(), "openai");
        assert_eq!(provider.engine(), "OpenAI Translate");
        assert_eq!(provider.icon(), "openai");
    }

    #[test]
    fn test_config_from_env_without_key() {
        unsafe {
            env::remove_var("OPENAI_API_KEY");
        }
        match OpenAiConfig::from_env() {
            Err(SuggestError::Config(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiConfig::new("sk-test")
            .organization("org-1")
            .project("proj-1")
            .model("gpt-4o-mini");

        assert_eq!(config.organization.as_deref(), Some("org-1"));
        assert_eq!(config.project.as_deref(), Some("proj-1"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.endpoint, OPENAI_API_ENDPOINT);
    }

    #[test]
    fn test_config_debug_masks_api_key() {
        let config = OpenAiConfig::new("sk-secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("***"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_client_rejects_empty_api_key() {
        let result = OpenAiChatClient::new(OpenAiConfig::new("   "));
        assert!(matches!(result, Err(SuggestError::Config(_))));
    }

    #[tokio::test]
    async fn test_translate_trims_reply_and_reinjects() {
        // First reply answers the translation, second the detection query
        let (provider, engine) =
            provider_with(MockChatEngine::with_replies(["  Bonjour #{0} !\n", "en"]));

        let result = provider.translate(Some("Hello :name !")).await.unwrap();

        assert_eq!(result, "Bonjour :name !");
        // Translation + detection
        assert_eq!(engine.call_count(), 2);
        assert_eq!(provider.last_detected_source(), Some("en".to_string()));
    }

    #[tokio::test]
    async fn test_translate_with_configured_source_skips_detection() {
        let (provider, engine) = provider_with(MockChatEngine::with_replies(["Hallo"]));
        let provider = provider.with_source(Some("en")).with_target(Some("de"));

        let result = provider.translate(Some("Hello")).await.unwrap();

        assert_eq!(result, "Hallo");
        assert_eq!(engine.call_count(), 1);
        assert_eq!(provider.last_detected_source(), Some("en".to_string()));
    }

    #[tokio::test]
    async fn test_translate_prompt_carries_languages_and_masked_text() {
        let (provider, engine) = provider_with(MockChatEngine::with_replies(["Hola #{0}"]));
        let provider = provider.with_source(Some("en")).with_target(Some("es"));

        provider.translate(Some("Hi :name")).await.unwrap();

        let requests = engine.requests();
        assert_eq!(requests.len(), 1);
        let user = &requests[0].messages()[1].content;
        assert!(user.contains("from \"en\" to \"es\""));
        assert!(user.contains("Hi #{0}"));
        assert!(!user.contains(":name"));
    }

    #[tokio::test]
    async fn test_translate_none_and_empty_skip_the_engine() {
        let (provider, engine) = provider_with(MockChatEngine::with_replies(["unused"]));
        assert_eq!(provider.translate(None).await.unwrap(), "");
        assert_eq!(provider.translate(Some("")).await.unwrap(), "");
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_detection_failure_does_not_fail_translate() {
        // Translation succeeds, detection errors out (queue exhausted), the
        // fallback classifies the digits-only text as nothing
        let (provider, _) = provider_with(MockChatEngine::with_replies(["42 43"]));
        let reporter = Arc::new(CollectingReporter::default());
        let provider = provider.with_reporter(reporter.clone());

        let result = provider.translate(Some("40 41")).await.unwrap();

        assert_eq!(result, "42 43");
        assert_eq!(provider.last_detected_source(), None);
        assert_eq!(reporter.count(), 1);
    }

    #[tokio::test]
    async fn test_detect_sets_source_to_auto_and_returns_code() {
        let (provider, engine) =
            provider_with(MockChatEngine::with_replies(["Bonjour tout le monde", "en"]));
        let mut provider = provider.with_source(Some("de"));

        let detected = provider
            .detect("Hello everyone in the meeting room")
            .await
            .unwrap();

        assert_eq!(detected, Some("en".to_string()));
        assert_eq!(provider.source_lang(), None);
        assert_eq!(engine.call_count(), 2);
    }

    #[tokio::test]
    async fn test_detect_empty_text() {
        let (provider, engine) = provider_with(MockChatEngine::with_replies(["unused"]));
        let mut provider = provider;
        assert_eq!(provider.detect("").await.unwrap(), None);
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_propagates_engine_errors() {
        let (provider, _) = provider_with(MockChatEngine::failing("quota exceeded"));
        match provider.translate(Some("hello")).await {
            Err(SuggestError::Engine(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("expected Engine error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_many_isolates_failures() {
        let (provider, _) = provider_with(MockChatEngine::failing("down"));
        let reporter = Arc::new(CollectingReporter::default());
        let provider = provider.with_reporter(reporter.clone());

        let mut texts = HashMap::new();
        texts.insert("a".to_string(), "hello".to_string());
        texts.insert("b".to_string(), "world".to_string());

        let results = provider.translate_many(&texts).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results["a"], None);
        assert_eq!(results["b"], None);
        assert_eq!(reporter.count(), 2);
    }

    #[test]
    fn test_last_detected_source_starts_unset() {
        let (provider, _) = provider_with(MockChatEngine::with_replies(Vec::<String>::new()));
        assert_eq!(provider.last_detected_source(), None);
    }
}
