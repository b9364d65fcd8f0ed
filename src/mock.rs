//! Mock engines for testing.
//!
//! Deterministic, API-free stand-ins for the two engine traits, used by this
//! crate's own tests and exported for downstream test suites. Both mocks count
//! their calls and record the texts they were asked to translate, so tests can
//! assert how often and with what input the external boundary was hit.
//!
//! # Example
//!
//! ```ignore
//! let engine = Arc::new(MockTranslationEngine::new(MockMode::Suffix));
//! let provider = GoogleTranslate::with_engine(engine.clone());
//! let result = provider.translate(Some("hello")).await.unwrap();
//! assert_eq!(result, "hello_en");
//! assert_eq!(engine.call_count(), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::engine::{ChatEngine, ChatRequest, TextTranslationEngine};
use crate::error::{SuggestError, SuggestResult};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target code: `"hello"` → `"hello_fr"`
    Suffix,
    /// Use predefined `(text, target)` → translation mappings, falling back
    /// to suffix behavior for unknown inputs
    Mappings(HashMap<(String, String), String>),
    /// Reverse word order, simulating word-order-changing languages
    Reorder,
    /// Fail for texts containing the given substring, suffix otherwise
    FailOn(String),
    /// Fail every call with an engine error
    Error(String),
    /// Return the input unchanged
    NoOp,
}

/// Mock [`TextTranslationEngine`] with scriptable behavior
#[derive(Debug)]
pub struct MockTranslationEngine {
    mode: MockMode,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockTranslationEngine {
    /// Create a mock engine with the given mode
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `translate_text` calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts received by `translate_text`, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn apply_translation(&self, text: &str, target: &str) -> SuggestResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Reorder => {
                let words: Vec<&str> = text.split_whitespace().collect();
                Ok(words.into_iter().rev().collect::<Vec<_>>().join(" "))
            }
            MockMode::FailOn(needle) => {
                if text.contains(needle.as_str()) {
                    Err(SuggestError::Engine(format!(
                        "mock failure triggered by {:?}",
                        needle
                    )))
                } else {
                    Ok(format!("{}_{}", text, target))
                }
            }
            MockMode::Error(msg) => Err(SuggestError::Engine(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl TextTranslationEngine for MockTranslationEngine {
    async fn translate_text(
        &self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> SuggestResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());
        self.apply_translation(text, target)
    }

    fn name(&self) -> &'static str {
        "Mock Translation Engine"
    }
}

/// Mock [`ChatEngine`] with a scripted reply queue
#[derive(Debug)]
pub struct MockChatEngine {
    replies: Mutex<VecDeque<String>>,
    fail_with: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatEngine {
    /// Create a mock that answers calls from a fixed reply queue; once the
    /// queue is exhausted further calls fail
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fail_with: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that fails every call with an engine error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fail_with: Some(message.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `complete` calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received by `complete`, in call order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatEngine for MockChatEngine {
    async fn complete(&self, request: ChatRequest) -> SuggestResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        if let Some(message) = &self.fail_with {
            return Err(SuggestError::Engine(message.clone()));
        }

        self.replies.lock().pop_front().ok_or_else(|| {
            SuggestError::Engine("mock chat engine has no scripted reply left".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "Mock Chat Engine"
    }
}
