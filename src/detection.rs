//! Best-effort source language detection.
//!
//! Detection runs as a linear fallback chain:
//!
//! 1. ask the chat engine for the ISO 639-1 code of the text and validate the
//!    reply strictly (two lowercase ASCII letters, nothing else);
//! 2. on an engine error or an invalid reply, fall back to a local
//!    statistical detector (`whatlang`) and take its best match;
//! 3. if that also yields nothing, the result is "no detected language".
//!
//! Engine errors are reported through the injected [`ErrorReporter`] and never
//! propagated; the caller only ever sees an `Option`. The complete outcome,
//! including `None`, is cached by content hash for [`DETECTION_TTL`] so
//! repeated lookups for identical text do not re-invoke the engine.

use log::debug;

use crate::cache::{detection_cache_key, DetectionCache, DETECTION_TTL};
use crate::engine::{ChatEngine, ChatRequest};
use crate::report::ErrorReporter;

/// System prompt of the primary detection request
const DETECT_SYSTEM_PROMPT: &str = "Return only the ISO 639-1 language code \
(e.g. \"pl\", \"en\", \"de\") of the given text. No explanation.";

/// Detect the language of `text`, going through the cache and the fallback
/// chain described in the module docs
pub async fn detect_language(
    engine: &dyn ChatEngine,
    model: &str,
    cache: &dyn DetectionCache,
    reporter: &dyn ErrorReporter,
    text: &str,
) -> Option<String> {
    let key = detection_cache_key(text);
    if let Some(cached) = cache.get(&key) {
        return cached;
    }

    let detected = detect_uncached(engine, model, reporter, text).await;
    cache.put(&key, detected.clone(), DETECTION_TTL);
    detected
}

async fn detect_uncached(
    engine: &dyn ChatEngine,
    model: &str,
    reporter: &dyn ErrorReporter,
    text: &str,
) -> Option<String> {
    let request = ChatRequest::new(model)
        .temperature(0.0)
        .system(DETECT_SYSTEM_PROMPT)
        .user(text);

    match engine.complete(request).await {
        Ok(reply) => {
            let code = reply.trim().to_lowercase();
            if is_language_code(&code) {
                return Some(code);
            }
            debug!("primary detection returned invalid code {:?}", code);
        }
        Err(error) => reporter.report("language detection", &error),
    }

    whatlang_fallback(text)
}

/// Strict two-lowercase-letter language code check
pub fn is_language_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase())
}

/// Run the local statistical detector and map its best match to an ISO 639-1
/// code; languages without a mapping yield `None`
pub fn whatlang_fallback(text: &str) -> Option<String> {
    let info = whatlang::detect(text)?;
    let code = whatlang_code(info.lang())?;
    debug!("fallback detector classified text as {}", code);
    Some(code.to_string())
}

fn whatlang_code(lang: whatlang::Lang) -> Option<&'static str> {
    use whatlang::Lang::*;
    match lang {
        Eng => Some("en"),
        Cmn => Some("zh"),
        Jpn => Some("ja"),
        Kor => Some("ko"),
        Fra => Some("fr"),
        Deu => Some("de"),
        Spa => Some("es"),
        Rus => Some("ru"),
        Por => Some("pt"),
        Ita => Some("it"),
        Ara => Some("ar"),
        Hin => Some("hi"),
        Tur => Some("tr"),
        Vie => Some("vi"),
        Tha => Some("th"),
        Nld => Some("nl"),
        Pol => Some("pl"),
        Ukr => Some("uk"),
        _ => None,
    }
}
