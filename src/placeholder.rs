//! Placeholder extraction and reinjection.
//!
//! Localized strings embed parameter tokens (`:name`, `:count`) that must
//! survive translation unchanged. Before the text is sent to an external
//! engine, every pattern match is replaced left-to-right with a positional
//! marker (`#{0}`, `#{1}`, ...); after translation the markers are replaced
//! with the original substrings again. The marker format is chosen so that
//! translation engines tend to pass it through verbatim; if an engine still
//! mangles a marker, reinjection is best-effort rather than an error.
//!
//! # Example
//!
//! ```ignore
//! let pattern = PlaceholderPattern::new(DEFAULT_PLACEHOLDER_PATTERN)?;
//! let extraction = pattern.extract("Hello :name!");
//! assert_eq!(extraction.masked, "Hello #{0}!");
//! let restored = pattern.reinject("Bonjour #{0}!", &extraction.originals);
//! assert_eq!(restored, "Bonjour :name!");
//! ```

use regex::Regex;

use crate::error::{SuggestError, SuggestResult};

/// Default placeholder pattern: a colon followed by a word, e.g. `:name`
pub const DEFAULT_PLACEHOLDER_PATTERN: &str = r":(\w+)";

/// Pattern matching the positional markers emitted by extraction
const MARKER_PATTERN: &str = r"#\{(\d+)\}";

/// Placeholder handling mode, mirroring the `true | false | pattern` contract
/// of the provider interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreserveMode {
    /// Use [`DEFAULT_PLACEHOLDER_PATTERN`]
    Default,
    /// Do not touch placeholders at all
    Disabled,
    /// Use a custom regular expression
    Pattern(String),
}

impl From<bool> for PreserveMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            PreserveMode::Default
        } else {
            PreserveMode::Disabled
        }
    }
}

impl From<&str> for PreserveMode {
    fn from(pattern: &str) -> Self {
        PreserveMode::Pattern(pattern.to_string())
    }
}

impl From<String> for PreserveMode {
    fn from(pattern: String) -> Self {
        PreserveMode::Pattern(pattern)
    }
}

/// Result of masking a text: the masked text plus the original substrings,
/// indexed by marker ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Input text with every match replaced by its positional marker
    pub masked: String,
    /// Original matched substrings, `originals[i]` corresponding to `#{i}`
    pub originals: Vec<String>,
}

/// A compiled placeholder pattern
#[derive(Debug, Clone)]
pub struct PlaceholderPattern {
    pattern: Regex,
    marker: Regex,
}

impl PlaceholderPattern {
    /// Compile a placeholder pattern
    pub fn new(pattern: &str) -> SuggestResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| SuggestError::Pattern(format!("{}: {}", pattern, e)))?;
        let marker = Regex::new(MARKER_PATTERN)
            .map_err(|e| SuggestError::Pattern(e.to_string()))?;
        Ok(Self { pattern, marker })
    }

    /// Compile the pattern selected by a [`PreserveMode`], `None` when
    /// placeholder handling is disabled
    pub fn from_mode(mode: &PreserveMode) -> SuggestResult<Option<Self>> {
        match mode {
            PreserveMode::Default => Self::new(DEFAULT_PLACEHOLDER_PATTERN).map(Some),
            PreserveMode::Disabled => Ok(None),
            PreserveMode::Pattern(pattern) => Self::new(pattern).map(Some),
        }
    }

    /// Replace every match with a positional marker, left to right
    ///
    /// The ordinal counter starts at 0 for every call; it is never shared
    /// between calls or stored on the pattern.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut originals = Vec::new();
        let masked = self
            .pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let marker = format!("#{{{}}}", originals.len());
                originals.push(caps[0].to_string());
                marker
            })
            .into_owned();
        Extraction { masked, originals }
    }

    /// Replace every positional marker in translated text with the original
    /// substring at that ordinal
    ///
    /// A marker whose ordinal was never emitted by extraction (the engine
    /// hallucinated or duplicated one out of range) is replaced with the
    /// empty string; reinjection never fails.
    pub fn reinject(&self, translated: &str, originals: &[String]) -> String {
        self.marker
            .replace_all(translated, |caps: &regex::Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| originals.get(index))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}
