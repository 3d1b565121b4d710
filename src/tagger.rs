//! Heuristic AI tagging of commit messages.
//!
//! Two pattern families are checked against every message:
//! - body patterns, case-insensitive and matched anywhere in the message;
//! - trailer patterns, matched against one line at a time.
//!
//! Every matching pattern contributes one evidence entry of the form
//! `<family>:<pattern>`, so callers can see exactly why a commit was tagged.
//!
//! Word boundaries (`\b`, `\B`) use the ASCII definition of a word
//! character, so `AIによる修正` still matches `\bai\b`.

use log::trace;
use regex::{Regex, RegexBuilder};

use crate::models::TagResult;

/// Body patterns always checked before any configured extras.
pub const DEFAULT_BODY_PATTERNS: &[&str] =
    &[r"\b(ai|copilot|cursor|windsurf|codeium)\b", r"\[ai\]"];

/// Structured trailers that mark a commit as AI-assisted.
pub const DEFAULT_TRAILER_PATTERNS: &[&str] =
    &[r"^AI:\s*true$", r"^X-AI:\s*true$", r"^Co-authored-by:.*bot.*$"];

const MESSAGE_FAMILY: &str = "message_pattern";
const TRAILER_FAMILY: &str = "trailer_pattern";

#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("Invalid AI pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Caller-supplied tagging configuration.
#[derive(Debug, Clone, Default)]
pub struct TaggerConfig {
    /// Extra body patterns appended after the defaults.
    pub extra_patterns: Vec<String>,
}

impl TaggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    fn compile(pattern: &str, case_insensitive: bool) -> Result<Self, TaggerError> {
        let regex = RegexBuilder::new(&ascii_word_boundaries(pattern))
            .case_insensitive(case_insensitive)
            .multi_line(true)
            .crlf(true)
            .build()
            .map_err(|source| TaggerError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    fn evidence(&self, family: &str) -> String {
        format!("{}:{}", family, self.source)
    }
}

/// Rewrite `\b` and `\B` outside character classes to their ASCII-only forms.
fn ascii_word_boundaries(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut class_depth = 0usize;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push(c);
                    break;
                };
                let special = chars.peek() == Some(&'{');
                match next {
                    'b' | 'B' if class_depth == 0 && !special => {
                        out.push_str("(?-u:\\");
                        out.push(next);
                        out.push(')');
                    }
                    _ => {
                        out.push(c);
                        out.push(next);
                    }
                }
            }
            '[' => {
                class_depth += 1;
                out.push(c);
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Compiled tagger. Build once, then call [`AiTagger::tag`] per commit.
#[derive(Debug, Clone)]
pub struct AiTagger {
    body: Vec<CompiledPattern>,
    trailers: Vec<CompiledPattern>,
}

impl AiTagger {
    /// Compile the default patterns plus the configured extras.
    ///
    /// Fails on the first pattern that is not a valid regular expression.
    pub fn new(config: &TaggerConfig) -> Result<Self, TaggerError> {
        let body = DEFAULT_BODY_PATTERNS
            .iter()
            .copied()
            .chain(config.extra_patterns.iter().map(String::as_str))
            .map(|p| CompiledPattern::compile(p, true))
            .collect::<Result<Vec<_>, _>>()?;

        let trailers = DEFAULT_TRAILER_PATTERNS
            .iter()
            .map(|p| CompiledPattern::compile(p, false))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { body, trailers })
    }

    /// Tagger with only the built-in patterns.
    pub fn with_defaults() -> Result<Self, TaggerError> {
        Self::new(&TaggerConfig::default())
    }

    /// Tag a commit message. Every pattern is tested; nothing short-circuits.
    pub fn tag(&self, message: &str) -> TagResult {
        let mut evidence = Vec::new();

        for pattern in &self.body {
            if pattern.regex.is_match(message) {
                evidence.push(pattern.evidence(MESSAGE_FAMILY));
            }
        }

        for pattern in &self.trailers {
            if message.lines().any(|line| pattern.regex.is_match(line)) {
                evidence.push(pattern.evidence(TRAILER_FAMILY));
            }
        }

        if !evidence.is_empty() {
            trace!("Tagged message with {} heuristic(s)", evidence.len());
        }
        TagResult::from_evidence(evidence)
    }
}
