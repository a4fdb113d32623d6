//! Few-shot prompt rendering.
//!
//! The `alpaca` template is an instruction line, one source/target line
//! pair per in-context example, and the query source line followed by a
//! bare target-language cue:
//!
//! ```text
//! Instruction: Translate the following German text into English.
//! German: Guten Morgen.
//! English: Good morning.
//! German: Hallo Welt
//! English:
//! ```

use crate::corpus::SentencePair;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while building a prompt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),
}

/// Languages with a known display name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    En,
    De,
    Fr,
    Ru,
}

impl Language {
    /// ISO 639-1 code, as used in corpus file names
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Ru => "ru",
        }
    }

    /// English name shown in prompts
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::De => "German",
            Self::Fr => "French",
            Self::Ru => "Russian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            "ru" => Ok(Self::Ru),
            _ => Err(PromptError::UnknownLanguage(s.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = PromptError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Prompt template family
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Template {
    #[default]
    Alpaca,
}

impl Template {
    /// Name used in configuration and output file names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alpaca => "alpaca",
        }
    }

    /// Render a prompt for `query` using the example groups in order
    #[must_use]
    pub fn render<G: AsRef<[SentencePair]>>(
        self,
        query: &str,
        groups: &[G],
        source: Language,
        target: Language,
    ) -> String {
        match self {
            Self::Alpaca => render_alpaca(query, groups, source, target),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpaca" => Ok(Self::Alpaca),
            _ => Err(PromptError::InvalidTemplate(s.to_string())),
        }
    }
}

impl TryFrom<String> for Template {
    type Error = PromptError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

fn render_alpaca<G: AsRef<[SentencePair]>>(
    query: &str,
    groups: &[G],
    source: Language,
    target: Language,
) -> String {
    let src = source.display_name();
    let tgt = target.display_name();

    let mut lines = vec![format!(
        "Instruction: Translate the following {src} text into {tgt}."
    )];

    for group in groups {
        let group: &[SentencePair] = group.as_ref();
        for pair in group {
            lines.push(format!("{src}: {}", pair.source));
            lines.push(format!("{tgt}: {}", pair.target));
        }
    }

    lines.push(format!("{src}: {query}"));
    lines.push(format!("{tgt}:"));

    lines.join("\n")
}

/// Build a prompt from string-typed language codes and template name
///
/// # Errors
///
/// Returns `PromptError::InvalidTemplate` for an unsupported template and
/// `PromptError::UnknownLanguage` for a language code without a display name.
pub fn assemble<G: AsRef<[SentencePair]>>(
    query: &str,
    groups: &[G],
    source: &str,
    target: &str,
    template: &str,
) -> Result<String, PromptError> {
    let template = Template::from_str(template)?;
    let source = Language::from_str(source)?;
    let target = Language::from_str(target)?;
    Ok(template.render(query, groups, source, target))
}
