//! Generation backends.
//!
//! The model itself lives outside this crate. A [`Generator`] takes a batch
//! of prompts and returns one [`Continuation`] per prompt, in order.
//!
//! [`CommandGenerator`] is the offline backend: it shells out to a local
//! command once per batch and exchanges JSON lines over stdin/stdout.
//!
//! Request, one line per prompt:
//!
//! ```text
//! {"prompt": "Instruction: ...\nEnglish:"}
//! ```
//!
//! Response, one line per prompt, in request order:
//!
//! ```text
//! {"text": "<prompt><continuation>"}
//! {"text": "...", "prompt_tokens": 57, "tokens": ["Instruction", ":", ...]}
//! ```

use crate::extract::{extract_answer, extract_answer_from_tokens};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors that can occur while generating
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generator command not found: {0}")]
    ToolNotFound(String),

    #[error("Generator exited with {status}: {stderr}")]
    ExecutionFailed { status: String, stderr: String },

    #[error("Invalid response on line {line}: {source}")]
    InvalidResponse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generator returned {got} continuations for {expected} prompts")]
    CountMismatch { expected: usize, got: usize },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Token-level view of a generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOutput {
    /// Number of leading tokens that belong to the prompt
    pub prompt_tokens: usize,
    /// Decoded token pieces, prompt included
    pub tokens: Vec<String>,
}

/// Raw output for one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    /// Prompt followed by the generated text
    pub text: String,
    /// Token pieces, when the backend reports them
    pub tokens: Option<TokenOutput>,
}

impl Continuation {
    /// Continuation with text only
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: None,
        }
    }

    /// Extract the single-line answer, stripping the prompt by token offset
    /// when possible and by string match otherwise
    #[must_use]
    pub fn answer(&self, prompt: &str) -> String {
        match &self.tokens {
            Some(out) => {
                extract_answer_from_tokens(out.prompt_tokens, &out.tokens, |rest| rest.concat())
            }
            None => extract_answer(&self.text, prompt),
        }
    }
}

/// Batch text generation capability
pub trait Generator {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Generate one continuation per prompt, preserving order
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails for any prompt in the batch.
    fn generate(&mut self, prompts: &[String]) -> Result<Vec<Continuation>, GenerationError>;
}

#[derive(Serialize)]
struct Request<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct Response {
    text: String,
    #[serde(default)]
    prompt_tokens: Option<usize>,
    #[serde(default)]
    tokens: Option<Vec<String>>,
}

impl From<Response> for Continuation {
    fn from(r: Response) -> Self {
        let tokens = match (r.prompt_tokens, r.tokens) {
            (Some(prompt_tokens), Some(tokens)) => Some(TokenOutput {
                prompt_tokens,
                tokens,
            }),
            _ => None,
        };
        Self {
            text: r.text,
            tokens,
        }
    }
}

/// Generator backed by a local command speaking JSON lines
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
    args: Vec<String>,
}

impl CommandGenerator {
    /// Create a generator running `command` with `args` for every batch
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Check if the command can be found
    #[must_use]
    pub fn is_available(&self) -> bool {
        if self.command.contains('/') {
            return std::path::Path::new(&self.command).exists();
        }
        Command::new("which")
            .arg(&self.command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }
}

impl Generator for CommandGenerator {
    fn name(&self) -> &str {
        &self.command
    }

    fn generate(&mut self, prompts: &[String]) -> Result<Vec<Continuation>, GenerationError> {
        let mut request = Vec::new();
        for prompt in prompts {
            serde_json::to_writer(&mut request, &Request { prompt })?;
            request.push(b'\n');
        }

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => GenerationError::ToolNotFound(self.command.clone()),
                _ => GenerationError::IoError(e),
            })?;

        // Feed stdin from a separate thread so a child that streams output
        // while reading cannot fill the stdout pipe and block.
        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                let Some(mut stdin) = stdin else {
                    return Ok(());
                };
                match stdin.write_all(&request) {
                    // The exit status reports why the child stopped reading.
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                }
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            output.and_then(|o| written.map(|()| o))
        })?;

        if !output.status.success() {
            return Err(GenerationError::ExecutionFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let continuations = parse_responses(&stdout)?;

        if continuations.len() != prompts.len() {
            return Err(GenerationError::CountMismatch {
                expected: prompts.len(),
                got: continuations.len(),
            });
        }

        Ok(continuations)
    }
}

/// Parse JSON-lines responses, skipping blank lines
///
/// # Errors
///
/// Returns `GenerationError::InvalidResponse` for the first malformed line.
pub fn parse_responses(stdout: &str) -> Result<Vec<Continuation>, GenerationError> {
    stdout
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<Response>(line)
                .map(Continuation::from)
                .map_err(|source| GenerationError::InvalidResponse { line: n + 1, source })
        })
        .collect()
}
