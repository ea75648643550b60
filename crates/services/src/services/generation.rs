//! Website generation: one bounded AI attempt, with the static fallback site
//! substituted for every failure.

use std::{sync::Arc, time::Duration};

use db::models::file_node::FileNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ts_rs::TS;

use super::{
    fallback_site::{self, SiteCategory},
    llm_client::{CompletionRequest, LlmError, TextGenerator, extract_fenced_block},
};

pub const DEFAULT_PROMPT: &str = "modern website";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.3;
const HTML_MARKER: &str = "<!doctype html>";

const NO_CREDENTIAL_MESSAGE: &str = "Demo mode - API key not configured";
const AI_UNAVAILABLE_MESSAGE: &str = "Demo mode - AI service busy";

const SYSTEM_PROMPT: &str = r#"Create a modern website. Return only JSON:
{"files":[{"name":"index.html","type":"file","path":"/index.html","content":"..."}]}"#;

/// Body of the generate endpoint. `error` is always false: failures are
/// reported through `fallback` and `message` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct GenerationResult {
    pub files: Vec<FileNode>,
    pub error: bool,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}

impl GenerationResult {
    fn generated(files: Vec<FileNode>) -> Self {
        Self {
            files,
            error: false,
            fallback: false,
            message: None,
        }
    }

    fn fallback(prompt: &str, message: &str) -> Self {
        Self {
            files: fallback_site::generate(prompt),
            error: false,
            fallback: true,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("no response within {0:?}")]
    TimedOut(Duration),
    #[error("shutting down")]
    ShuttingDown,
    #[error("response contained neither a files list nor an HTML document")]
    Unparseable,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    prompt: Option<String>,
}

/// Prompt carried by a raw request body. Missing, malformed or blank input
/// all resolve to [`DEFAULT_PROMPT`].
pub fn resolve_prompt(body: &[u8]) -> String {
    serde_json::from_slice::<GenerateRequest>(body)
        .ok()
        .and_then(|req| req.prompt)
        .filter(|prompt| !prompt.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
}

#[derive(Clone)]
pub struct CodeGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl CodeGenerator {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            generator,
            timeout,
            shutdown,
        }
    }

    /// A generator that always serves the fallback site.
    pub fn demo() -> Self {
        Self::new(None, DEFAULT_TIMEOUT, CancellationToken::new())
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Always resolves, within roughly `timeout`, to a non-empty file list.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        info!(prompt_len = prompt.len(), "Generation requested");

        let Some(generator) = &self.generator else {
            info!("No API key configured, serving fallback site");
            return self.fallback(prompt, NO_CREDENTIAL_MESSAGE);
        };

        match self.try_generate(generator.as_ref(), prompt).await {
            Ok(files) => {
                info!(file_count = files.len(), "AI generation succeeded");
                GenerationResult::generated(files)
            }
            Err(e) => {
                warn!(error = %e, "AI generation failed");
                self.fallback(prompt, AI_UNAVAILABLE_MESSAGE)
            }
        }
    }

    fn fallback(&self, prompt: &str, message: &str) -> GenerationResult {
        info!(
            category = %SiteCategory::detect(prompt),
            "Using fallback site"
        );
        GenerationResult::fallback(prompt, message)
    }

    async fn try_generate(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<Vec<FileNode>, GenerationError> {
        let request = CompletionRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            prompt: format!(
                "Create a {} using HTML5, CSS3, TailwindCSS, and JavaScript.",
                prompt
            ),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(timeout = ?self.timeout, "Attempting AI generation");

        // Whichever branch loses is dropped, which aborts the in-flight request.
        let text = tokio::select! {
            result = generator.complete(&request) => result?,
            _ = tokio::time::sleep(self.timeout) => {
                return Err(GenerationError::TimedOut(self.timeout));
            }
            _ = self.shutdown.cancelled() => return Err(GenerationError::ShuttingDown),
        };

        parse_generated_files(&text).ok_or(GenerationError::Unparseable)
    }
}

/// Interpret model output as a file list.
///
/// JSON (optionally fenced) with a non-empty `files` array is normalized entry
/// by entry. Text that is not JSON but contains a full HTML document becomes a
/// lone `/index.html`.
pub fn parse_generated_files(text: &str) -> Option<Vec<FileNode>> {
    match serde_json::from_str::<Value>(extract_fenced_block(text)) {
        Ok(value) => {
            let entries = value.get("files")?.as_array()?;
            let files: Vec<FileNode> = entries
                .iter()
                .filter(|entry| entry.is_object())
                .map(|entry| normalize_node(entry, ""))
                .collect();
            (!files.is_empty()).then_some(files)
        }
        Err(_) if text.to_ascii_lowercase().contains(HTML_MARKER) => Some(vec![FileNode::file(
            "index.html",
            "/index.html",
            text,
        )]),
        Err(_) => None,
    }
}

fn normalize_node(entry: &Value, parent_path: &str) -> FileNode {
    let name = non_empty_str(entry, "name").unwrap_or("index.html");
    let path = non_empty_str(entry, "path")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}/{}", parent_path, name));

    if entry.get("type").and_then(Value::as_str) == Some("folder") {
        let children = entry
            .get("children")
            .and_then(Value::as_array)
            .map(|children| {
                children
                    .iter()
                    .filter(|child| child.is_object())
                    .map(|child| normalize_node(child, &path))
                    .collect()
            })
            .unwrap_or_default();
        FileNode::folder(name, path, children)
    } else {
        let content = entry.get("content").and_then(Value::as_str).unwrap_or_default();
        FileNode::file(name, path, content)
    }
}

fn non_empty_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
