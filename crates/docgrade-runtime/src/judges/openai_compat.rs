//! OpenAI-compatible chat-completions judge.
//!
//! Serves any backend speaking the `/chat/completions` wire format.
//! Two of the stock judge identities ride on it: `ollama` (local
//! inference server) and `qwen` (hosted endpoint). Local endpoints
//! need no credential; hosted ones get a bearer token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docgrade_core::JudgeId;

use super::{api_error_message, extract_score, http_client, ApiCredential, Judge, JudgeError};
use crate::prompts::render_judge_prompt;

/// Default base URL for a local ollama server.
pub const OLLAMA_DEFAULT_URL: &str = "http://ollama:11434/v1";

/// Default model served by the local ollama judge.
pub const OLLAMA_DEFAULT_MODEL: &str = "qwen2.5:7b";

/// Judge backed by an OpenAI-compatible chat API.
pub struct OpenAiCompatJudge {
    id: JudgeId,
    base_url: String,
    model: String,
    credential: Option<ApiCredential>,
    /// Hosted endpoints decline instead of erroring when the
    /// credential is missing; local ones never need it.
    requires_credential: bool,
}

impl std::fmt::Debug for OpenAiCompatJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatJudge")
            .field("id", &self.id)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("credential", &self.credential)
            .finish()
    }
}

impl OpenAiCompatJudge {
    /// A local ollama judge. No credential required.
    pub fn ollama(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: JudgeId::Ollama,
            base_url: base_url.into(),
            model: model.into(),
            credential: None,
            requires_credential: false,
        }
    }

    /// A hosted qwen judge. Declines when no credential is present.
    pub fn qwen(
        base_url: impl Into<String>,
        model: impl Into<String>,
        credential: Option<ApiCredential>,
    ) -> Self {
        Self {
            id: JudgeId::Qwen,
            base_url: base_url.into(),
            model: model.into(),
            credential,
            requires_credential: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl Judge for OpenAiCompatJudge {
    fn id(&self) -> JudgeId {
        self.id
    }

    fn configured(&self) -> bool {
        !self.requires_credential || self.credential.is_some()
    }

    async fn evaluate(
        &self,
        code: &str,
        doc: &str,
        temperature: f64,
    ) -> Result<Option<f64>, JudgeError> {
        if !self.configured() {
            return Ok(None);
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: render_judge_prompt(code, doc),
            }],
            temperature,
        };

        let mut builder = http_client()
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);

        if let Some(credential) = &self.credential {
            builder = builder.bearer_auth(credential.expose());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| JudgeError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::Parse(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| JudgeError::Parse("empty choices in reply".to_string()))?;

        extract_score(content).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judges::CredentialSource;

    #[test]
    fn test_ollama_is_always_configured() {
        let judge = OpenAiCompatJudge::ollama(OLLAMA_DEFAULT_URL, OLLAMA_DEFAULT_MODEL);
        assert_eq!(judge.id(), JudgeId::Ollama);
        assert!(judge.configured());
    }

    #[test]
    fn test_qwen_without_credential_is_unconfigured() {
        let judge = OpenAiCompatJudge::qwen("https://qwen.example/v1", "qwen-max", None);
        assert_eq!(judge.id(), JudgeId::Qwen);
        assert!(!judge.configured());
    }

    #[tokio::test]
    async fn test_unconfigured_qwen_declines() {
        let judge = OpenAiCompatJudge::qwen("https://qwen.example/v1", "qwen-max", None);
        let opinion = judge.evaluate("fn main() {}", "Entry point.", 0.1).await;
        assert!(matches!(opinion, Ok(None)));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let cred = ApiCredential::new("sk-secret", CredentialSource::Programmatic, "qwen key");
        let judge = OpenAiCompatJudge::qwen("https://qwen.example/v1", "qwen-max", Some(cred));
        let debug = format!("{judge:?}");
        assert!(!debug.contains("sk-secret"));
    }
}
