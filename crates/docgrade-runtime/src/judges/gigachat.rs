//! GigaChat judge.
//!
//! Speaks the GigaChat chat-completions API with a bearer
//! credential. Disabled (declines every task) when no credential is
//! configured.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docgrade_core::JudgeId;

use super::{api_error_message, extract_score, http_client, ApiCredential, Judge, JudgeError};
use crate::prompts::render_judge_prompt;

/// Environment variable holding the GigaChat credential.
pub const GIGACHAT_CREDENTIALS_ENV: &str = "GIGACHAT_CREDENTIALS";

const DEFAULT_BASE_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
const DEFAULT_MODEL: &str = "GigaChat";

/// GigaChat judge backend.
pub struct GigachatJudge {
    credential: Option<ApiCredential>,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GigachatJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GigachatJudge")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GigachatJudge {
    /// Create a judge with an optional credential. `None` produces a
    /// judge that declines every task.
    pub fn new(credential: Option<ApiCredential>) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from the `GIGACHAT_CREDENTIALS` environment variable.
    pub fn from_env() -> Self {
        Self::new(ApiCredential::from_env(
            GIGACHAT_CREDENTIALS_ENV,
            "GigaChat credential",
        ))
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct GigaRequest {
    model: String,
    messages: Vec<GigaMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct GigaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GigaResponse {
    choices: Vec<GigaChoice>,
}

#[derive(Debug, Deserialize)]
struct GigaChoice {
    message: GigaChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct GigaChoiceMessage {
    content: String,
}

#[async_trait]
impl Judge for GigachatJudge {
    fn id(&self) -> JudgeId {
        JudgeId::Gigachat
    }

    fn configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn evaluate(
        &self,
        code: &str,
        doc: &str,
        temperature: f64,
    ) -> Result<Option<f64>, JudgeError> {
        let Some(credential) = &self.credential else {
            return Ok(None);
        };

        let request = GigaRequest {
            model: self.model.clone(),
            messages: vec![GigaMessage {
                role: "user".to_string(),
                content: render_judge_prompt(code, doc),
            }],
            temperature,
        };

        let response = http_client()
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential.expose())
            .json(&request)
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

        let body: GigaResponse = response
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
    fn test_without_credential_is_unconfigured() {
        let judge = GigachatJudge::new(None);
        assert_eq!(judge.id(), JudgeId::Gigachat);
        assert!(!judge.configured());
    }

    #[tokio::test]
    async fn test_unconfigured_judge_declines() {
        let judge = GigachatJudge::new(None);
        let opinion = judge.evaluate("fn main() {}", "Entry point.", 0.1).await;
        assert!(matches!(opinion, Ok(None)));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let cred = ApiCredential::new("gc-secret", CredentialSource::Programmatic, "GigaChat");
        let judge = GigachatJudge::new(Some(cred));
        assert!(!format!("{judge:?}").contains("gc-secret"));
    }
}
