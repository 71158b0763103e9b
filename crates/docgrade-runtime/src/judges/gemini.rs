//! Google Gemini judge.
//!
//! Uses the `generateContent` REST API. Disabled (declines every
//! task) when no API key is configured.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docgrade_core::JudgeId;

use super::{api_error_message, extract_score, http_client, ApiCredential, Judge, JudgeError};
use crate::prompts::render_judge_prompt;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini judge backend.
pub struct GeminiJudge {
    credential: Option<ApiCredential>,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiJudge")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiJudge {
    /// Create a judge with an optional credential. `None` produces a
    /// judge that declines every task.
    pub fn new(credential: Option<ApiCredential>) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Self {
        Self::new(ApiCredential::from_env(GEMINI_API_KEY_ENV, "Gemini API key"))
    }

    /// Override the API base URL (e.g. for a proxy or a test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl Judge for GeminiJudge {
    fn id(&self) -> JudgeId {
        JudgeId::Gemini
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

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: render_judge_prompt(code, doc),
                }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = http_client()
            .post(url)
            .query(&[("key", credential.expose())])
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

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::Parse(e.to_string()))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| JudgeError::Parse("no candidates in reply".to_string()))?;

        extract_score(text).map(Some)
    }
}
