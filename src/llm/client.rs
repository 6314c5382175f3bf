use crate::error::{AuditError, Result};
use crate::llm::types::{ClassificationResponse, TokenUsage};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The seam between the batcher and whatever answers prompts. The production
/// implementation is [`GeminiClient`]; tests script this trait instead.
#[allow(async_fn_in_trait)]
pub trait ClassifyBackend {
    async fn classify(&self, model: &str, prompt: &str) -> Result<ClassificationResponse>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Fetch the raw body of the configured context page. Callers run the
    /// result through [`crate::utils::clean_web_text`] before prompting.
    pub async fn fetch_page_text(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(AuditError::Classification(format!(
                "Context fetch failed (status {}): {}",
                status, url
            )));
        }
        Ok(res.text().await?)
    }
}

impl ClassifyBackend for GeminiClient {
    async fn classify(&self, model: &str, prompt: &str) -> Result<ClassificationResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(AuditError::Classification(format!(
                "Gemini API error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        let text = body
            .candidates
            .ok_or_else(|| AuditError::Classification("No candidates returned".to_string()))?
            .first()
            .ok_or_else(|| AuditError::Classification("Empty candidates list".to_string()))?
            .content
            .parts
            .first()
            .ok_or_else(|| AuditError::Classification("No parts in content".to_string()))?
            .text
            .clone();

        let usage = body
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(ClassificationResponse { text, usage })
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}
