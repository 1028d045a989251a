//! LLM client, grounded on the donor's `GeminiClient`: `reqwest`-based,
//! strict-JSON response mime type, multi-model fallback. Extended with the
//! tolerant decode in [`crate::schema::decode_tolerant`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EnrichError, EnrichResult};

const FALLBACK_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.5-pro"];
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> EnrichResult<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    embedding_model: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            embedding_model: std::env::var("GEMINI_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            http: Client::new(),
        }
    }

    pub fn from_env() -> EnrichResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        Ok(Self::new(api_key))
    }

    /// Generate strict-JSON text, trying each fallback model in order.
    pub async fn generate_json(&self, prompt: &str) -> EnrichResult<String> {
        let mut last_error = None;
        for model in FALLBACK_MODELS {
            match self.call_generate(model, prompt).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    warn!(model = %model, error = %err, "enrichment llm call failed, trying next model");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or(EnrichError::EmptyResponse))
    }

    async fn call_generate(&self, model: &str, prompt: &str) -> EnrichResult<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={}",
            self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Decode(format!("llm returned {status}: {body}")));
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(EnrichError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    content: EmbedContent<'a>,
}

#[derive(Debug, Serialize)]
struct EmbedContent<'a> {
    parts: Vec<EmbedPart<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> EnrichResult<Vec<f32>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:embedContent?key={}",
            self.embedding_model, self.api_key
        );
        let request = EmbedRequest { content: EmbedContent { parts: vec![EmbedPart { text }] } };
        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Decode(format!("embedding call returned {status}: {body}")));
        }
        let parsed: EmbedResponse = response.json().await?;
        Ok(parsed.embedding.values)
    }
}
