use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Outcome of the resume classification capability.
///
/// `Unavailable` covers transport and API failures; callers collapse it to a
/// rejection (fail-closed) but can still tell the two causes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Resume,
    NotResume,
    Unavailable,
}

/// Client for an Ollama-compatible inference endpoint, covering the chat
/// capability (classification, summarization) and the embedding capability
/// (similarity scoring).
pub struct InferenceClient {
    http: Client,
    base_url: String,
    chat_model: String,
    embed_model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

const CLASSIFY_PROMPT: &str = "\
Analyze the following text and determine if it is from a resume/CV document.
A resume typically contains:
- Personal information (name, contact details)
- Professional summary or objective
- Work experience with dates and descriptions
- Education details
- Skills and qualifications
- Projects or achievements

Return ONLY 'true' if it's a resume, 'false' if it's not.
Do not include any explanations or additional text.
Go through the text thoroughly and then decide if it's a resume or not.";

const SUMMARIZE_PROMPT: &str = "\
Create a single, concise paragraph that summarizes ALL key requirements and skills from this job description.
Focus on technical skills, qualifications, experience levels, and essential requirements.
Include specific technologies, tools, education, and experience requirements.

Format: Return ONLY the summary paragraph, nothing else.";

/// Near-deterministic sampling for both fixed-prompt capabilities.
const TEMPERATURE: f64 = 0.1;

impl InferenceClient {
    pub fn new(base_url: &str, chat_model: &str, embed_model: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_model: chat_model.to_string(),
            embed_model: embed_model.to_string(),
        }
    }

    async fn chat(&self, prompt: String) -> Result<String, AiError> {
        let url = format!("{}/api/chat", self.base_url);

        let request_body = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            stream: false,
            options: ChatOptions {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(AiError::Http)?
            .error_for_status()
            .map_err(AiError::Http)?;

        let chat_resp: ChatResponse = response.json().await.map_err(AiError::Http)?;
        Ok(chat_resp.message.content)
    }

    /// Classify whether the extracted text is a resume.
    ///
    /// Never fails: an unreachable model maps to `Unavailable` so the caller
    /// can reject the document without crashing the pipeline.
    pub async fn classify_resume(&self, text: &str) -> Classification {
        let prompt = format!("{CLASSIFY_PROMPT}\n\nText to analyze:\n{text}");

        match self.chat(prompt).await {
            Ok(answer) => parse_classification(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Resume classification capability unavailable");
                Classification::Unavailable
            }
        }
    }

    /// Compress a job description into one normalized requirements paragraph.
    pub async fn summarize_job(&self, job_description: &str) -> Result<String, AiError> {
        let prompt = format!("{SUMMARIZE_PROMPT}\n\nJob Description to analyze:\n{job_description}");
        let summary = self.chat(prompt).await?;
        Ok(summary.trim().to_string())
    }

    /// Embed a batch of text chunks into fixed-dimension vectors.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiError> {
        let url = format!("{}/api/embed", self.base_url);

        let request_body = EmbedRequest {
            model: self.embed_model.clone(),
            input: inputs.to_vec(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(AiError::Http)?
            .error_for_status()
            .map_err(AiError::Http)?;

        let embed_resp: EmbedResponse = response.json().await.map_err(AiError::Http)?;

        if embed_resp.embeddings.len() != inputs.len() {
            return Err(AiError::Api(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                embed_resp.embeddings.len()
            )));
        }

        Ok(embed_resp.embeddings)
    }
}

/// Only the literal lowercase token `true` counts as a positive
/// classification; anything else is a rejection.
pub fn parse_classification(raw: &str) -> Classification {
    if raw.trim().to_lowercase() == "true" {
        Classification::Resume
    } else {
        Classification::NotResume
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference API returned an unusable response: {0}")]
    Api(String),
}
