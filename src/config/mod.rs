use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// S3-compatible bucket for uploaded resume documents
    pub s3_bucket: String,

    /// S3-compatible endpoint URL
    pub s3_endpoint: String,

    /// S3 access key ID
    pub s3_access_key: String,

    /// S3 secret access key
    pub s3_secret_key: String,

    /// Base URL of the Ollama-compatible inference endpoint
    #[serde(default = "default_inference_url")]
    pub inference_url: String,

    /// Chat model used for resume classification and job summarization
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model used for similarity scoring
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// SMTP relay host
    pub smtp_server: String,

    /// SMTP username
    pub smtp_user: String,

    /// SMTP password
    pub smtp_pass: String,

    /// From address for outbound notifications
    pub from_email: String,

    /// Interview slot booking link embedded in invitation emails
    #[serde(default = "default_booking_link")]
    pub booking_link: String,

    /// Error-log rows older than this many days are purged at startup
    #[serde(default = "default_error_log_retention_days")]
    pub error_log_retention_days: i64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_inference_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_chat_model() -> String {
    "mistral:7b".to_string()
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_booking_link() -> String {
    "https://interview-slot-test.youcanbook.me/".to_string()
}

fn default_error_log_retention_days() -> i64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
