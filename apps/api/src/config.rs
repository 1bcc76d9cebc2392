use std::str::FromStr;

use anyhow::{Context, Result};

use crate::analysis::models::QuestionMix;

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Application configuration loaded from environment variables.
/// Startup fails if `GROQ_API_KEY` is missing or a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
    pub port: u16,
    pub rust_log: String,
    pub cors_allowed_origin: String,
    pub inference_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Default number of interview questions per category.
    pub question_mix: QuestionMix,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let question_mix = QuestionMix {
            technical: parse_env("INTERVIEW_TECHNICAL_QUESTIONS", 5)?,
            behavioral: parse_env("INTERVIEW_BEHAVIORAL_QUESTIONS", 5)?,
            situational: parse_env("INTERVIEW_SITUATIONAL_QUESTIONS", 3)?,
        };
        question_mix
            .validate()
            .map_err(|msg| anyhow::anyhow!("Invalid interview question mix: {msg}"))?;

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_api_url: env_or("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            groq_model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
            cors_allowed_origin: env_or("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            inference_timeout_secs: parse_env("INFERENCE_TIMEOUT_SECS", 60)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            question_mix,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}
