use anyhow::Result;
use std::env;
use crate::constants::*;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub allowed_origins: Option<String>,
    pub relay_rate_limit_per_minute: u32,
    /// Key the relay limiter on proxy headers instead of the socket peer
    pub trust_forwarded_headers: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_SERVER_PORT),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| DEFAULT_JWT_AUDIENCE.to_string()),
            // The generator degrades to an ExternalServiceError when the key is absent
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|key| !key.trim().is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS").ok(),
            relay_rate_limit_per_minute: env::var("RELAY_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_RELAY_RATE_LIMIT_PER_MINUTE),
            trust_forwarded_headers: env::var("TRUST_FORWARDED_HEADERS")
                .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Parses `ALLOWED_ORIGINS` into individual origins, dropping blanks
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
