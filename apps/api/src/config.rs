use anyhow::{ensure, Context, Result};

const DEFAULT_MAX_TEXT_CHARS: usize = 50_000;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on free text (job descriptions, keyword input) per request.
    pub max_text_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_text_chars: match std::env::var("MAX_TEXT_CHARS") {
                Ok(raw) => parse_max_text_chars(&raw)?,
                Err(_) => DEFAULT_MAX_TEXT_CHARS,
            },
        })
    }
}

fn parse_max_text_chars(raw: &str) -> Result<usize> {
    let limit = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("MAX_TEXT_CHARS must be a positive integer, got '{raw}'"))?;
    ensure!(limit > 0, "MAX_TEXT_CHARS must be a positive integer, got '{raw}'");
    Ok(limit)
}
