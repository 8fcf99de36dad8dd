use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
/// Value shipped in the sample `.env`; treated the same as a missing key.
const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY";

/// Application configuration loaded from environment variables.
/// Only malformed values are errors; a missing credential selects the local assessor.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_endpoint: String,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub enable_mock_responses: bool,
    pub mock_latency: Duration,
    pub port: u16,
    pub rust_log: String,
}

/// Which assessor the service should run with, derived from `Config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessorBackend {
    Remote { api_key: String },
    Local { reason: LocalReason },
}

/// Why the local heuristic assessor was selected over the remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalReason {
    MockEnabled,
    MissingApiKey,
    PlaceholderApiKey,
}

impl LocalReason {
    pub fn describe(&self) -> &'static str {
        match self {
            LocalReason::MockEnabled => "mock responses enabled via ENABLE_MOCK_RESPONSES",
            LocalReason::MissingApiKey => {
                "GEMINI_API_KEY is not set; get a key from https://ai.google.dev/"
            }
            LocalReason::PlaceholderApiKey => {
                "GEMINI_API_KEY still holds the sample placeholder value"
            }
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_timeout_secs = lookup("GEMINI_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse::<u64>()
            .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")?;

        let mock_latency_ms = lookup("MOCK_LATENCY_MS")
            .unwrap_or_else(|| "1500".to_string())
            .parse::<u64>()
            .context("MOCK_LATENCY_MS must be a whole number of milliseconds")?;

        let enable_mock_responses = match lookup("ENABLE_MOCK_RESPONSES") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("ENABLE_MOCK_RESPONSES must be a boolean, got '{raw}'"))?,
            None => false,
        };

        Ok(Config {
            gemini_api_key: lookup("GEMINI_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            gemini_endpoint: lookup("GEMINI_API_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_timeout: Duration::from_secs(gemini_timeout_secs),
            enable_mock_responses,
            mock_latency: Duration::from_millis(mock_latency_ms),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Resolves the assessor backend. Mock mode wins over a configured key.
    pub fn assessor_backend(&self) -> AssessorBackend {
        if self.enable_mock_responses {
            return AssessorBackend::Local {
                reason: LocalReason::MockEnabled,
            };
        }

        match self.gemini_api_key.as_deref() {
            None => AssessorBackend::Local {
                reason: LocalReason::MissingApiKey,
            },
            Some(PLACEHOLDER_API_KEY) => AssessorBackend::Local {
                reason: LocalReason::PlaceholderApiKey,
            },
            Some(key) => AssessorBackend::Remote {
                api_key: key.to_string(),
            },
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
