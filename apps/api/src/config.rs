use anyhow::{Context, Result};

use crate::claims::ids::{validate_prefix, ClaimId};

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: without `DATABASE_URL` claims live in memory.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub claim_id_prefix: String,
    pub default_claim_id: ClaimId,
    pub seed_demo_claim: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let claim_id_prefix = lookup("CLAIM_ID_PREFIX").unwrap_or_else(|| "MN".to_string());
        validate_prefix(&claim_id_prefix).context("CLAIM_ID_PREFIX is invalid")?;

        let default_claim_id = lookup("DEFAULT_CLAIM_ID")
            .unwrap_or_else(|| "MN-2024-555".to_string())
            .parse::<ClaimId>()
            .context("DEFAULT_CLAIM_ID must look like <PREFIX>-<YEAR>-<NUM>")?;

        Ok(Config {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            claim_id_prefix,
            default_claim_id,
            seed_demo_claim: parse_bool(lookup("SEED_DEMO_CLAIM").as_deref(), true)
                .context("SEED_DEMO_CLAIM must be true or false")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_bool(raw: Option<&str>, default: bool) -> Result<bool> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(default),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}
