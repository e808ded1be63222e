//! Layered settings: built-in defaults, then an optional TOML file named by
//! `BAZAAR_CONFIG`, then `BAZAAR__SECTION__KEY` environment variables.

use std::path::Path;

use anyhow::{bail, Context};
use bz_core::models::RankSeed;
use bz_core::rating::{Tier, TierTable};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

const DEFAULTS: &str = include_str!("../config/defaults.toml");

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub rating: RatingSettings,
    pub ranks: Vec<RankSeed>,
    pub leaderboard: LeaderboardSettings,
    pub messaging: MessagingSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub token_secret: SecretString,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct RatingSettings {
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardSettings {
    pub page_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct MessagingSettings {
    pub max_send_attempts: u32,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let file = std::env::var("BAZAAR_CONFIG").ok();
        Self::from_sources(file.as_deref().map(Path::new), true)
    }

    fn from_sources(file: Option<&Path>, with_env: bool) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml));

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix("BAZAAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let settings: Settings = builder
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.auth.token_secret.expose_secret().trim().is_empty() {
            bail!("auth.token_secret must be set (BAZAAR__AUTH__TOKEN_SECRET)");
        }
        if self.auth.token_ttl_minutes <= 0 {
            bail!("auth.token_ttl_minutes must be positive");
        }
        if self.messaging.max_send_attempts == 0 {
            bail!("messaging.max_send_attempts must be at least 1");
        }
        Ok(())
    }

    pub fn tier_table(&self) -> anyhow::Result<TierTable> {
        TierTable::new(self.rating.tiers.iter().copied()).context("invalid rating.tiers")
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.auth.token_ttl_minutes)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
