//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing file or a partial file still
//! yields a usable configuration.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::group::{AMBIGUOUS_CHARS, DEFAULT_INVITE_ALPHABET, DEFAULT_INVITE_CODE_LEN};
use crate::payments::PaymentRail;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub invite: InviteConfig,
    pub payments: PaymentsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub currency: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "VYRE".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InviteConfig {
    /// Characters invite codes are drawn from.
    pub alphabet: String,
    pub length: usize,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_INVITE_ALPHABET.to_string(),
            length: DEFAULT_INVITE_CODE_LEN,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaymentsConfig {
    /// How long to wait for the native app before opening the web fallback.
    pub fallback_delay_ms: u64,
    pub default_rail: PaymentRail,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: 1500,
            default_rail: PaymentRail::Venmo,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject settings that would produce unusable invite codes.
    pub fn validate(&self) -> Result<()> {
        if self.invite.length == 0 {
            bail!("invite.length must be at least 1");
        }
        if self.invite.alphabet.is_empty() {
            bail!("invite.alphabet must not be empty");
        }
        if let Some(c) = self
            .invite
            .alphabet
            .chars()
            .find(|c| AMBIGUOUS_CHARS.contains(c))
        {
            bail!("invite.alphabet contains ambiguous character {c:?}");
        }
        Ok(())
    }
}
