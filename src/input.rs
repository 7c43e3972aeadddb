//! Stake file loading.
//!
//! Reads a JSON array of stakes for the CLI. Every stake is validated as
//! it is deserialized; the list as a whole is validated afterwards.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::types::{validate_stakes, Stake};

/// Load and validate stakes from a JSON file.
pub fn load_stakes(path: &Path) -> Result<Vec<Stake>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stakes from {}", path.display()))?;

    let stakes: Vec<Stake> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse stakes from {}", path.display()))?;

    validate_stakes(&stakes)
        .with_context(|| format!("Invalid stakes in {}", path.display()))?;

    debug!(path = %path.display(), count = stakes.len(), "Stakes loaded");
    Ok(stakes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
