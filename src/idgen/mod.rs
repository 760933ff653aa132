//! Campaign ID derivation.
//!
//! IDs have the form `<PLATFORM3>-<OBJECTIVE3>-<TIMESTAMP>-<HASH8>`: a
//! three-letter platform code, a three-letter objective code, the
//! wall-clock second of generation, and a short content hash over the full
//! description. The hash is stable across field ordering; the timestamp is
//! what distinguishes repeated generations of the same description, at
//! one-second resolution.

use chrono::{DateTime, Local};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::models::CampaignDescription;

/// Platform code used when no platform is given.
const DEFAULT_PLATFORM_CODE: &str = "ALL";

/// Objective code used when no objective is given.
const DEFAULT_OBJECTIVE_CODE: &str = "GEN";

/// Timestamp layout inside the ID, 14 digits.
const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generate a campaign ID for `description` at the current local time.
///
/// Never fails: absent fields fall back to documented defaults.
pub fn generate(description: &CampaignDescription) -> String {
    generate_at(description, Local::now())
}

/// Generate a campaign ID for `description` at an explicit instant.
pub fn generate_at(description: &CampaignDescription, now: DateTime<Local>) -> String {
    let platform = code_or(description.platform.as_deref(), DEFAULT_PLATFORM_CODE);
    let objective = code_or(
        description.campaign_objective.as_deref(),
        DEFAULT_OBJECTIVE_CODE,
    );
    let timestamp = now.format(ID_TIMESTAMP_FORMAT);
    let hash = content_hash(description);

    format!("{platform}-{objective}-{timestamp}-{hash}")
}

/// First 8 hex characters of a SHA-256 digest over the canonical JSON
/// serialization of the description.
pub fn content_hash(description: &CampaignDescription) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(description).as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

/// Canonical serialization: routed through `serde_json::Value`, whose
/// object keys are ordered, so field insertion order never reaches the
/// hasher.
fn canonical_json(description: &CampaignDescription) -> String {
    serde_json::to_value(description)
        .unwrap_or(Value::Null)
        .to_string()
}

/// First 3 characters upper-cased, or the default for blank input.
fn code_or(field: Option<&str>, default: &str) -> String {
    match field {
        Some(value) if !value.trim().is_empty() => {
            value.chars().take(3).collect::<String>().to_uppercase()
        }
        _ => default.to_string(),
    }
}
