//! Persisted campaign record row.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{CampaignDescription, TargetingCriteria};

/// Timestamp layout of the `creation_date` column.
pub const CREATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single row in the records file.
///
/// Rows are immutable once written; the store only ever appends. Field
/// order here defines the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_id: String,
    pub creation_date: String,
    pub created_by: String,
    pub platform: String,
    pub campaign_objective: String,
    /// Targeting criteria serialized as an opaque JSON blob.
    pub targeting_criteria: String,
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CampaignRecord {
    /// Flatten a description into a persisted row.
    pub fn from_description(
        campaign_id: String,
        description: &CampaignDescription,
        created_at: DateTime<Local>,
    ) -> Result<Self, AppError> {
        let targeting_criteria = serde_json::to_string(&description.targeting)?;

        Ok(Self {
            campaign_id,
            creation_date: created_at.format(CREATION_DATE_FORMAT).to_string(),
            created_by: description
                .created_by
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            platform: description.platform.clone().unwrap_or_default(),
            campaign_objective: description.campaign_objective.clone().unwrap_or_default(),
            targeting_criteria,
            budget: description.budget,
            start_date: description.start_date,
            end_date: description.end_date,
        })
    }

    /// Rebuild the full description from a stored row, for export.
    pub fn to_description(&self) -> Result<CampaignDescription, AppError> {
        let targeting: TargetingCriteria = serde_json::from_str(&self.targeting_criteria)?;

        Ok(CampaignDescription {
            created_by: non_empty(&self.created_by),
            platform: non_empty(&self.platform),
            campaign_objective: non_empty(&self.campaign_objective),
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            targeting,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
