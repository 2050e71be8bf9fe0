use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UNKNOWN_LABEL;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AssetStatus {
    Active,
    Inactive,
    UnderMaintenance,
    Retired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub name: String,
    /// Free text as entered by users; see [`asset_type_category`].
    pub asset_type: Option<String>,
    pub status: AssetStatus,
    pub warranty_expiry: Option<DateTime<Utc>>,
}

impl Asset {
    pub fn new(name: impl Into<String>, asset_type: Option<&str>, status: AssetStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id: None,
            name: name.into(),
            asset_type: asset_type.map(str::to_string),
            status,
            warranty_expiry: None,
        }
    }

    pub fn category(&self) -> String {
        asset_type_category(self.asset_type.as_deref())
    }

    pub fn is_active(&self) -> bool {
        self.status == AssetStatus::Active
    }
}

/// Canonical bucket for a free-text asset type. Missing or blank types map to `"Unknown"`.
pub fn asset_type_category(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}
