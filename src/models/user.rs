use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

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
pub enum UserStatus {
    Active,
    Inactive,
    Invited,
    Suspended,
}

/// Coarse classification of a free-text role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
pub enum RoleClass {
    Technician,
    Other,
    Unclassified,
}

impl RoleClass {
    pub fn classify(role_name: Option<&str>) -> Self {
        match role_name.map(|name| name.trim().to_lowercase()) {
            Some(name) if name.is_empty() => Self::Unclassified,
            Some(name) if name.contains("technician") || name.contains("maintenance") => {
                Self::Technician
            }
            Some(_) => Self::Other,
            None => Self::Unclassified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub name: String,
    pub status: UserStatus,
    /// Name of the user's role, resolved from the role reference.
    pub role_name: Option<String>,
    pub invitation_token: Option<String>,
    pub invitation_accepted: bool,
}

impl User {
    pub fn new(name: impl Into<String>, status: UserStatus, role_name: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id: None,
            name: name.into(),
            status,
            role_name: role_name.map(str::to_string),
            invitation_token: None,
            invitation_accepted: false,
        }
    }

    pub fn role_class(&self) -> RoleClass {
        RoleClass::classify(self.role_name.as_deref())
    }

    /// Active users whose role marks them as field technicians.
    pub fn is_active_technician(&self) -> bool {
        self.status == UserStatus::Active && self.role_class() == RoleClass::Technician
    }

    pub fn has_pending_invitation(&self) -> bool {
        self.invitation_token.is_some() && !self.invitation_accepted
    }
}
