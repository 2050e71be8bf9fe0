//! Read-only domain snapshots consumed by the analytics engine.
//!
//! These are owned and mutated elsewhere; the engine only ever reads them.

pub mod asset;
pub mod inventory_item;
pub mod user;
pub mod work_order;

pub use asset::{asset_type_category, Asset, AssetStatus};
pub use inventory_item::{InventoryItem, InventoryStatus};
pub use user::{RoleClass, User, UserStatus};
pub use work_order::{WorkOrder, WorkOrderPriority, WorkOrderStatus, WorkOrderType};

use std::str::FromStr;

/// Label used for free-text discriminators that are missing or blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Parses a stored enum value, treating `-`, spaces and `_` as equivalent.
///
/// `"In-Progress"`, `"in progress"` and `"IN_PROGRESS"` all resolve to the same variant.
pub fn parse_canonical<E: FromStr>(raw: &str) -> Option<E> {
    let normalized: String = raw
        .trim()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();
    normalized.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_accepts_separator_variants() {
        for raw in ["in_progress", "In-Progress", "IN_PROGRESS", " in progress "] {
            assert_eq!(
                parse_canonical::<WorkOrderStatus>(raw),
                Some(WorkOrderStatus::InProgress),
                "{raw}"
            );
        }
        assert_eq!(parse_canonical::<WorkOrderStatus>("exploded"), None);
    }
}
