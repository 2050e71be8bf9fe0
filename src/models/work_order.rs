use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

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
pub enum WorkOrderStatus {
    Draft,
    Open,
    InProgress,
    OnHold,
    Completed,
    Closed,
    Cancelled,
}

impl WorkOrderStatus {
    /// Completed, closed and cancelled work orders no longer count toward the backlog.
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Completed | Self::Closed | Self::Cancelled)
    }
}

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
pub enum WorkOrderPriority {
    Low,
    Medium,
    High,
    Critical,
}

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
pub enum WorkOrderType {
    Corrective,
    Preventive,
    Predictive,
    Inspection,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub title: String,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub work_order_type: WorkOrderType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub assigned_to_id: Option<Uuid>,
    pub asset_id: Option<Uuid>,
    pub actual_cost: Option<f64>,
}

impl WorkOrder {
    /// A medium-priority work order with no schedule, assignment or cost.
    pub fn new(
        title: impl Into<String>,
        status: WorkOrderStatus,
        work_order_type: WorkOrderType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id: None,
            title: title.into(),
            status,
            priority: WorkOrderPriority::Medium,
            work_order_type,
            created_at,
            updated_at: created_at,
            scheduled_date: None,
            due_date: None,
            actual_start: None,
            actual_end: None,
            assigned_to_id: None,
            asset_id: None,
            actual_cost: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    pub fn is_completed(&self) -> bool {
        self.status == WorkOrderStatus::Completed
    }

    pub fn is_corrective(&self) -> bool {
        self.work_order_type == WorkOrderType::Corrective
    }

    /// When the work was finished: `actual_end`, falling back to the last update.
    /// `None` unless the work order is completed.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.is_completed()
            .then(|| self.actual_end.unwrap_or(self.updated_at))
    }

    /// Hands-on repair time in hours, when both actual timestamps are recorded.
    pub fn repair_hours(&self) -> Option<f64> {
        match (self.actual_start, self.actual_end) {
            (Some(start), Some(end)) => {
                Some((end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR)
            }
            _ => None,
        }
    }

    /// Equipment downtime attributed to this work order; zero when not recorded.
    pub fn downtime_hours(&self) -> f64 {
        self.repair_hours().map(|h| h.max(0.0)).unwrap_or(0.0)
    }

    /// Hours from creation to completion, for completed work orders.
    pub fn resolution_hours(&self) -> Option<f64> {
        self.completed_at()
            .map(|done| (done - self.created_at).num_milliseconds() as f64 / MILLIS_PER_HOUR)
    }

    /// Actual cost; missing or non-finite amounts count as zero.
    pub fn cost(&self) -> f64 {
        self.actual_cost.filter(|c| c.is_finite()).unwrap_or(0.0)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_resolved() && self.due_date.is_some_and(|due| due < now)
    }

    /// Finished no later than the due date; work with no due date always meets it.
    pub fn met_due_date(&self) -> bool {
        match (self.completed_at(), self.due_date) {
            (Some(done), Some(due)) => done <= due,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
