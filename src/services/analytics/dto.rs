//! Dashboard payloads. `Default` on each section is the empty result a
//! dashboard falls back to when that section's data cannot be loaded.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::kpi::CostSplit;
use crate::models::{AssetStatus, WorkOrderPriority, WorkOrderStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderStats {
    pub total: u64,
    pub open: u64,
    pub completed: u64,
    pub overdue: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_priority: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub avg_completion_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetStats {
    pub total: u64,
    pub active: u64,
    pub under_maintenance: u64,
    pub warranty_expiring_soon: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryStats {
    pub total_items: u64,
    pub total_value: f64,
    pub low_stock: u64,
    pub out_of_stock: u64,
    pub by_category: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub pending_invitations: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_role: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    pub work_order_id: Uuid,
    pub title: String,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub created: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardAnalytics {
    pub work_orders: WorkOrderStats,
    pub assets: AssetStats,
    pub inventory: InventoryStats,
    pub users: UserStats,
    pub recent_activity: Vec<ActivityItem>,
    pub trends: Vec<TrendPoint>,
    /// Sections that could not be computed and carry their empty default.
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KpiDashboard {
    pub mtbf_hours: Option<i64>,
    pub mttr_hours: Option<i64>,
    pub oee_percent: Option<i64>,
    pub pm_compliance: i64,
    pub first_time_fix_rate: i64,
    pub technician_utilization: i64,
    pub inventory_turnover: f64,
    pub backlog: u64,
    pub asset_availability: Option<i64>,
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostlyWorkOrder {
    pub work_order_id: Uuid,
    pub title: String,
    pub asset_id: Option<Uuid>,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderMetrics {
    pub total: u64,
    pub open: u64,
    pub completed: u64,
    pub overdue: u64,
    pub completion_rate: i64,
    pub sla_compliance: i64,
    pub avg_resolution_hours: Option<f64>,
    pub by_status: BTreeMap<String, u64>,
    pub by_priority: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub trend: Vec<TrendPoint>,
    pub highest_cost: Vec<CostlyWorkOrder>,
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetReliability {
    pub asset_id: Uuid,
    pub name: String,
    pub category: String,
    pub status: AssetStatus,
    pub failures: u64,
    pub reliability_score: f64,
    pub mtbf_proxy_hours: f64,
    pub downtime_hours: f64,
    pub total_cost: f64,
    /// Not computed yet; always `null`.
    pub utilization_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetPerformance {
    pub assets: Vec<AssetReliability>,
    pub top_failures: Vec<AssetReliability>,
    pub top_downtime: Vec<AssetReliability>,
    pub failure_categories: Vec<CategoryCount>,
    pub availability: Option<i64>,
    pub average_reliability: Option<f64>,
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockAlert {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub min_quantity: i32,
    pub shortfall: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryMetrics {
    pub total_items: u64,
    pub total_value: f64,
    pub low_stock_count: u64,
    pub out_of_stock_count: u64,
    pub overstock_count: u64,
    pub by_category: BTreeMap<String, u64>,
    pub value_by_category: BTreeMap<String, f64>,
    pub by_status: BTreeMap<String, u64>,
    pub low_stock_items: Vec<StockAlert>,
    pub out_of_stock_items: Vec<StockAlert>,
    pub turnover: f64,
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyCost {
    /// `YYYY-MM`
    pub month: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetCost {
    pub asset_id: Uuid,
    pub name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BudgetLine {
    pub category: String,
    pub budgeted: Option<f64>,
    pub actual: f64,
    /// `budgeted - actual`; negative when over budget.
    pub variance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostMetrics {
    pub total_cost: f64,
    pub average_cost: Option<f64>,
    pub split: CostSplit,
    pub monthly: Vec<MonthlyCost>,
    pub by_type: BTreeMap<String, f64>,
    pub top_assets: Vec<AssetCost>,
    pub budget: Vec<BudgetLine>,
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TechnicianStats {
    pub user_id: Uuid,
    pub name: String,
    pub assigned: u64,
    pub completed: u64,
    pub completion_rate: i64,
    pub avg_resolution_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TechnicianProductivity {
    pub technician_count: u64,
    pub total_assigned: u64,
    pub utilization: i64,
    pub technicians: Vec<TechnicianStats>,
    pub degraded_sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
