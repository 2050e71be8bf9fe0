//! Reliability and maintenance KPI formulas.
//!
//! Every calculator is a pure function of its inputs. Missing data is expressed
//! as data: `None` where the figure is undefined, or a fixed sentinel
//! (100% compliance, 0% utilization) where the empty case has a natural reading.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{percent, round2, round_hours};
use crate::config::AnalyticsConfig;
use crate::models::{Asset, InventoryItem, User, WorkOrder, WorkOrderType};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Mean time between failures, in whole hours.
///
/// Needs at least two corrective work orders; intervals are taken between
/// consecutive creation times.
pub fn mtbf_hours(work_orders: &[WorkOrder]) -> Option<i64> {
    let mut failures: Vec<DateTime<Utc>> = work_orders
        .iter()
        .filter(|wo| wo.is_corrective())
        .map(|wo| wo.created_at)
        .collect();
    if failures.len() < 2 {
        return None;
    }
    failures.sort();

    let total_ms: i64 = failures
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_milliseconds())
        .sum();
    let mean_ms = total_ms as f64 / (failures.len() - 1) as f64;
    Some(round_hours(mean_ms / MILLIS_PER_HOUR))
}

/// Mean time to repair over completed work orders with recorded actuals, in whole hours.
pub fn mttr_hours(work_orders: &[WorkOrder]) -> Option<i64> {
    let durations: Vec<f64> = work_orders
        .iter()
        .filter(|wo| wo.is_completed())
        .filter_map(WorkOrder::repair_hours)
        .collect();
    if durations.is_empty() {
        return None;
    }
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;
    Some(round_hours(mean))
}

/// Overall equipment effectiveness as a whole percentage.
///
/// Availability is the share of active assets; performance is the share of
/// completed work orders (1.0 when there are none). `None` without assets.
pub fn oee_percent(assets: &[Asset], work_orders: &[WorkOrder], quality: f64) -> Option<i64> {
    if assets.is_empty() {
        return None;
    }
    let availability = assets.iter().filter(|a| a.is_active()).count() as f64 / assets.len() as f64;
    let performance = if work_orders.is_empty() {
        1.0
    } else {
        work_orders.iter().filter(|wo| wo.is_completed()).count() as f64
            / work_orders.len() as f64
    };
    Some((availability * performance * quality * 100.0).round() as i64)
}

/// Share of assets currently active, as a whole percentage.
pub fn asset_availability(assets: &[Asset]) -> Option<i64> {
    if assets.is_empty() {
        return None;
    }
    Some(percent(
        assets.iter().filter(|a| a.is_active()).count(),
        assets.len(),
    ))
}

/// Preventive work orders created in the trailing window that were completed
/// on or before their due date. An empty window is fully compliant.
pub fn pm_compliance(work_orders: &[WorkOrder], now: DateTime<Utc>, window_days: u32) -> i64 {
    let since = now - Duration::days(window_days as i64);
    let scheduled: Vec<&WorkOrder> = work_orders
        .iter()
        .filter(|wo| wo.work_order_type == WorkOrderType::Preventive && wo.created_at >= since)
        .collect();
    if scheduled.is_empty() {
        return 100;
    }
    let compliant = scheduled.iter().filter(|wo| wo.met_due_date()).count();
    percent(compliant, scheduled.len())
}

/// Completed work orders that met their due date. Nothing completed reads as 100.
pub fn sla_compliance(work_orders: &[WorkOrder]) -> i64 {
    let completed: Vec<&WorkOrder> = work_orders.iter().filter(|wo| wo.is_completed()).collect();
    if completed.is_empty() {
        return 100;
    }
    let met = completed.iter().filter(|wo| wo.met_due_date()).count();
    percent(met, completed.len())
}

/// Rework is not tracked, so every completed job counts as fixed first time;
/// the configured rate is reported when there is anything completed at all.
pub fn first_time_fix_rate(work_orders: &[WorkOrder], configured_rate: f64) -> i64 {
    if work_orders.iter().any(WorkOrder::is_completed) {
        configured_rate.round() as i64
    } else {
        100
    }
}

/// Assigned work orders per active technician against monthly capacity, capped at 100.
pub fn technician_utilization(users: &[User], work_orders: &[WorkOrder], monthly_capacity: f64) -> i64 {
    let technicians: HashSet<Uuid> = users
        .iter()
        .filter(|u| u.is_active_technician())
        .map(|u| u.id)
        .collect();
    if technicians.is_empty() || monthly_capacity <= 0.0 {
        return 0;
    }
    let assigned = work_orders
        .iter()
        .filter(|wo| wo.assigned_to_id.is_some_and(|id| technicians.contains(&id)))
        .count();
    let per_technician = assigned as f64 / technicians.len() as f64;
    ((per_technician / monthly_capacity * 100.0).round() as i64).min(100)
}

/// Turnover ratio to one decimal. Cost of goods used is not tracked, so this
/// is the configured factor whenever there is stock value at all.
pub fn inventory_turnover(items: &[InventoryItem], factor: f64) -> f64 {
    let total_value: f64 = items.iter().map(InventoryItem::value).sum();
    if total_value > 0.0 {
        ((total_value * factor) / total_value * 10.0).round() / 10.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reliability {
    pub score: f64,
    pub mtbf_proxy_hours: f64,
}

/// Reliability score and MTBF proxy for an asset with `failures` corrective work orders.
pub fn asset_reliability(failures: u64, cfg: &AnalyticsConfig) -> Reliability {
    let score = (100.0 - failures as f64 * cfg.failure_penalty).min(100.0);
    let mtbf_proxy_hours = if failures > 0 {
        cfg.hours_per_month / failures as f64
    } else {
        cfg.hours_per_month
    };
    Reliability {
        score,
        mtbf_proxy_hours: round2(mtbf_proxy_hours),
    }
}

/// Fixed-ratio split of actual work-order cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostSplit {
    pub labor: f64,
    pub parts: f64,
    pub other: f64,
    /// Half of `other`, reported as contractor spend in budget-vs-actual.
    pub contractors: f64,
    /// The remaining half of `other`.
    pub misc: f64,
}

pub fn cost_split(total_cost: f64, cfg: &AnalyticsConfig) -> CostSplit {
    let other = total_cost * cfg.other_ratio;
    CostSplit {
        labor: round2(total_cost * cfg.labor_ratio),
        parts: round2(total_cost * cfg.parts_ratio),
        other: round2(other),
        contractors: round2(other / 2.0),
        misc: round2(other / 2.0),
    }
}
