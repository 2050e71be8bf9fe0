//! Property-based tests for the analytics engine.
//!
//! These use proptest to check the aggregation invariants across a wide range
//! of record sets rather than a handful of fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use cmms_analytics::config::AnalyticsConfig;
use cmms_analytics::models::{WorkOrder, WorkOrderStatus, WorkOrderType};
use cmms_analytics::services::analytics::aggregation::{count_by_enum, count_by_label};
use cmms_analytics::services::analytics::buckets::trailing_days;
use cmms_analytics::services::analytics::kpi::{cost_split, mtbf_hours, mttr_hours, sla_compliance};
use cmms_analytics::services::analytics::ranking::top_n;
use proptest::prelude::*;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn status_strategy() -> impl Strategy<Value = WorkOrderStatus> {
    prop_oneof![
        Just(WorkOrderStatus::Draft),
        Just(WorkOrderStatus::Open),
        Just(WorkOrderStatus::InProgress),
        Just(WorkOrderStatus::OnHold),
        Just(WorkOrderStatus::Completed),
        Just(WorkOrderStatus::Closed),
        Just(WorkOrderStatus::Cancelled),
    ]
}

fn type_strategy() -> impl Strategy<Value = WorkOrderType> {
    prop_oneof![
        Just(WorkOrderType::Corrective),
        Just(WorkOrderType::Preventive),
        Just(WorkOrderType::Inspection),
    ]
}

fn work_order_strategy() -> impl Strategy<Value = WorkOrder> {
    (status_strategy(), type_strategy(), 0i64..10_000, 0i64..48, prop::option::of(0.0f64..5_000.0))
        .prop_map(|(status, kind, created_hour, repair_hours, cost)| {
            let created = epoch() + Duration::hours(created_hour);
            let mut wo = WorkOrder::new("generated", status, kind, created);
            wo.actual_start = Some(created);
            wo.actual_end = Some(created + Duration::hours(repair_hours));
            wo.due_date = Some(created + Duration::hours(24));
            wo.actual_cost = cost;
            wo
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn enum_breakdowns_account_for_every_record(wos in prop::collection::vec(work_order_strategy(), 0..200)) {
        let by_status = count_by_enum(&wos, |wo| wo.status);
        let by_priority = count_by_enum(&wos, |wo| wo.priority);
        prop_assert_eq!(by_status.values().sum::<u64>(), wos.len() as u64);
        prop_assert_eq!(by_priority.values().sum::<u64>(), wos.len() as u64);
        prop_assert_eq!(by_priority.len(), 4);
        prop_assert_eq!(by_priority["medium"], wos.len() as u64);
    }

    #[test]
    fn label_breakdowns_never_drop_blanks(labels in prop::collection::vec(prop::option::of("[A-Za-z ]{0,6}"), 0..100)) {
        let counts = count_by_label(&labels, |raw| {
            cmms_analytics::models::asset_type_category(raw.as_deref())
        });
        prop_assert_eq!(counts.values().sum::<u64>(), labels.len() as u64);
        prop_assert!(counts.keys().all(|k| !k.trim().is_empty()));
    }

    #[test]
    fn trailing_days_are_dense_and_increasing(offset_hours in 0i64..100_000, days in 1u32..120) {
        let now = epoch() + Duration::hours(offset_hours);
        let buckets = trailing_days(now, days);
        prop_assert_eq!(buckets.len(), days as usize);
        prop_assert!(buckets.windows(2).all(|w| w[0].start < w[1].start && w[0].end == w[1].start));
        prop_assert!(buckets.last().unwrap().contains(now));
    }

    #[test]
    fn rankings_are_bounded_and_sorted(values in prop::collection::vec(0.0f64..1_000.0, 0..100), k in 0usize..20) {
        let indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
        let top = top_n(indexed, k, |v| v.1, |v| v.0);
        prop_assert!(top.len() <= k);
        prop_assert_eq!(top.len(), k.min(values.len()));
        prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn calculators_are_idempotent(wos in prop::collection::vec(work_order_strategy(), 0..60)) {
        prop_assert_eq!(mtbf_hours(&wos), mtbf_hours(&wos));
        prop_assert_eq!(mttr_hours(&wos), mttr_hours(&wos));
        let sla = sla_compliance(&wos);
        prop_assert_eq!(sla, sla_compliance(&wos));
        prop_assert!((0..=100).contains(&sla));
    }

    #[test]
    fn cost_split_parts_add_up(total in 0.0f64..1_000_000.0) {
        let split = cost_split(total, &AnalyticsConfig::default());
        prop_assert!((split.labor + split.parts + split.other - total).abs() < 0.02);
        prop_assert!((split.contractors + split.misc - split.other).abs() < 0.02);
    }
}
