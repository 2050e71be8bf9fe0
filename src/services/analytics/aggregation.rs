//! Group-by reducers used for the status/priority/type/category breakdowns.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::round2;

/// Counts records per variant of a closed enumeration.
///
/// Every variant appears in the result, with zero when nothing matches, so
/// panels always render the full set of categories.
pub fn count_by_enum<T, E, F>(records: &[T], discriminator: F) -> BTreeMap<String, u64>
where
    E: IntoEnumIterator + AsRef<str>,
    F: Fn(&T) -> E,
{
    let mut counts: BTreeMap<String, u64> =
        E::iter().map(|variant| (variant.as_ref().to_string(), 0)).collect();
    for record in records {
        *counts
            .entry(discriminator(record).as_ref().to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Counts records per free-text label. The label function is expected to
/// return a canonical value (e.g. `"Unknown"` for blanks), so nothing is dropped.
pub fn count_by_label<T, F>(records: &[T], label: F) -> BTreeMap<String, u64>
where
    F: Fn(&T) -> String,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(label(record)).or_insert(0) += 1;
    }
    counts
}

/// Sums a numeric field per free-text label, rounding each total to cents.
pub fn sum_by_label<T, L, V>(records: &[T], label: L, value: V) -> BTreeMap<String, f64>
where
    L: Fn(&T) -> String,
    V: Fn(&T) -> f64,
{
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(label(record)).or_insert(0.0) += value(record);
    }
    sums.into_iter()
        .map(|(label, total)| (label, round2(total)))
        .collect()
}

/// Sums a numeric field per variant of a closed enumeration.
pub fn sum_by_enum<T, E, F, V>(records: &[T], discriminator: F, value: V) -> BTreeMap<String, f64>
where
    E: IntoEnumIterator + AsRef<str>,
    F: Fn(&T) -> E,
    V: Fn(&T) -> f64,
{
    let mut sums: BTreeMap<String, f64> =
        E::iter().map(|variant| (variant.as_ref().to_string(), 0.0)).collect();
    for record in records {
        *sums
            .entry(discriminator(record).as_ref().to_string())
            .or_insert(0.0) += value(record);
    }
    sums.into_iter()
        .map(|(label, total)| (label, round2(total)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{asset_type_category, Asset, AssetStatus, WorkOrderPriority};

    #[test]
    fn enum_counts_include_empty_variants() {
        let priorities = vec![WorkOrderPriority::High, WorkOrderPriority::High, WorkOrderPriority::Low];
        let counts = count_by_enum(&priorities, |p| *p);

        assert_eq!(counts.len(), 4);
        assert_eq!(counts["high"], 2);
        assert_eq!(counts["low"], 1);
        assert_eq!(counts["medium"], 0);
        assert_eq!(counts["critical"], 0);
    }

    #[test]
    fn free_text_labels_bucket_unknown() {
        let assets = vec![
            Asset::new("Chiller 1", Some("HVAC"), AssetStatus::Active),
            Asset::new("Chiller 2", Some("HVAC"), AssetStatus::Active),
            Asset::new("Forklift", None, AssetStatus::Active),
            Asset::new("Mystery", Some(""), AssetStatus::Inactive),
        ];
        let counts = count_by_label(&assets, |a| asset_type_category(a.asset_type.as_deref()));

        assert_eq!(counts["HVAC"], 2);
        assert_eq!(counts["Unknown"], 2);
        assert_eq!(counts.values().sum::<u64>(), 4);
    }

    #[test]
    fn sums_are_rounded_to_cents() {
        let rows = vec![("a", 0.1), ("a", 0.2), ("b", 1.005)];
        let sums = sum_by_label(&rows, |r| r.0.to_string(), |r| r.1);
        assert_eq!(sums["a"], 0.3);
        assert_eq!(sums["b"], 1.0);
    }
}
