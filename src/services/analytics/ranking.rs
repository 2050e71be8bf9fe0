/// Sorts by `metric` descending and keeps the first `k` entries.
///
/// Ties are broken by `tie_break` ascending so rankings do not depend on the
/// order the records were loaded in. A NaN metric ranks as zero.
pub fn top_n<T, M, K, O>(mut items: Vec<T>, k: usize, metric: M, tie_break: K) -> Vec<T>
where
    M: Fn(&T) -> f64,
    K: Fn(&T) -> O,
    O: Ord,
{
    let rank = |item: &T| {
        let value = metric(item);
        if value.is_nan() {
            0.0
        } else {
            value
        }
    };
    items.sort_by(|a, b| {
        rank(b)
            .total_cmp(&rank(a))
            .then_with(|| tie_break(a).cmp(&tie_break(b)))
    });
    items.truncate(k);
    items
}
