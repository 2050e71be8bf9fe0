use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::ServiceError;

/// Result of one dashboard branch after isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<T> {
    pub value: T,
    pub degraded: bool,
}

/// Runs one dashboard branch; an error or timeout yields `T::default()` instead
/// of failing the whole dashboard. Failed branches are not retried.
pub async fn isolate<T, F>(branch: &'static str, timeout: Duration, task: F) -> Section<T>
where
    T: Default,
    F: Future<Output = Result<T, ServiceError>>,
{
    let outcome = match tokio::time::timeout(timeout, task).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(timeout.as_millis() as u64)),
    };

    match outcome {
        Ok(value) => Section {
            value,
            degraded: false,
        },
        Err(e) => {
            warn!(branch, error = %e, "Analytics branch failed; substituting empty result");
            metrics::counter!("analytics.branch_fallbacks", 1, "branch" => branch);
            Section {
                value: T::default(),
                degraded: true,
            }
        }
    }
}

/// Names of the branches that fell back, in the order given.
pub fn degraded_names(branches: &[(&'static str, bool)]) -> Vec<String> {
    branches
        .iter()
        .filter(|(_, degraded)| *degraded)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_passes_through() {
        let section = isolate("ok", Duration::from_secs(1), async { Ok::<_, ServiceError>(7u32) }).await;
        assert_eq!(section, Section { value: 7, degraded: false });
    }

    #[tokio::test]
    async fn failure_substitutes_default() {
        let section: Section<Vec<u32>> = isolate("assets", Duration::from_secs(1), async {
            Err(ServiceError::DataSourceUnavailable("assets".into()))
        })
        .await;
        assert!(section.degraded);
        assert!(section.value.is_empty());
    }

    #[tokio::test]
    async fn slow_branch_times_out_to_default() {
        let section = isolate("slow", Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ServiceError>(42u64)
        })
        .await;
        assert_eq!(section, Section { value: 0, degraded: true });
    }

    #[test]
    fn degraded_names_preserves_order() {
        let names = degraded_names(&[("work_orders", false), ("assets", true), ("users", true)]);
        assert_eq!(names, vec!["assets".to_string(), "users".to_string()]);
    }
}
