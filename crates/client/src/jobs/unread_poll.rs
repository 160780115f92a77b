//! Unread-count reconciliation job.
//!
//! Runs once at startup, every 30 seconds, and immediately whenever the
//! alert stream delivers an alert (via the scheduler's trigger channel).
//! The badge is always overwritten with the latest result; concurrent
//! refreshes are last-writer-wins.

use std::sync::Arc;

use tracing::debug;

use domain::services::BackendApi;

use crate::metrics;
use crate::ui::UnreadBadge;

use super::scheduler::{Job, JobFrequency};

/// Seconds between scheduled unread polls.
const POLL_INTERVAL_SECS: u64 = 30;

/// Background job polling the unread-alert count.
pub struct UnreadPollJob {
    backend: Arc<dyn BackendApi>,
    badge: Arc<UnreadBadge>,
}

impl UnreadPollJob {
    pub fn new(backend: Arc<dyn BackendApi>, badge: Arc<UnreadBadge>) -> Self {
        Self { backend, badge }
    }
}

#[async_trait::async_trait]
impl Job for UnreadPollJob {
    fn name(&self) -> &'static str {
        "unread_poll"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(POLL_INTERVAL_SECS)
    }

    fn run_at_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        match self.backend.unread_alerts().await {
            Ok(alerts) => {
                self.badge.set(alerts.len());
                metrics::record_unread_poll(true);
                debug!(count = alerts.len(), "Unread count refreshed");
                Ok(())
            }
            Err(e) => {
                // The badge keeps its previous value; the next poll retries.
                metrics::record_unread_poll(false);
                Err(format!("Failed to fetch unread alerts: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{Alert, Severity};
    use domain::services::MockBackend;

    fn alert(id: i64) -> Alert {
        Alert {
            id,
            alert_type: None,
            severity: Severity::Medium,
            title: "t".to_string(),
            message: "m".to_string(),
            source: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_poll_sets_badge_to_alert_count() {
        let backend = Arc::new(MockBackend::new());
        backend.set_unread(vec![alert(1), alert(2), alert(3)]);
        let badge = Arc::new(UnreadBadge::new());

        let job = UnreadPollJob::new(backend.clone(), badge.clone());
        tokio_test::block_on(job.execute()).unwrap();

        assert_eq!(badge.count(), 3);
        assert!(badge.is_visible());
    }

    #[tokio::test]
    async fn test_poll_hides_badge_at_zero() {
        let backend = Arc::new(MockBackend::new());
        let badge = Arc::new(UnreadBadge::new());
        badge.set(5);

        let job = UnreadPollJob::new(backend.clone(), badge.clone());
        job.execute().await.unwrap();

        assert_eq!(badge.count(), 0);
        assert!(!badge.is_visible());
    }

    #[tokio::test]
    async fn test_poll_failure_leaves_badge_untouched() {
        let backend = Arc::new(MockBackend::failing());
        let badge = Arc::new(UnreadBadge::new());
        badge.set(4);

        let job = UnreadPollJob::new(backend.clone(), badge.clone());
        let result = job.execute().await;

        assert!(result.is_err());
        assert_eq!(badge.count(), 4);
    }

    #[test]
    fn test_poll_cadence() {
        let backend = Arc::new(MockBackend::new());
        let job = UnreadPollJob::new(backend, Arc::new(UnreadBadge::new()));
        assert_eq!(job.name(), "unread_poll");
        assert!(job.run_at_start());
        assert_eq!(
            job.frequency().duration(),
            std::time::Duration::from_secs(30)
        );
    }
}
