//! Background materialization scheduler
//!
//! One tokio task ticks on a fixed period and runs a materialization pass
//! over every due rule. Passes are idempotent, so an overlap with a manual
//! process-now request costs nothing; the engine skips rules already being
//! worked on.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::info;

use crate::engine::RecurringRuleEngine;

/// Run the materialization loop until the task is dropped.
pub async fn run_materializer(recurring: Arc<RecurringRuleEngine>, period: Duration) {
    let mut timer = interval(period);

    loop {
        timer.tick().await;
        let report = recurring.process_due();
        info!(
            rules = report.rules_processed,
            created = report.created,
            skipped = report.skipped,
            "scheduled materialization tick"
        );
    }
}
