// src/pipeline/check.rs

//! Check workflow: evaluate the page, then notify on change.

use crate::error::Result;
use crate::models::{EvaluationResult, WatchTarget};
use crate::notifier::{ChangeNotice, Notifier};
use crate::pipeline::ChangeEvaluator;
use crate::services::PageFetcher;
use crate::storage::BaselineStore;

/// Summary of a check run.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub result: EvaluationResult,
    /// Whether a notification was delivered
    pub notified: bool,
}

/// Run one check against `target`.
///
/// A notification is sent only when the evaluation reports a change. Delivery
/// failures propagate; the new baseline has already been saved by then.
pub async fn run_check(
    target: &WatchTarget,
    fetcher: &dyn PageFetcher,
    store: &dyn BaselineStore,
    notifier: &dyn Notifier,
) -> Result<CheckOutcome> {
    let evaluator = ChangeEvaluator::new(fetcher, store);
    let result = evaluator.evaluate(target).await?;
    log::info!("{}", result.message());

    if !result.changed {
        log::info!("No notification needed");
        return Ok(CheckOutcome {
            result,
            notified: false,
        });
    }

    log::info!("Sending notification email...");
    if let Err(e) = notifier.notify(&ChangeNotice::now(&target.url)).await {
        log::error!("Failed to send notification: {}", e);
        return Err(e);
    }
    log::info!("Notification sent successfully");

    Ok(CheckOutcome {
        result,
        notified: true,
    })
}
