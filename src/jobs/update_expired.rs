//! Reconciliation driver: re-checks auctions whose scheduled date passed
//! without a recorded outcome, refreshing their date history from upstream
//! or cancelling them when no history is obtainable.

use crate::api::HistorySource;
use crate::db::auctions::AuctionStore;
use crate::errors::StoreError;
use crate::reconcile::{reconcile, Outcome};
use chrono::Local;
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 50;

// Courtesy pacing between upstream requests; not correctness-critical.
const REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ReconcileStats {
    pub total: usize,
    pub updated: usize,
    pub cancelled: usize,
}

pub fn run(
    store: &dyn AuctionStore,
    history: &dyn HistorySource,
    batch_size: usize,
) -> Result<ReconcileStats, StoreError> {
    run_with_delay(store, history, batch_size, REQUEST_DELAY)
}

/// Same as [`run`] but with an explicit inter-request delay (tests pass
/// `Duration::ZERO`).
pub fn run_with_delay(
    store: &dyn AuctionStore,
    history: &dyn HistorySource,
    batch_size: usize,
    delay: Duration,
) -> Result<ReconcileStats, StoreError> {
    let batch_size = batch_size.max(1);
    let today = Local::now().format("%Y%m%d").to_string();

    let candidates = store.find_expired(&today)?;
    let mut stats = ReconcileStats {
        total: candidates.len(),
        ..Default::default()
    };
    info!(
        "starting update of {} expired auctions without a recorded result",
        stats.total
    );

    for (batch_index, batch) in candidates.chunks(batch_size).enumerate() {
        let first = batch_index * batch_size + 1;
        info!(
            "processing batch: {first} ~ {} / {}",
            first + batch.len() - 1,
            stats.total
        );

        for candidate in batch {
            std::thread::sleep(delay);

            // A fetch failure is treated as "no history available" and
            // takes the cancellation path; it never aborts the run.
            let items = match history.fetch_history(&candidate.court_code, &candidate.case_no) {
                Ok(items) => items,
                Err(e) => {
                    error!(
                        "history fetch failed: case {}, court {}: {e}",
                        candidate.case_no, candidate.court_code
                    );
                    Vec::new()
                }
            };

            match reconcile(candidate.goods_seq, &items) {
                Outcome::Cancel => match store.mark_cancelled(candidate.id) {
                    Ok(true) => {
                        info!("auction cancelled: id {}", candidate.id);
                        stats.cancelled += 1;
                    }
                    Ok(false) => warn!("cancellation modified nothing: id {}", candidate.id),
                    Err(e) => warn!("cancellation failed: id {}: {e}", candidate.id),
                },
                Outcome::Replace(entries) => {
                    match store.replace_date_entries(candidate.id, &entries) {
                        Ok(()) => {
                            info!(
                                "date entries refreshed: id {}, {} entries",
                                candidate.id,
                                entries.len()
                            );
                            stats.updated += 1;
                        }
                        Err(e) => warn!("date entry update failed: id {}: {e}", candidate.id),
                    }
                }
                Outcome::NoChange => {
                    warn!("no matching date history: id {}", candidate.id);
                }
            }
        }
    }

    info!(
        "expired auction update finished: {} total, {} updated, {} cancelled",
        stats.total, stats.updated, stats.cancelled
    );
    Ok(stats)
}
