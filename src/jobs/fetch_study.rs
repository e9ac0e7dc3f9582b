//! Per-case on-site survey report (현황조사서) fetch: one report per
//! (case, court), skipped when already stored.

use crate::api::models::ListItem;
use crate::api::CourtAuctionClient;
use crate::db::SqliteAuctionStore;
use crate::jobs::JobError;
use std::time::Duration;
use tracing::{info, warn};

const STUDY_DELAY: Duration = Duration::from_millis(100);

pub fn run(
    client: &CourtAuctionClient,
    store: &SqliteAuctionStore,
    item: &ListItem,
) -> Result<(), JobError> {
    if store.has_study(&item.case_no, &item.court_code)? {
        info!(
            "survey report already stored: case {}, court {}",
            item.case_no, item.court_code
        );
        return Ok(());
    }

    std::thread::sleep(STUDY_DELAY);
    info!(
        "requesting survey report: case {}, court {}",
        item.case_no, item.court_code
    );

    match client.fetch_study(&item.case_no, &item.court_code)? {
        Some(study) => {
            store.insert_study(&item.case_no, &item.court_code, &study)?;
            info!(
                "survey report stored: case {}, court {}",
                item.case_no, item.court_code
            );
        }
        None => warn!(
            "no survey report data: case {}, court {}",
            item.case_no, item.court_code
        ),
    }

    Ok(())
}
