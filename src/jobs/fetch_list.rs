//! Page-looping search over the listing endpoint for one bid-date window,
//! dispatching every kept hit to the detail job.

use crate::api::CourtAuctionClient;
use crate::db::SqliteAuctionStore;
use crate::geo::Geocoder;
use crate::jobs::{fetch_detail, fetch_study};
use chrono::{Duration as ChronoDuration, Local};
use std::time::Duration;
use tracing::{error, info, warn};

const PAGE_SIZE: u32 = 40;
const PAGE_DELAY: Duration = Duration::from_millis(500);

/// One search window: a court search-condition code plus a bid-date range
/// expressed in days relative to today.
#[derive(Debug, Clone, Copy)]
pub struct SearchWindow {
    pub condition_code: &'static str,
    pub bid_begin_days: i64,
    pub bid_end_days: i64,
}

/// The two windows the pipeline polls: imminent sales and the following
/// weeks.
pub const DEFAULT_WINDOWS: [SearchWindow; 2] = [
    SearchWindow {
        condition_code: "0004601",
        bid_begin_days: 0,
        bid_end_days: 14,
    },
    SearchWindow {
        condition_code: "0004602",
        bid_begin_days: 15,
        bid_end_days: 60,
    },
];

/// Today plus `days`, as an 8-digit date string.
pub fn date_str(days_from_today: i64) -> String {
    (Local::now() + ChronoDuration::days(days_from_today))
        .format("%Y%m%d")
        .to_string()
}

/// Fetches every listing page of the window and runs the detail job for
/// each kept item. A transport error ends the window (fail and log, no
/// retry).
pub fn run(
    client: &CourtAuctionClient,
    store: &SqliteAuctionStore,
    geocoder: Option<&Geocoder>,
    window: &SearchWindow,
) {
    let bid_begin = date_str(window.bid_begin_days);
    let bid_end = date_str(window.bid_end_days);

    let mut page_no: u32 = 1;
    let mut total_count: Option<i64> = None;

    loop {
        std::thread::sleep(PAGE_DELAY);
        info!(
            "[{}] {} ~ {} (page {page_no}) requesting...",
            window.condition_code, bid_begin, bid_end
        );

        let data = match client.fetch_list_page(
            window.condition_code,
            &bid_begin,
            &bid_end,
            page_no,
            PAGE_SIZE,
        ) {
            Ok(data) => data,
            Err(e) => {
                error!("list fetch failed: {e}");
                break;
            }
        };

        let total = *total_count.get_or_insert_with(|| data.page.total_count.unwrap_or(0));
        let total_pages = (total + PAGE_SIZE as i64 - 1) / PAGE_SIZE as i64;
        info!("page {page_no} / {total_pages}, total items: {total}");

        for item in &data.items {
            // Vehicles and miscellaneous goods are not tracked.
            if item.category_code == "30000" || item.category_code == "40000" {
                info!("vehicle/misc item, skipping: case {}", item.case_no);
                continue;
            }

            if let Err(e) = fetch_detail::run(client, store, geocoder, item) {
                warn!("detail fetch failed: case {}: {e}", item.case_no);
            }
            if let Err(e) = fetch_study::run(client, store, item) {
                warn!("survey report fetch failed: case {}: {e}", item.case_no);
            }
        }

        if i64::from(page_no) * i64::from(PAGE_SIZE) >= total {
            info!("all pages collected for [{}]", window.condition_code);
            break;
        }
        page_no += 1;
    }
}
