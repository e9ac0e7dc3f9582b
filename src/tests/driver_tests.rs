use crate::api::models::RawHistoryItem;
use crate::api::{FetchError, HistorySource};
use crate::db::auctions::AuctionStore;
use crate::db::SqliteAuctionStore;
use crate::jobs::update_expired;
use crate::tests::utils::{entry, insert_auction, make_db};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Default)]
struct FakeHistory {
    responses: HashMap<(String, String), Vec<RawHistoryItem>>,
    failures: HashSet<(String, String)>,
}

impl FakeHistory {
    fn with_response(mut self, court_code: &str, case_no: &str, items: Vec<RawHistoryItem>) -> Self {
        self.responses
            .insert((court_code.to_string(), case_no.to_string()), items);
        self
    }

    fn with_failure(mut self, court_code: &str, case_no: &str) -> Self {
        self.failures
            .insert((court_code.to_string(), case_no.to_string()));
        self
    }
}

impl HistorySource for FakeHistory {
    fn fetch_history(
        &self,
        court_code: &str,
        case_no: &str,
    ) -> Result<Vec<RawHistoryItem>, FetchError> {
        let key = (court_code.to_string(), case_no.to_string());
        if self.failures.contains(&key) {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        Ok(self.responses.get(&key).cloned().unwrap_or_default())
    }
}

fn sold_item(goods_seq: i64) -> RawHistoryItem {
    RawHistoryItem {
        goods_seq: Some(goods_seq),
        date_time: "2023.10.31(10:00)".to_string(),
        kind_name: "매각기일".to_string(),
        result: "매각<br>187,000,000원".to_string(),
        place: "경매법정".to_string(),
        lowest_price: Some("150,000,000원".to_string()),
    }
}

#[test]
fn empty_history_cancels_and_keeps_entries() {
    let db = make_db("driver_cancel");
    let store = SqliteAuctionStore::new(db.clone());

    let id = insert_auction(&store, "2023타경2001", 1, "B000210", vec![entry("20230101", None)]);

    let history = FakeHistory::default(); // every lookup returns no items
    let stats = update_expired::run_with_delay(&store, &history, 50, Duration::ZERO).unwrap();

    assert_eq!(stats.total, 1);
    assert_eq!(stats.updated, 0);
    assert_eq!(stats.cancelled, 1);

    // The record is cancelled but its date-entry list is untouched.
    let (cancelled, entries_json): (i64, String) = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT is_cancelled, date_entries FROM auctions WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|e| crate::errors::StoreError::Db(e.to_string()))
        })
        .unwrap();
    assert_eq!(cancelled, 1);
    let stored: Vec<crate::model::DateEntry> = serde_json::from_str(&entries_json).unwrap();
    assert_eq!(stored, vec![entry("20230101", None)]);
}

#[test]
fn matching_history_replaces_the_date_list() {
    let db = make_db("driver_replace");
    let store = SqliteAuctionStore::new(db);

    insert_auction(&store, "2023타경2002", 1, "B000210", vec![entry("20230101", None)]);

    let history =
        FakeHistory::default().with_response("B000210", "2023타경2002", vec![sold_item(1)]);
    let stats = update_expired::run_with_delay(&store, &history, 50, Duration::ZERO).unwrap();

    assert_eq!(stats.updated, 1);
    assert_eq!(stats.cancelled, 0);

    let stored = store
        .find_by_key("2023타경2002", 1, "B000210")
        .unwrap()
        .expect("record exists");
    assert_eq!(stored.date_entries.len(), 1);
    let updated = &stored.date_entries[0];
    assert_eq!(updated.date, "20231031");
    assert_eq!(updated.kind_code.as_deref(), Some("01"));
    assert_eq!(updated.result_code.as_deref(), Some("001"));
    assert_eq!(updated.lowest_price, 150_000_000);
    assert_eq!(updated.sale_amount, Some(187_000_000));
}

#[test]
fn mismatched_sequence_leaves_record_unchanged() {
    let db = make_db("driver_mismatch");
    let store = SqliteAuctionStore::new(db);

    insert_auction(&store, "2023타경2003", 1, "B000210", vec![entry("20230101", None)]);

    // History only covers item 2 of the case.
    let history =
        FakeHistory::default().with_response("B000210", "2023타경2003", vec![sold_item(2)]);
    let stats = update_expired::run_with_delay(&store, &history, 50, Duration::ZERO).unwrap();

    assert_eq!(stats.updated, 0);
    assert_eq!(stats.cancelled, 0);

    let stored = store
        .find_by_key("2023타경2003", 1, "B000210")
        .unwrap()
        .expect("record exists");
    assert_eq!(stored.date_entries, vec![entry("20230101", None)]);
}

#[test]
fn fetch_failure_takes_the_cancellation_path() {
    let db = make_db("driver_fetch_failure");
    let store = SqliteAuctionStore::new(db);

    insert_auction(&store, "2023타경2004", 1, "B000210", vec![entry("20230101", None)]);

    let history = FakeHistory::default().with_failure("B000210", "2023타경2004");
    let stats = update_expired::run_with_delay(&store, &history, 50, Duration::ZERO).unwrap();

    assert_eq!(stats.cancelled, 1);
}

#[test]
fn mixed_batch_reports_correct_counters() {
    let db = make_db("driver_mixed");
    let store = SqliteAuctionStore::new(db);

    insert_auction(&store, "2023타경2005", 1, "B000210", vec![entry("20230101", None)]);
    insert_auction(&store, "2023타경2006", 1, "B000210", vec![entry("20230102", None)]);
    insert_auction(&store, "2023타경2007", 1, "B000210", vec![entry("20230103", None)]);

    let history = FakeHistory::default()
        .with_response("B000210", "2023타경2005", vec![sold_item(1)])
        .with_failure("B000210", "2023타경2006");
    // 2023타경2007 gets the default empty history.

    // Batch size 2 exercises the chunked loop.
    let stats = update_expired::run_with_delay(&store, &history, 2, Duration::ZERO).unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.cancelled, 2);

    // Nothing comes back on a rerun: the cancelled records are terminal and
    // the updated one now has a recorded result.
    let rerun = update_expired::run_with_delay(&store, &history, 2, Duration::ZERO).unwrap();
    assert_eq!(rerun.total, 0);
}
