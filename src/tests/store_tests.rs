use crate::db::auctions::{AuctionStore, CANCEL_REASON};
use crate::db::SqliteAuctionStore;
use crate::tests::utils::{entry, insert_auction, make_db};

#[test]
fn find_expired_selects_past_resultless_entries() {
    let db = make_db("store_expired");
    let store = SqliteAuctionStore::new(db);

    let id = insert_auction(&store, "2023타경1001", 1, "B000210", vec![entry("20230101", None)]);

    let candidates = store.find_expired("20240101").unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, id);
    assert_eq!(candidates[0].case_no, "2023타경1001");
    assert_eq!(candidates[0].court_code, "B000210");
    assert_eq!(candidates[0].goods_seq, 1);
    assert_eq!(candidates[0].date_entries.len(), 1);
}

#[test]
fn find_expired_skips_future_and_resulted_entries() {
    let db = make_db("store_skips");
    let store = SqliteAuctionStore::new(db);

    // Future date, no result yet.
    insert_auction(&store, "2023타경1002", 1, "B000210", vec![entry("20990101", None)]);
    // Past date but the outcome is already recorded.
    insert_auction(&store, "2023타경1003", 1, "B000210", vec![entry("20230101", Some("002"))]);

    assert!(store.find_expired("20240101").unwrap().is_empty());
}

#[test]
fn find_expired_matches_any_entry_in_the_list() {
    let db = make_db("store_any_entry");
    let store = SqliteAuctionStore::new(db);

    insert_auction(
        &store,
        "2023타경1004",
        2,
        "B000210",
        vec![entry("20230101", Some("002")), entry("20230301", None)],
    );

    let candidates = store.find_expired("20240101").unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].goods_seq, 2);
}

#[test]
fn cancellation_is_one_way() {
    let db = make_db("store_cancel");
    let store = SqliteAuctionStore::new(db.clone());

    let id = insert_auction(&store, "2023타경1005", 1, "B000210", vec![entry("20230101", None)]);

    assert!(store.mark_cancelled(id).unwrap());
    // Second attempt modifies nothing.
    assert!(!store.mark_cancelled(id).unwrap());
    // The entry dates are still in the past with no result, but the record
    // must never be selected again.
    assert!(store.find_expired("20240101").unwrap().is_empty());

    let (cancelled, reason): (i64, String) = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT is_cancelled, cancel_reason FROM auctions WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|e| crate::errors::StoreError::Db(e.to_string()))
        })
        .unwrap();
    assert_eq!(cancelled, 1);
    assert_eq!(reason, CANCEL_REASON);
}

#[test]
fn mark_cancelled_on_missing_record_modifies_nothing() {
    let db = make_db("store_cancel_missing");
    let store = SqliteAuctionStore::new(db);

    assert!(!store.mark_cancelled(9999).unwrap());
}

#[test]
fn replace_date_entries_overwrites_the_whole_list() {
    let db = make_db("store_replace");
    let store = SqliteAuctionStore::new(db);

    let id = insert_auction(
        &store,
        "2023타경1006",
        1,
        "B000210",
        vec![entry("20230101", None), entry("20230201", None)],
    );

    let replacement = vec![entry("20231031", Some("002"))];
    store.replace_date_entries(id, &replacement).unwrap();

    let stored = store
        .find_by_key("2023타경1006", 1, "B000210")
        .unwrap()
        .expect("record exists");
    assert_eq!(stored.date_entries, replacement);
}

#[test]
fn update_detail_replaces_images() {
    let db = make_db("store_images");
    let store = SqliteAuctionStore::new(db.clone());

    let detail = crate::api::models::DetailResult::default();
    let old_pictures = vec![
        serde_json::json!({"picFile": "a.jpg"}),
        serde_json::json!({"picFile": "b.jpg"}),
    ];
    let id = store
        .insert_detail("2023타경1007", 1, "B000210", &detail, &old_pictures, None)
        .unwrap();

    let new_pictures = vec![serde_json::json!({"picFile": "c.jpg"})];
    store
        .update_detail(id, &detail, &new_pictures, None)
        .unwrap();

    let count: i64 = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM auction_images WHERE auction_id = ?1",
                [id],
                |row| row.get(0),
            )
            .map_err(|e| crate::errors::StoreError::Db(e.to_string()))
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn study_duplicate_check_is_per_case_and_court() {
    let db = make_db("store_study");
    let store = SqliteAuctionStore::new(db);

    let study = serde_json::json!({"csBaseInfo": {"csNm": "부동산임의경매"}})
        .as_object()
        .cloned()
        .unwrap();

    assert!(!store.has_study("2023타경1008", "B000210").unwrap());
    store.insert_study("2023타경1008", "B000210", &study).unwrap();
    assert!(store.has_study("2023타경1008", "B000210").unwrap());

    // Same case number under a different court is a different study.
    assert!(!store.has_study("2023타경1008", "B000211").unwrap());
}
