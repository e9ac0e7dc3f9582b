use crate::api::models::DetailResult;
use crate::db::connection::{init_db, Database};
use crate::db::SqliteAuctionStore;
use crate::model::DateEntry;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh temp-file database initialized with the production
/// schema.
pub fn make_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{tag}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.display().to_string());
    init_db(&db).expect("Failed to initialize DB");
    db
}

/// A date entry with only the fields under test filled in.
pub fn entry(date: &str, result_code: Option<&str>) -> DateEntry {
    DateEntry {
        date: date.to_string(),
        time: "1000".to_string(),
        bid_begin_date: None,
        bid_end_date: None,
        place: "경매법정".to_string(),
        kind_code: Some("01".to_string()),
        result_code: result_code.map(str::to_string),
        goods_status_code: None,
        lowest_price: 100_000_000,
        sale_amount: None,
    }
}

/// Inserts an auction record through the production detail path and
/// returns its id.
pub fn insert_auction(
    store: &SqliteAuctionStore,
    case_no: &str,
    goods_seq: i64,
    court_code: &str,
    entries: Vec<DateEntry>,
) -> i64 {
    let detail = DetailResult {
        date_entries: entries,
        ..Default::default()
    };
    store
        .insert_detail(case_no, goods_seq, court_code, &detail, &[], None)
        .expect("insert fixture auction")
}
