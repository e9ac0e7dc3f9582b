//! Expired-auction reconciliation: turns a freshly fetched raw history
//! into the canonical date-entry list for one auction record, or decides
//! the record should be cancelled.

use crate::api::models::RawHistoryItem;
use crate::codes;
use crate::model::DateEntry;
use tracing::warn;

/// Decision produced for one auction record.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No history is obtainable for the case; mark the record cancelled.
    Cancel,
    /// Replace the record's whole date-entry list with this one.
    ///
    /// Deliberately full-overwrite, not a per-entry merge: the freshly
    /// fetched history is taken as the complete truth for the item.
    Replace(Vec<DateEntry>),
    /// History existed but nothing matched this item; leave the record
    /// untouched.
    NoChange,
}

/// Reconciles an auction item (identified by its sequence number within
/// the case) against the case's raw history.
pub fn reconcile(goods_seq: i64, history: &[RawHistoryItem]) -> Outcome {
    if history.is_empty() {
        return Outcome::Cancel;
    }

    let entries: Vec<DateEntry> = history
        .iter()
        .filter_map(|item| build_date_entry(goods_seq, item))
        .collect();

    if entries.is_empty() {
        Outcome::NoChange
    } else {
        Outcome::Replace(entries)
    }
}

/// Normalizes one raw history item into a [`DateEntry`]. A malformed or
/// unrelated item yields `None` and never aborts the batch.
fn build_date_entry(goods_seq: i64, item: &RawHistoryItem) -> Option<DateEntry> {
    // Items for other goods in the same case are dropped; a non-numeric
    // sequence field already coerced to None at decode time.
    if item.goods_seq != Some(goods_seq) {
        return None;
    }

    let (date, time) = codes::parse_date_time(&item.date_time)?;

    let Some(kind_code) = codes::map_event_kind(&item.kind_name) else {
        warn!("unknown event kind: {:?}", item.kind_name);
        return None;
    };

    let (result_code, sale_price) = codes::extract_result_info(&item.result);

    let lowest_price = item
        .lowest_price
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(codes::extract_price)
        .unwrap_or(0);

    let sale_amount = if result_code == Some(codes::RESULT_SOLD) {
        sale_price
    } else {
        None
    };

    Some(DateEntry {
        date,
        time,
        bid_begin_date: None,
        bid_end_date: None,
        place: item.place.clone(),
        kind_code: Some(kind_code.to_string()),
        result_code: result_code.map(str::to_string),
        goods_status_code: None,
        lowest_price,
        sale_amount,
    })
}
