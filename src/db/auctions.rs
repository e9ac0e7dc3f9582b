use crate::api::models::DetailResult;
use crate::db::connection::Database;
use crate::errors::StoreError;
use crate::model::{DateEntry, ExpiredCandidate, GeoPoint};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::info;

/// Fixed reason recorded when an auction is cancelled because its date
/// history can no longer be obtained upstream.
pub const CANCEL_REASON: &str = "기일 내역 조회 불가";

/// Persistence operations the reconciliation driver needs. Kept as a trait
/// so tests can substitute a fake store.
pub trait AuctionStore {
    /// Auctions that are not cancelled and have at least one date entry
    /// before `today` (8-digit string) with no recorded result.
    fn find_expired(&self, today: &str) -> Result<Vec<ExpiredCandidate>, StoreError>;

    /// Overwrites the record's whole date-entry list.
    fn replace_date_entries(&self, id: i64, entries: &[DateEntry]) -> Result<(), StoreError>;

    /// Marks the record cancelled (terminal). Returns false when no row was
    /// modified, i.e. the record was already cancelled or no longer exists.
    fn mark_cancelled(&self, id: i64) -> Result<bool, StoreError>;
}

/// Stored projection used by the detail-fetch duplicate check.
#[derive(Debug)]
pub struct StoredAuction {
    pub id: i64,
    pub date_entries: Vec<DateEntry>,
}

pub struct SqliteAuctionStore {
    db: Database,
}

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError::Db(e.to_string())
}

fn serde_err(e: serde_json::Error) -> StoreError {
    StoreError::Serde(e.to_string())
}

impl SqliteAuctionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Looks an auction up by its natural key.
    pub fn find_by_key(
        &self,
        case_no: &str,
        goods_seq: i64,
        court_code: &str,
    ) -> Result<Option<StoredAuction>, StoreError> {
        self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, date_entries FROM auctions
                     WHERE case_no = ?1 AND goods_seq = ?2 AND court_code = ?3",
                    params![case_no, goods_seq, court_code],
                    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()
                .map_err(db_err)?;

            match row {
                Some((id, entries_json)) => {
                    let date_entries = serde_json::from_str(&entries_json).map_err(serde_err)?;
                    Ok(Some(StoredAuction { id, date_entries }))
                }
                None => Ok(None),
            }
        })
    }

    /// Inserts a freshly fetched detail document, splitting pictures out
    /// into the auction_images table. Returns the new record id.
    pub fn insert_detail(
        &self,
        case_no: &str,
        goods_seq: i64,
        court_code: &str,
        detail: &DetailResult,
        pictures: &[Value],
        location: Option<&GeoPoint>,
    ) -> Result<i64, StoreError> {
        let detail_json = serde_json::to_string(detail).map_err(serde_err)?;
        let entries_json = serde_json::to_string(&detail.date_entries).map_err(serde_err)?;
        let location_json = location
            .map(serde_json::to_string)
            .transpose()
            .map_err(serde_err)?;
        let now = Utc::now().naive_utc();

        self.db.with_conn(|conn| {
            let tx = conn.transaction().map_err(db_err)?;

            tx.execute(
                "INSERT INTO auctions
                     (case_no, court_code, goods_seq, location, date_entries,
                      detail_json, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    case_no,
                    court_code,
                    goods_seq,
                    location_json,
                    entries_json,
                    detail_json,
                    now
                ],
            )
            .map_err(db_err)?;

            let id = tx.last_insert_rowid();
            insert_images(&tx, id, pictures)?;

            tx.commit().map_err(db_err)?;
            Ok(id)
        })
    }

    /// Whether a survey report is already stored for the case.
    pub fn has_study(&self, case_no: &str, court_code: &str) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM auction_studies
                     WHERE case_no = ?1 AND court_code = ?2",
                    params![case_no, court_code],
                    |row| row.get(0),
                )
                .map_err(db_err)?;
            Ok(count > 0)
        })
    }

    /// Stores a case's survey report document verbatim.
    pub fn insert_study(
        &self,
        case_no: &str,
        court_code: &str,
        study: &serde_json::Map<String, Value>,
    ) -> Result<(), StoreError> {
        let study_json = serde_json::to_string(study).map_err(serde_err)?;
        let now = Utc::now().naive_utc();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO auction_studies (case_no, court_code, study_json, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![case_no, court_code, study_json, now],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    /// Re-stores the detail document for an existing record (listed sale
    /// date changed upstream). Old images are deleted and replaced.
    pub fn update_detail(
        &self,
        id: i64,
        detail: &DetailResult,
        pictures: &[Value],
        location: Option<&GeoPoint>,
    ) -> Result<(), StoreError> {
        let detail_json = serde_json::to_string(detail).map_err(serde_err)?;
        let entries_json = serde_json::to_string(&detail.date_entries).map_err(serde_err)?;
        let location_json = location
            .map(serde_json::to_string)
            .transpose()
            .map_err(serde_err)?;
        let now = Utc::now().naive_utc();

        self.db.with_conn(|conn| {
            let tx = conn.transaction().map_err(db_err)?;

            tx.execute(
                "UPDATE auctions
                 SET location = COALESCE(?2, location),
                     date_entries = ?3,
                     detail_json = ?4,
                     updated_at = ?5
                 WHERE id = ?1",
                params![id, location_json, entries_json, detail_json, now],
            )
            .map_err(db_err)?;

            let deleted = tx
                .execute("DELETE FROM auction_images WHERE auction_id = ?1", [id])
                .map_err(db_err)?;
            info!("replaced {deleted} stored images for auction {id}");

            insert_images(&tx, id, pictures)?;

            tx.commit().map_err(db_err)?;
            Ok(())
        })
    }
}

fn insert_images(conn: &Connection, auction_id: i64, pictures: &[Value]) -> Result<(), StoreError> {
    let mut stmt = conn
        .prepare("INSERT INTO auction_images (auction_id, image_json) VALUES (?1, ?2)")
        .map_err(db_err)?;

    for picture in pictures {
        let image_json = serde_json::to_string(picture).map_err(serde_err)?;
        stmt.execute(params![auction_id, image_json]).map_err(db_err)?;
    }
    Ok(())
}

impl AuctionStore for SqliteAuctionStore {
    fn find_expired(&self, today: &str) -> Result<Vec<ExpiredCandidate>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT a.id, a.case_no, a.court_code, a.goods_seq, a.date_entries
                     FROM auctions a
                     WHERE a.is_cancelled = 0
                       AND EXISTS (
                           SELECT 1 FROM json_each(a.date_entries) d
                           WHERE json_extract(d.value, '$.dxdyYmd') < ?1
                             AND json_extract(d.value, '$.auctnDxdyRsltCd') IS NULL
                       )
                     ORDER BY a.id",
                )
                .map_err(db_err)?;

            let rows = stmt
                .query_map([today], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })
                .map_err(db_err)?;

            let mut candidates = Vec::new();
            for row in rows {
                let (id, case_no, court_code, goods_seq, entries_json) = row.map_err(db_err)?;
                let date_entries = serde_json::from_str(&entries_json).map_err(serde_err)?;
                candidates.push(ExpiredCandidate {
                    id,
                    case_no,
                    court_code,
                    goods_seq,
                    date_entries,
                });
            }
            Ok(candidates)
        })
    }

    fn replace_date_entries(&self, id: i64, entries: &[DateEntry]) -> Result<(), StoreError> {
        let entries_json = serde_json::to_string(entries).map_err(serde_err)?;
        let now = Utc::now().naive_utc();

        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE auctions SET date_entries = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, entries_json, now],
            )
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn mark_cancelled(&self, id: i64) -> Result<bool, StoreError> {
        let now = Utc::now().naive_utc();

        self.db.with_conn(|conn| {
            // Guarded by is_cancelled = 0 so cancellation stays one-way and
            // a repeat call reports that nothing changed.
            let changed = conn
                .execute(
                    "UPDATE auctions
                     SET is_cancelled = 1, cancelled_at = ?2, cancel_reason = ?3, updated_at = ?2
                     WHERE id = ?1 AND is_cancelled = 0",
                    params![id, now, CANCEL_REASON],
                )
                .map_err(db_err)?;
            Ok(changed > 0)
        })
    }
}
