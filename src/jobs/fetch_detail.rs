//! Per-item detail fetch: duplicate check against the natural key,
//! re-fetch when the listed sale date changed, geocoding, and persistence
//! with the pictures split out.

use crate::api::models::{DetailResult, ListItem};
use crate::api::CourtAuctionClient;
use crate::db::SqliteAuctionStore;
use crate::geo::Geocoder;
use crate::jobs::JobError;
use crate::model::{DateEntry, GeoPoint};
use std::time::Duration;
use tracing::{info, warn};

const DETAIL_DELAY: Duration = Duration::from_secs(1);

pub fn run(
    client: &CourtAuctionClient,
    store: &SqliteAuctionStore,
    geocoder: Option<&Geocoder>,
    item: &ListItem,
) -> Result<(), JobError> {
    let Some(goods_seq) = item.goods_seq else {
        warn!("list item without a numeric goods sequence: case {}", item.case_no);
        return Ok(());
    };

    let existing = store.find_by_key(&item.case_no, goods_seq, &item.court_code)?;

    if let Some(stored) = &existing {
        if !needs_refresh(&stored.date_entries, &item.listed_sale_date) {
            info!(
                "detail already stored: case {}, item {goods_seq}, court {}",
                item.case_no, item.court_code
            );
            return Ok(());
        }
        info!(
            "listed sale date changed, re-fetching detail: case {}, item {goods_seq}, court {}",
            item.case_no, item.court_code
        );
    } else {
        info!(
            "requesting detail: case {}, item {goods_seq}, court {}",
            item.case_no, item.court_code
        );
    }

    std::thread::sleep(DETAIL_DELAY);

    let Some(mut detail) = client.fetch_detail(&item.case_no, goods_seq, &item.court_code)? else {
        warn!(
            "no detail data: case {}, item {goods_seq}, court {}",
            item.case_no, item.court_code
        );
        return Ok(());
    };

    // Pictures live in their own table; keep them out of the stored document.
    let pictures = std::mem::take(&mut detail.pictures);
    let location = geocode_first_object(geocoder, &detail);

    match existing {
        Some(stored) => {
            store.update_detail(stored.id, &detail, &pictures, location.as_ref())?;
            info!(
                "detail updated: case {}, item {goods_seq}, court {}, images: {}",
                item.case_no,
                item.court_code,
                pictures.len()
            );
        }
        None => {
            let id =
                store.insert_detail(&item.case_no, goods_seq, &item.court_code, &detail, &pictures, location.as_ref())?;
            info!(
                "detail stored: id {id}, case {}, item {goods_seq}, court {}, images: {}",
                item.case_no,
                item.court_code,
                pictures.len()
            );
        }
    }

    Ok(())
}

/// An already-stored record only needs a re-fetch when the sale date shown
/// on the listing is not among its stored entry dates (the court moved the
/// sale).
pub fn needs_refresh(entries: &[DateEntry], listed_sale_date: &str) -> bool {
    let normalized: String = listed_sale_date
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(8)
        .collect();

    if normalized.len() != 8 {
        // No usable date on the listing; keep the stored copy.
        return false;
    }

    !entries.iter().any(|e| e.date == normalized)
}

fn geocode_first_object(geocoder: Option<&Geocoder>, detail: &DetailResult) -> Option<GeoPoint> {
    let geocoder = geocoder?;
    let object = detail.objects.first()?;

    let (lat, lon) = geocoder.coordinates(
        object.city.as_deref(),
        object.district.as_deref(),
        object.neighborhood.as_deref(),
        object.ri.as_deref(),
        object.lot_number.as_deref(),
    )?;
    info!("coordinates attached: ({lat}, {lon})");
    Some(GeoPoint::new(lat, lon))
}
