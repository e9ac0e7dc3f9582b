//! Administrative-address geocoding via the Kakao local API, with a
//! fallback retry that drops the lot number.

use crate::api::FetchError;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, warn};

const ADDRESS_SEARCH_URL: &str = "https://dapi.kakao.com/v2/local/search/address.json";

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    #[serde(default)]
    documents: Vec<AddressDocument>,
}

// Kakao returns coordinates as strings: x = longitude, y = latitude.
#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: String,
    y: String,
}

pub struct Geocoder {
    client: Client,
    api_key: String,
}

impl Geocoder {
    pub fn new(api_key: String) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, api_key })
    }

    /// Converts an administrative address to WGS84 (latitude, longitude).
    /// When the full address does not resolve and a ri name exists, retries
    /// once without the lot number. `None` means the address did not resolve.
    pub fn coordinates(
        &self,
        city: Option<&str>,
        district: Option<&str>,
        neighborhood: Option<&str>,
        ri: Option<&str>,
        lot_number: Option<&str>,
    ) -> Option<(f64, f64)> {
        let join = |parts: &[Option<&str>]| -> String {
            parts
                .iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ")
        };

        let full_address = join(&[city, district, neighborhood, ri, lot_number]);
        if full_address.is_empty() {
            return None;
        }

        info!("geocoding: {full_address}");
        if let Some(coords) = self.request(&full_address) {
            return Some(coords);
        }

        if ri.is_some() {
            let fallback_address = join(&[city, district, neighborhood, ri]);
            warn!("geocoding failed, retrying without lot number: {fallback_address}");
            if let Some(coords) = self.request(&fallback_address) {
                return Some(coords);
            }
        }

        error!("geocoding failed: {full_address}");
        None
    }

    fn request(&self, address: &str) -> Option<(f64, f64)> {
        let response = self
            .client
            .get(ADDRESS_SEARCH_URL)
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .query(&[("query", address)])
            .send()
            .and_then(|r| r.error_for_status())
            .ok()?;

        let result: AddressSearchResponse = response.json().ok()?;
        let doc = result.documents.into_iter().next()?;

        let lat: f64 = doc.y.parse().ok()?;
        let lon: f64 = doc.x.parse().ok()?;
        Some((lat, lon))
    }
}
