use serde::{Deserialize, Serialize};

/// One scheduled or occurred event in an auction's timeline. Serialized
/// field names follow the upstream court-auction document schema so stored
/// records stay queryable with the same keys the API uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    /// Calendar date as an 8-digit string (zero-padded, so lexical
    /// comparison is chronological comparison).
    #[serde(rename = "dxdyYmd")]
    pub date: String,
    /// Time of day as a 4-digit string.
    #[serde(rename = "dxdyHm", default)]
    pub time: String,
    #[serde(rename = "bidBgngYmd", default)]
    pub bid_begin_date: Option<String>,
    #[serde(rename = "bidEndYmd", default)]
    pub bid_end_date: Option<String>,
    #[serde(rename = "dxdyPlcNm", default)]
    pub place: String,
    #[serde(rename = "auctnDxdyKndCd", default)]
    pub kind_code: Option<String>,
    /// Outcome code; `None` means the outcome is not yet known.
    #[serde(rename = "auctnDxdyRsltCd", default)]
    pub result_code: Option<String>,
    #[serde(rename = "auctnDxdyGdsStatCd", default)]
    pub goods_status_code: Option<String>,
    /// Lowest/base disposal price, 0 when the upstream value is missing
    /// or unparseable.
    #[serde(
        rename = "tsLwsDspslPrc",
        default,
        deserialize_with = "flex::i64_or_zero"
    )]
    pub lowest_price: i64,
    /// Final sale amount, present only when the entry's result is "sold".
    #[serde(
        rename = "dspslAmt",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flex::opt_i64"
    )]
    pub sale_amount: Option<i64>,
}

/// GeoJSON point, stored as (longitude, latitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [lon, lat],
        }
    }
}

/// Projection of an auction record returned by the expired-auction
/// selector: just what the reconciliation driver needs.
#[derive(Debug, Clone)]
pub struct ExpiredCandidate {
    pub id: i64,
    pub case_no: String,
    pub court_code: String,
    pub goods_seq: i64,
    pub date_entries: Vec<DateEntry>,
}

/// The upstream API serializes numeric fields sometimes as JSON numbers
/// and sometimes as strings; these deserializers accept both.
pub(crate) mod flex {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn coerce_i64(v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(deserializer)?;
        Ok(v.as_ref().and_then(coerce_i64))
    }

    pub fn i64_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_i64(deserializer).map(|v| v.unwrap_or(0))
    }
}
