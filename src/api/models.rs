//! Request bodies and response envelopes for the court-auction JSON
//! endpoints, decoded once at the boundary.

use crate::model::{flex, DateEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Common response envelope: `{status, data, message}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: i64,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------- case date/event history ----------

#[derive(Debug, Serialize)]
pub struct HistoryRequest<'a> {
    #[serde(rename = "dma_srchDxdyDtsLst")]
    pub query: HistoryQuery<'a>,
}

#[derive(Debug, Serialize)]
pub struct HistoryQuery<'a> {
    #[serde(rename = "cortOfcCd")]
    pub court_code: &'a str,
    #[serde(rename = "csNo")]
    pub case_no: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryData {
    #[serde(rename = "dlt_dxdyDtsLst", default)]
    pub items: Vec<RawHistoryItem>,
}

/// One historical event for a case, as delivered by the upstream API.
/// Never persisted verbatim; always normalized into a [`DateEntry`] first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHistoryItem {
    /// Item sequence within the case; number or numeric string upstream,
    /// anything else coerces to `None`.
    #[serde(rename = "dspslGdsSeq", default, deserialize_with = "flex::opt_i64")]
    pub goods_seq: Option<i64>,
    /// Compound date-time, `"YYYY.MM.DD(HH:MM)"`.
    #[serde(rename = "dxdyTime", default)]
    pub date_time: String,
    /// Free-text event-kind label, e.g. "매각기일".
    #[serde(rename = "auctnDxdyKndNm", default)]
    pub kind_name: String,
    /// Free-text outcome, possibly with embedded markup and price text.
    #[serde(rename = "dxdyRslt", default)]
    pub result: String,
    #[serde(rename = "dxdyPlcNm", default)]
    pub place: String,
    /// Lowest/base price as a formatted string ("150,000,000원").
    #[serde(rename = "tsLwsDspslPrc", default)]
    pub lowest_price: Option<String>,
}

// ---------- listing search ----------

#[derive(Debug, Serialize)]
pub struct ListRequest<'a> {
    #[serde(rename = "dma_pageInfo")]
    pub page: PageInfo,
    #[serde(rename = "dma_srchGdsDtlSrchInfo")]
    pub search: ListSearchInfo<'a>,
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    #[serde(rename = "pageNo")]
    pub page_no: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalYn")]
    pub total_yn: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListSearchInfo<'a> {
    #[serde(rename = "bidDvsCd")]
    pub bid_division_code: &'static str,
    #[serde(rename = "cortAuctnSrchCondCd")]
    pub search_condition_code: &'a str,
    #[serde(rename = "bidBgngYmd")]
    pub bid_begin_date: &'a str,
    #[serde(rename = "bidEndYmd")]
    pub bid_end_date: &'a str,
    #[serde(rename = "cortStDvs")]
    pub court_st_division: &'static str,
    #[serde(rename = "statNum")]
    pub stat_num: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListData {
    #[serde(rename = "dma_pageInfo", default)]
    pub page: ListPageInfo,
    #[serde(rename = "dlt_srchResult", default)]
    pub items: Vec<ListItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPageInfo {
    #[serde(rename = "totalCnt", default, deserialize_with = "flex::opt_i64")]
    pub total_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItem {
    #[serde(rename = "srnSaNo", default)]
    pub case_no: String,
    #[serde(rename = "maemulSer", default, deserialize_with = "flex::opt_i64")]
    pub goods_seq: Option<i64>,
    #[serde(rename = "boCd", default)]
    pub court_code: String,
    /// Large-category code; 30000 (vehicles) and 40000 (misc) are skipped.
    #[serde(rename = "lclsUtilCd", default)]
    pub category_code: String,
    /// Sale date as shown on the listing, used to detect rescheduled items.
    #[serde(rename = "maeGiil", default)]
    pub listed_sale_date: String,
}

// ---------- on-site survey report (현황조사서) ----------

#[derive(Debug, Serialize)]
pub struct StudyRequest<'a> {
    #[serde(rename = "dma_srchCurstExmn")]
    pub query: StudyQuery<'a>,
}

#[derive(Debug, Serialize)]
pub struct StudyQuery<'a> {
    #[serde(rename = "cortOfcCd")]
    pub court_code: &'a str,
    #[serde(rename = "csNo")]
    pub case_no: &'a str,
    #[serde(rename = "auctnInfOriginDvsCd")]
    pub origin_division_code: &'static str,
    #[serde(rename = "ordTsCnt")]
    pub ord_ts_count: Option<u32>,
}

// ---------- per-item detail ----------

#[derive(Debug, Serialize)]
pub struct DetailRequest<'a> {
    #[serde(rename = "dma_srchGdsDtlSrch")]
    pub query: DetailQuery<'a>,
}

#[derive(Debug, Serialize)]
pub struct DetailQuery<'a> {
    #[serde(rename = "csNo")]
    pub case_no: &'a str,
    #[serde(rename = "cortOfcCd")]
    pub court_code: &'a str,
    #[serde(rename = "dspslGdsSeq")]
    pub goods_seq: i64,
    #[serde(rename = "pgmId")]
    pub program_id: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailData {
    #[serde(rename = "dma_result", default)]
    pub result: Option<DetailResult>,
}

/// The detail document. Pictures, disposal objects and the date list are
/// typed because the pipeline touches them; the (large) remainder of the
/// document is carried as-is and persisted verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailResult {
    #[serde(rename = "csPicLst", default, skip_serializing_if = "Vec::is_empty")]
    pub pictures: Vec<Value>,
    #[serde(rename = "gdsDspslObjctLst", default)]
    pub objects: Vec<DisposalObject>,
    #[serde(rename = "gdsDspslDxdyLst", default)]
    pub date_entries: Vec<DateEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Administrative-address fields of one disposal object, used for geocoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisposalObject {
    #[serde(rename = "adongSdNm", default)]
    pub city: Option<String>,
    #[serde(rename = "adongSggNm", default)]
    pub district: Option<String>,
    #[serde(rename = "adongEmdNm", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "adongRiNm", default)]
    pub ri: Option<String>,
    #[serde(rename = "rprsLtnoAddr", default)]
    pub lot_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::RawHistoryItem;

    #[test]
    fn goods_seq_accepts_number_or_numeric_string() {
        let from_string: RawHistoryItem =
            serde_json::from_str(r#"{"dspslGdsSeq": "1"}"#).unwrap();
        assert_eq!(from_string.goods_seq, Some(1));

        let from_number: RawHistoryItem =
            serde_json::from_str(r#"{"dspslGdsSeq": 1}"#).unwrap();
        assert_eq!(from_number.goods_seq, Some(1));
    }

    #[test]
    fn non_numeric_goods_seq_coerces_to_none() {
        let item: RawHistoryItem = serde_json::from_str(r#"{"dspslGdsSeq": "abc"}"#).unwrap();
        assert_eq!(item.goods_seq, None);
    }
}
