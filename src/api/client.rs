use crate::api::error::FetchError;
use crate::api::models::{
    ApiEnvelope, DetailData, DetailQuery, DetailRequest, DetailResult, HistoryData, HistoryQuery,
    HistoryRequest, ListData, ListRequest, ListSearchInfo, PageInfo, RawHistoryItem, StudyQuery,
    StudyRequest,
};
use crate::api::HistorySource;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

const LIST_URL: &str = "https://www.courtauction.go.kr/pgj/pgjsearch/searchControllerMain.on";
const DETAIL_URL: &str = "https://www.courtauction.go.kr/pgj/pgj15B/selectAuctnCsSrchRslt.on";
const HISTORY_URL: &str = "https://www.courtauction.go.kr/pgj/pgj15A/selectCsDtlDxdyDts.on";
const STUDY_URL: &str = "https://www.courtauction.go.kr/pgj/pgj15B/selectCurstExmndc.on";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        ORIGIN,
        HeaderValue::from_static("https://www.courtauction.go.kr"),
    );
    headers.insert(
        REFERER,
        HeaderValue::from_static(
            "https://www.courtauction.go.kr/pgj/index.on?w2xPath=/pgj/ui/pgj100/PGJ151F00.xml",
        ),
    );
    headers.insert("SC-Userid", HeaderValue::from_static("NONUSER"));
    headers
}

/// Blocking client for the court-auction JSON API.
pub struct CourtAuctionClient {
    client: Client,
}

impl CourtAuctionClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// POSTs a typed request body and unwraps the `{status, data, message}`
    /// envelope; a non-200 envelope status is an upstream failure.
    fn post_envelope<B, T>(&self, url: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize,
        T: DeserializeOwned + Default,
    {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let http_status = resp.status();
        if !http_status.is_success() {
            return Err(FetchError::Network(format!("HTTP {http_status} from {url}")));
        }

        let envelope: ApiEnvelope<T> = resp
            .json()
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        if envelope.status != 200 {
            return Err(FetchError::Upstream {
                status: envelope.status,
                message: envelope.message,
            });
        }

        Ok(envelope.data.unwrap_or_default())
    }

    /// One page of the listing search for a bid-date window.
    pub fn fetch_list_page(
        &self,
        search_condition_code: &str,
        bid_begin_date: &str,
        bid_end_date: &str,
        page_no: u32,
        page_size: u32,
    ) -> Result<ListData, FetchError> {
        let request = ListRequest {
            page: PageInfo {
                page_no,
                page_size,
                total_yn: "Y",
            },
            search: ListSearchInfo {
                bid_division_code: "000331",
                search_condition_code,
                bid_begin_date,
                bid_end_date,
                court_st_division: "1",
                stat_num: 1,
            },
        };
        self.post_envelope(LIST_URL, &request)
    }

    /// The full detail document for one auction item, or `None` when the
    /// upstream has no data for the key.
    pub fn fetch_detail(
        &self,
        case_no: &str,
        goods_seq: i64,
        court_code: &str,
    ) -> Result<Option<DetailResult>, FetchError> {
        let request = DetailRequest {
            query: DetailQuery {
                case_no,
                court_code,
                goods_seq,
                program_id: "PGJ151F01",
            },
        };
        let data: DetailData = self.post_envelope(DETAIL_URL, &request)?;
        Ok(data.result)
    }

    /// The on-site survey report document for a case, or `None` when the
    /// upstream has no data. The document is free-form and stored verbatim.
    pub fn fetch_study(
        &self,
        case_no: &str,
        court_code: &str,
    ) -> Result<Option<serde_json::Map<String, serde_json::Value>>, FetchError> {
        let request = StudyRequest {
            query: StudyQuery {
                court_code,
                case_no,
                origin_division_code: "2",
                ord_ts_count: None,
            },
        };
        let data: serde_json::Map<String, serde_json::Value> =
            self.post_envelope(STUDY_URL, &request)?;
        Ok(if data.is_empty() { None } else { Some(data) })
    }
}

impl HistorySource for CourtAuctionClient {
    fn fetch_history(
        &self,
        court_code: &str,
        case_no: &str,
    ) -> Result<Vec<RawHistoryItem>, FetchError> {
        let request = HistoryRequest {
            query: HistoryQuery {
                court_code,
                case_no,
            },
        };
        match self.post_envelope::<_, HistoryData>(HISTORY_URL, &request) {
            Ok(data) => {
                info!(
                    "history fetched: case {case_no}, court {court_code}, {} items",
                    data.items.len()
                );
                Ok(data.items)
            }
            Err(e) => {
                if let FetchError::Upstream { message, .. } = &e {
                    warn!(
                        "history lookup rejected: case {case_no}, court {court_code}, message: {}",
                        message.as_deref().unwrap_or("<none>")
                    );
                }
                Err(e)
            }
        }
    }
}
