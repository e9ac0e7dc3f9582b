//! Controlled-vocabulary mappings and string parsing for the upstream
//! court-auction API, which delivers event kinds, outcomes, prices and
//! timestamps as free-text Korean labels.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Result code recorded when an item was sold ("매각").
pub const RESULT_SOLD: &str = "001";

/// Maps an event-kind label (e.g. "매각기일") to its fixed short code.
/// Unknown labels yield `None`; callers warn and drop the item.
pub fn map_event_kind(label: &str) -> Option<&'static str> {
    match label {
        "매각기일" => Some("01"),
        "매각결정기일" => Some("02"),
        "대금지급기한" => Some("03"),
        "대금지급및 배당기일" => Some("04"),
        "배당기일" => Some("05"),
        "일부배당" => Some("06"),
        "일부배당 및 상계" => Some("07"),
        "심문기일" => Some("08"),
        "추가배당기일" => Some("09"),
        "개찰기일" => Some("11"),
        _ => None,
    }
}

/// Maps an outcome label (e.g. "유찰") to its numeric status code.
pub fn map_result_code(label: &str) -> Option<&'static str> {
    match label {
        "매각준비" => Some("000"),
        "매각" => Some("001"),
        "유찰" => Some("002"),
        "최고가매각허가결정" => Some("003"),
        "차순위매각허가결정" => Some("004"),
        "최고가매각불허가결정" => Some("005"),
        "차순위매각불허가결정" => Some("006"),
        "기한변경" => Some("007"),
        "추후지정" => Some("008"),
        "납부" => Some("009"),
        "미납" => Some("010"),
        "기한후납부" => Some("011"),
        "상계허가" => Some("012"),
        "진행" => Some("013"),
        "변경" => Some("014"),
        "배당종결" => Some("015"),
        "배당불가" => Some("016"),
        "최고가매각허가취소결정" => Some("017"),
        "차순위매각허가취소결정" => Some("018"),
        _ => None,
    }
}

/// Parses the compound date-time format `"YYYY.MM.DD(HH:MM)"` into an
/// 8-digit date string and a 4-digit time string.
pub fn parse_date_time(s: &str) -> Option<(String, String)> {
    let parsed = (|| {
        let (date_part, rest) = s.split_once('(')?;
        let time_part = rest.strip_suffix(')')?;
        let date: String = date_part.split('.').collect();
        let time: String = time_part.split(':').collect();
        let well_formed = date.len() == 8
            && time.len() == 4
            && date.chars().all(|c| c.is_ascii_digit())
            && time.chars().all(|c| c.is_ascii_digit());
        well_formed.then_some((date, time))
    })();

    if parsed.is_none() {
        warn!("date-time parse failed: {s:?}");
    }
    parsed
}

/// Strips thousands separators and the currency suffix from a price string
/// ("187,000,000원" -> 187000000).
pub fn extract_price(s: &str) -> Option<i64> {
    let cleaned = s.replace(',', "").replace('원', "");
    match cleaned.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("price parse failed: {s:?}");
            None
        }
    }
}

// Currency-suffixed numeric run embedded in a sale result label,
// e.g. "매각<br>187,000,000원".
static SALE_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]+)원").expect("hardcoded regex"));

/// Extracts (result code, sale price) from a raw outcome label. The label
/// may carry trailing markup after a `<` delimiter, which is stripped
/// before the lookup; a sale price is only searched for when the label
/// mentions a sale.
pub fn extract_result_info(result_label: &str) -> (Option<&'static str>, Option<i64>) {
    let sale_price = if result_label.contains("매각") {
        SALE_PRICE_RE
            .captures(result_label)
            .and_then(|caps| extract_price(&caps[1]))
    } else {
        None
    };

    let clean = result_label.split('<').next().unwrap_or("");
    let result_code = if clean.is_empty() {
        None
    } else {
        map_result_code(clean)
    };

    (result_code, sale_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_table_is_exact() {
        assert_eq!(map_event_kind("매각기일"), Some("01"));
        assert_eq!(map_event_kind("심문기일"), Some("08"));
        assert_eq!(map_event_kind("개찰기일"), Some("11"));
        assert_eq!(map_event_kind("없는기일"), None);
        assert_eq!(map_event_kind(""), None);
    }

    #[test]
    fn result_code_table_is_exact() {
        assert_eq!(map_result_code("매각"), Some("001"));
        assert_eq!(map_result_code("유찰"), Some("002"));
        assert_eq!(map_result_code("차순위매각허가취소결정"), Some("018"));
        assert_eq!(map_result_code("알수없음"), None);
    }

    #[test]
    fn parses_compound_date_time() {
        assert_eq!(
            parse_date_time("2023.10.31(10:00)"),
            Some(("20231031".to_string(), "1000".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_date_time() {
        assert_eq!(parse_date_time("garbage"), None);
        assert_eq!(parse_date_time("2023.10.31"), None);
        assert_eq!(parse_date_time("2023.10.31(10:00"), None);
        assert_eq!(parse_date_time("yyyy.mm.dd(hh:mm)"), None);
    }

    #[test]
    fn extracts_prices() {
        assert_eq!(extract_price("187,000,000원"), Some(187_000_000));
        assert_eq!(extract_price("0"), Some(0));
        assert_eq!(extract_price("abc"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn sold_label_carries_embedded_price() {
        let (code, price) = extract_result_info("매각<br>187,000,000원");
        assert_eq!(code, Some(RESULT_SOLD));
        assert_eq!(price, Some(187_000_000));
    }

    #[test]
    fn plain_label_has_no_price() {
        let (code, price) = extract_result_info("유찰");
        assert_eq!(code, Some("002"));
        assert_eq!(price, None);
    }

    #[test]
    fn unknown_label_maps_to_none() {
        let (code, price) = extract_result_info("");
        assert_eq!(code, None);
        assert_eq!(price, None);
    }
}
