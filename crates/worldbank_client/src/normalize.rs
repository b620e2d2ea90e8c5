//! Normalization of World Bank response envelopes.
//!
//! Every response is a two-element JSON array `[metadata, data-or-null]`.
//! A missing, null, or empty data element is a designed degraded path and
//! normalizes to an empty result, never an error. Error documents come
//! back as a one-element array, which lands on the same path.

use common::{CountryDirectory, Error, IndicatorRecord, IndicatorTable, Result};
use serde_json::Value;
use tracing::warn;

/// Flatten an indicator response into records.
///
/// Items with a null value are dropped (sparse semantics); items that
/// fail to parse are skipped individually so one bad row never poisons
/// the batch.
pub fn indicator_table(payload: &str) -> Result<IndicatorTable> {
    let doc: Value = serde_json::from_str(payload)?;
    let Some(items) = data_element(&doc)? else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match parse_indicator_item(item) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {} // null value: expected sparsity
            Err(e) => warn!("skipping malformed indicator item: {e}"),
        }
    }
    Ok(records)
}

/// Build a country directory from a country-listing response.
///
/// Entries whose region classification is `Aggregates` are composites
/// (e.g. "Euro area"), not countries, and are excluded. The `BTreeMap`
/// result is sorted by display name.
pub fn country_directory(payload: &str) -> Result<CountryDirectory> {
    let doc: Value = serde_json::from_str(payload)?;
    let Some(items) = data_element(&doc)? else {
        return Ok(CountryDirectory::new());
    };

    let mut directory = CountryDirectory::new();
    for item in items {
        match parse_country_item(item) {
            Ok(Some((name, code))) => {
                directory.insert(name, code);
            }
            Ok(None) => {} // aggregate row
            Err(e) => warn!("skipping malformed country item: {e}"),
        }
    }
    Ok(directory)
}

/// Extract the data element of the envelope.
///
/// `Ok(None)` means the upstream reported no data for these parameters.
fn data_element(doc: &Value) -> Result<Option<&Vec<Value>>> {
    let envelope = doc
        .as_array()
        .ok_or_else(|| Error::Parse("response envelope is not a JSON array".into()))?;

    if envelope.len() < 2 {
        return Ok(None);
    }
    Ok(envelope[1].as_array().filter(|items| !items.is_empty()))
}

fn parse_indicator_item(item: &Value) -> Result<Option<IndicatorRecord>> {
    let raw_value = item.get("value").unwrap_or(&Value::Null);
    if raw_value.is_null() {
        return Ok(None);
    }

    let value = match raw_value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::Parse(format!("value is not numeric: {raw_value}")))?;

    let country = item
        .pointer("/country/value")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("missing country name".into()))?;

    let country_code = item
        .get("countryiso3code")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("missing countryiso3code".into()))?;

    let year = item
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("missing date".into()))?
        .parse::<i32>()
        .map_err(|e| Error::Parse(format!("year is not an integer: {e}")))?;

    Ok(Some(IndicatorRecord {
        country: country.to_string(),
        country_code: country_code.to_string(),
        year,
        value,
    }))
}

fn parse_country_item(item: &Value) -> Result<Option<(String, String)>> {
    let region = item
        .pointer("/region/value")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if region == "Aggregates" {
        return Ok(None);
    }

    let name = item
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("missing country name".into()))?;
    let id = item
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse("missing country id".into()))?;

    Ok(Some((name.to_string(), id.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Life expectancy for USA/IND 2015-2017, IND 2017 null.
    fn life_expectancy_response() -> &'static str {
        r#"[
            {"page":1,"pages":1,"per_page":1000,"total":6},
            [
                {"indicator":{"id":"SP.DYN.LE00.IN","value":"Life expectancy at birth"},
                 "country":{"id":"US","value":"United States"},
                 "countryiso3code":"USA","date":"2017","value":78.5},
                {"indicator":{"id":"SP.DYN.LE00.IN","value":"Life expectancy at birth"},
                 "country":{"id":"US","value":"United States"},
                 "countryiso3code":"USA","date":"2016","value":78.8},
                {"indicator":{"id":"SP.DYN.LE00.IN","value":"Life expectancy at birth"},
                 "country":{"id":"US","value":"United States"},
                 "countryiso3code":"USA","date":"2015","value":79.0},
                {"indicator":{"id":"SP.DYN.LE00.IN","value":"Life expectancy at birth"},
                 "country":{"id":"IN","value":"India"},
                 "countryiso3code":"IND","date":"2017","value":null},
                {"indicator":{"id":"SP.DYN.LE00.IN","value":"Life expectancy at birth"},
                 "country":{"id":"IN","value":"India"},
                 "countryiso3code":"IND","date":"2016","value":68.3},
                {"indicator":{"id":"SP.DYN.LE00.IN","value":"Life expectancy at birth"},
                 "country":{"id":"IN","value":"India"},
                 "countryiso3code":"IND","date":"2015","value":68.0}
            ]
        ]"#
    }

    fn country_list_response() -> &'static str {
        r#"[
            {"page":1,"pages":1,"per_page":300,"total":4},
            [
                {"id":"USA","iso2Code":"US","name":"United States",
                 "region":{"id":"NAC","iso2code":"XU","value":"North America"},
                 "incomeLevel":{"id":"HIC","value":"High income"}},
                {"id":"IND","iso2Code":"IN","name":"India",
                 "region":{"id":"SAS","iso2code":"8S","value":"South Asia"},
                 "incomeLevel":{"id":"LMC","value":"Lower middle income"}},
                {"id":"EMU","iso2Code":"XC","name":"Euro area",
                 "region":{"id":"NA","iso2code":"NA","value":"Aggregates"},
                 "incomeLevel":{"id":"NA","value":"Aggregates"}},
                {"id":"BRA","iso2Code":"BR","name":"Brazil",
                 "region":{"id":"LCN","iso2code":"ZJ","value":"Latin America & Caribbean"},
                 "incomeLevel":{"id":"UMC","value":"Upper middle income"}}
            ]
        ]"#
    }

    #[test]
    fn test_indicator_table_drops_null_values() {
        let table = indicator_table(life_expectancy_response()).expect("valid envelope");

        assert_eq!(table.len(), 5);
        assert!(!table
            .iter()
            .any(|r| r.country_code == "IND" && r.year == 2017));

        let usa_2016 = table
            .iter()
            .find(|r| r.country_code == "USA" && r.year == 2016)
            .expect("USA 2016 present");
        assert_eq!(usa_2016.country, "United States");
        assert!((usa_2016.value - 78.8).abs() < 1e-9);
    }

    #[test]
    fn test_indicator_table_null_data_element() {
        let payload = r#"[{"page":1,"pages":0,"per_page":1000,"total":0},null]"#;
        let table = indicator_table(payload).expect("degraded path is not an error");
        assert!(table.is_empty());
    }

    #[test]
    fn test_indicator_table_empty_data_element() {
        let payload = r#"[{"page":1,"pages":0,"per_page":1000,"total":0},[]]"#;
        let table = indicator_table(payload).expect("degraded path is not an error");
        assert!(table.is_empty());
    }

    #[test]
    fn test_indicator_table_error_document() {
        // Invalid requests come back as a one-element array.
        let payload = r#"[{"message":[{"id":"120","key":"Invalid value"}]}]"#;
        let table = indicator_table(payload).expect("degraded path is not an error");
        assert!(table.is_empty());
    }

    #[test]
    fn test_indicator_table_skips_malformed_item() {
        let payload = r#"[
            {"page":1,"pages":1,"per_page":1000,"total":2},
            [
                {"country":{"id":"US","value":"United States"},
                 "countryiso3code":"USA","date":"not-a-year","value":78.5},
                {"country":{"id":"US","value":"United States"},
                 "countryiso3code":"USA","date":"2016","value":78.8}
            ]
        ]"#;

        let table = indicator_table(payload).expect("batch survives one bad item");
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].year, 2016);
    }

    #[test]
    fn test_indicator_table_rejects_non_array_envelope() {
        let err = indicator_table(r#"{"message":"nope"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_country_directory_excludes_aggregates_and_sorts() {
        let directory = country_directory(country_list_response()).expect("valid envelope");

        assert_eq!(directory.len(), 3);
        assert!(!directory.contains_key("Euro area"));
        assert_eq!(directory.get("India").map(String::as_str), Some("IND"));

        let names: Vec<&String> = directory.keys().collect();
        assert_eq!(names, vec!["Brazil", "India", "United States"]);
    }

    #[test]
    fn test_country_directory_null_data_element() {
        let payload = r#"[{"page":1,"pages":0,"per_page":300,"total":0},null]"#;
        let directory = country_directory(payload).expect("degraded path is not an error");
        assert!(directory.is_empty());
    }
}
