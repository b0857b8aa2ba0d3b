//! CSV export fetcher.
//!
//! Downloads a CSV file with one quarter per row, then maps columns onto
//! the canonical property keys through the source's field mapping. Cell
//! values stay strings in the property bag; the pipeline enricher owns
//! all numeric coercion.

use quarter_map_pipeline::RawRecord;
use quarter_map_source_models::QuarterFieldMapping;

use crate::{SourceError, retry};

/// Fetches and parses all quarter records from a CSV URL.
///
/// # Errors
///
/// Returns [`SourceError`] if the download or CSV parsing fails.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    delimiter: Option<char>,
    fields: &QuarterFieldMapping,
) -> Result<Vec<RawRecord>, SourceError> {
    let body = retry::send_text(|| client.get(url)).await?;
    log::debug!("Downloaded {} bytes from {url}", body.len());

    let records = records_from_csv(&body, delimiter, fields)?;
    log::info!("Parsed {} records from CSV at {url}", records.len());

    Ok(records)
}

/// Parses CSV text into raw records using the field mapping.
///
/// Rows shorter than the header are tolerated (`flexible`); missing
/// cells simply leave their canonical key out of the bag.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row is unreadable or a
/// row is malformed beyond what flexible parsing tolerates, and
/// [`SourceError::Conversion`] if the mapped id or coordinates column
/// is absent from the header.
pub fn records_from_csv(
    body: &str,
    delimiter: Option<char>,
    fields: &QuarterFieldMapping,
) -> Result<Vec<RawRecord>, SourceError> {
    let delimiter = delimiter.map_or(b',', |c| u8::try_from(c).unwrap_or(b','));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let id_idx = column_index(&headers, &fields.id).ok_or_else(|| SourceError::Conversion {
        message: format!("CSV is missing the id column '{}'", fields.id),
    })?;

    let coords_idx = match &fields.coordinates {
        Some(column) => {
            Some(
                column_index(&headers, column).ok_or_else(|| SourceError::Conversion {
                    message: format!("CSV is missing the coordinates column '{column}'"),
                })?,
            )
        }
        None => None,
    };

    let property_indices: Vec<(&str, usize)> = fields
        .properties
        .iter()
        .filter_map(|(canonical, column)| {
            column_index(&headers, column).map(|idx| (canonical.as_str(), idx))
        })
        .collect();

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;

        let id = row.get(id_idx).unwrap_or("").trim().to_owned();
        let coordinates = coords_idx
            .and_then(|idx| row.get(idx))
            .unwrap_or("")
            .trim()
            .to_owned();

        let mut properties = serde_json::Map::new();
        for &(canonical, idx) in &property_indices {
            if let Some(value) = row.get(idx) {
                let value = value.trim();
                if !value.is_empty() {
                    properties.insert(
                        canonical.to_owned(),
                        serde_json::Value::String(value.to_owned()),
                    );
                }
            }
        }

        records.push(RawRecord::from_text(id, coordinates, properties));
    }

    Ok(records)
}

/// Finds a column's position in the header row.
fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mapping() -> QuarterFieldMapping {
        QuarterFieldMapping {
            id: "id".to_owned(),
            coordinates: Some("boundary".to_owned()),
            properties: BTreeMap::from([
                ("name".to_owned(), "title".to_owned()),
                ("population".to_owned(), "pop".to_owned()),
            ]),
        }
    }

    #[test]
    fn maps_columns_onto_canonical_keys() {
        let body = "id,title,boundary,pop\n7,Old Town,\"1,2;3,4;5,6\",1200\n";
        let records = records_from_csv(body, None, &mapping()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "7");
        assert_eq!(
            records[0].properties.get("name").and_then(|v| v.as_str()),
            Some("Old Town")
        );
        assert_eq!(
            records[0].properties.get("population").and_then(|v| v.as_str()),
            Some("1200")
        );
    }

    #[test]
    fn empty_cells_stay_out_of_the_bag() {
        let body = "id,title,boundary,pop\n7,,\"1,2;3,4\",\n";
        let records = records_from_csv(body, None, &mapping()).unwrap();
        assert!(records[0].properties.get("name").is_none());
        assert!(records[0].properties.get("population").is_none());
    }

    #[test]
    fn missing_id_column_is_an_error() {
        let body = "key,boundary\n7,\"1,2\"\n";
        let result = records_from_csv(body, None, &mapping());
        assert!(matches!(result, Err(SourceError::Conversion { .. })));
    }

    #[test]
    fn unmapped_columns_are_ignored() {
        let body = "id,title,boundary,pop,osm_server\n7,X,\"1,2\",5,node-3\n";
        let records = records_from_csv(body, None, &mapping()).unwrap();
        assert!(records[0].properties.get("osm_server").is_none());
    }

    #[test]
    fn supports_alternate_delimiters() {
        let body = "id;title;boundary;pop\n7;Old Town;1,2 3,4;900\n";
        let mut fields = mapping();
        fields.coordinates = Some("boundary".to_owned());
        let records = records_from_csv(body, Some(';'), &fields).unwrap();
        assert_eq!(records[0].id, "7");
    }
}
