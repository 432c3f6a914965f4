//! Tenant record extraction from CSV

use crate::error::NoticeError;
use serde::Deserialize;
use std::io::Read;

/// Columns the uploaded table must carry. Cell contents are not validated;
/// `money` in particular may be any string.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "tenant",
    "full_adress",
    "address_1",
    "address_2",
    "money",
    "county",
    "zip",
];

/// One row of the uploaded table, projected to the fields the notice needs.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantRecord {
    pub tenant: String,
    // The source data and the PDF template both spell this column
    // "full_adress"; keep the wire name.
    #[serde(rename = "full_adress")]
    pub full_address: String,
    pub address_1: String,
    pub address_2: String,
    pub money: String,
    pub county: String,
    pub zip: String,
}

/// Read all tenant records from a CSV stream, in source row order.
///
/// Fails with `Schema` if any required column is absent. Extra columns are
/// ignored.
pub fn extract_records<R: Read>(reader: R) -> Result<Vec<TenantRecord>, NoticeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| NoticeError::Schema(format!("unreadable header row: {}", e)))?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(NoticeError::Schema(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for record in csv_reader.deserialize::<TenantRecord>() {
        records.push(record.map_err(|e| NoticeError::Schema(e.to_string()))?);
    }

    Ok(records)
}
