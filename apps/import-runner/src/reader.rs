//! # CSV Row Reader
//!
//! Turns supplier CSV rows into [`ImportRow`] values.
//!
//! ## Expected Columns
//! ```text
//! barcode,name,mrp,discount_amount,discount_percentage,rate,quantity,hsn,tax_percentage
//! 8901234567890,Steel Bottle 1L,999.0,149.0,,,10,7323,18
//! ```
//!
//! Empty cells mean "not given". Header order does not matter; unknown
//! columns are ignored. Cells are parsed as exact decimals.

use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

use purchase_core::{CoreError, ImportRow, Money, Percent, ValidationError};

use crate::error::AppResult;

/// One CSV record before any cell is interpreted.
#[derive(Debug, Deserialize)]
struct RawRow {
    barcode: String,
    #[serde(default)]
    name: Option<String>,
    mrp: String,
    #[serde(default)]
    discount_amount: Option<String>,
    #[serde(default)]
    discount_percentage: Option<String>,
    #[serde(default)]
    rate: Option<String>,
    quantity: String,
    #[serde(default)]
    hsn: Option<String>,
    #[serde(default)]
    tax_percentage: Option<String>,
}

/// Reads every record of a CSV document.
///
/// A malformed record aborts reading; the position in the error is the
/// 1-based data row (the header is not counted).
pub fn read_rows<R: Read>(source: R) -> AppResult<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<RawRow>().enumerate() {
        let raw = record?;
        rows.push(convert(index + 1, raw)?);
    }
    Ok(rows)
}

fn convert(position: usize, raw: RawRow) -> Result<ImportRow, CoreError> {
    let at_row = |reason: ValidationError| CoreError::at_row(position, &raw.barcode, reason);

    let mrp = parse_cell::<Money>("mrp", &raw.mrp).map_err(at_row)?;
    let discount_amount =
        optional_cell::<Money>("discount_amount", &raw.discount_amount).map_err(at_row)?;
    let discount_percentage =
        optional_cell::<Percent>("discount_percentage", &raw.discount_percentage).map_err(at_row)?;
    let rate = optional_cell::<Money>("rate", &raw.rate).map_err(at_row)?;
    let tax_percentage = optional_cell::<Percent>("tax_percentage", &raw.tax_percentage)
        .map_err(at_row)?
        .unwrap_or_default();

    let quantity = raw
        .quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| {
            at_row(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: format!("'{}' is not a whole number", raw.quantity),
            })
        })?;

    Ok(ImportRow {
        barcode: raw.barcode.clone(),
        name: raw.name.clone().unwrap_or_default(),
        mrp,
        discount_amount,
        discount_percentage,
        rate,
        quantity,
        hsn: raw.hsn.clone().unwrap_or_default(),
        tax_percentage,
    })
}

fn parse_cell<T>(field: &str, text: &str) -> Result<T, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    text.parse::<T>().map_err(|e| e.for_field(field))
}

fn optional_cell<T>(field: &str, text: &Option<String>) -> Result<Option<T>, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_cell(field, text).map(Some),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
