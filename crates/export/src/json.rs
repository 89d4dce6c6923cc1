use msds_core::{IngredientRecordSet, EXPORT_HEADERS};
use serde::Serialize;
use std::io::Write;

use crate::ExportError;

/// The sheet as JSON: the header row, the product, and the prefixed records.
#[derive(Debug, Serialize)]
pub struct SheetDocument<'a> {
    pub headers: [&'a str; 5],
    pub product: &'a str,
    pub rows: Vec<[&'a str; 5]>,
}

impl<'a> SheetDocument<'a> {
    pub fn from_records(set: &'a IngredientRecordSet) -> Self {
        SheetDocument {
            headers: EXPORT_HEADERS,
            product: set.product.as_str(),
            rows: set.records().collect(),
        }
    }
}

pub fn write_json<W: Write>(mut out: W, set: &IngredientRecordSet) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, &SheetDocument::from_records(set))?;
    out.write_all(b"\n")?;
    Ok(())
}
