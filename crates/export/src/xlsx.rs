use msds_core::{IngredientRecordSet, EXPORT_HEADERS};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;

use crate::ExportError;

/// Name of the single worksheet in every exported workbook.
pub const SHEET_NAME: &str = "Sheet1";

/// Writes the sheet as an Excel workbook: bold header row, then one row per record.
#[derive(Debug, Default)]
pub struct XlsxSheetWriter;

impl XlsxSheetWriter {
    pub fn to_bytes(&self, set: &IngredientRecordSet) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in (0u16..).zip(EXPORT_HEADERS) {
            worksheet.write_string_with_format(0, col, title, &header)?;
        }
        for (row, record) in (1u32..).zip(set.records()) {
            for (col, value) in (0u16..).zip(record) {
                worksheet.write_string(row, col, value)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    pub fn write<W: Write>(&self, mut out: W, set: &IngredientRecordSet) -> Result<(), ExportError> {
        out.write_all(&self.to_bytes(set)?)?;
        Ok(())
    }
}
