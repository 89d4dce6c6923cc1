use msds_core::{IngredientRecordSet, EXPORT_HEADERS};
use std::io::Write;

use crate::ExportError;

/// UTF-8 byte-order mark. Spreadsheet applications use it to detect the
/// encoding of the Korean header row.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvSheetWriter {
    pub with_bom: bool,
}

impl Default for CsvSheetWriter {
    fn default() -> Self {
        Self { with_bom: true }
    }
}

impl CsvSheetWriter {
    /// Header row followed by one record per ingredient row.
    pub fn write<W: Write>(&self, mut out: W, set: &IngredientRecordSet) -> Result<(), ExportError> {
        if self.with_bom {
            out.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        writer.write_record(EXPORT_HEADERS)?;
        for record in set.records() {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
