pub mod csv;
pub mod json;
pub mod xlsx;

use msds_core::IngredientRecordSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub use crate::csv::CsvSheetWriter;
pub use crate::json::{write_json, SheetDocument};
pub use crate::xlsx::XlsxSheetWriter;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Excel workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl SheetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SheetFormat::Xlsx => "xlsx",
            SheetFormat::Csv => "csv",
            SheetFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for SheetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(SheetFormat::Xlsx),
            "csv" => Ok(SheetFormat::Csv),
            "json" => Ok(SheetFormat::Json),
            other => Err(format!("Unknown sheet format: '{other}'")),
        }
    }
}

/// Serialize `set` in `format` to any writer.
pub fn write_sheet<W: Write>(
    out: W,
    set: &IngredientRecordSet,
    format: SheetFormat,
) -> Result<(), ExportError> {
    match format {
        SheetFormat::Xlsx => XlsxSheetWriter.write(out, set),
        SheetFormat::Csv => CsvSheetWriter::default().write(out, set),
        SheetFormat::Json => write_json(out, set),
    }
}

/// Write `set` to `path`, creating parent directories. Overwrites an existing file.
pub fn export_to_path(
    set: &IngredientRecordSet,
    path: &Path,
    format: SheetFormat,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_sheet(&mut out, set, format)?;
    out.flush()?;
    tracing::info!(path = %path.display(), %format, rows = set.len(), "sheet written");
    Ok(())
}
