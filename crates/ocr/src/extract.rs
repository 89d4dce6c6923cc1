use std::sync::OnceLock;

use msds_core::{IngredientRecordSet, IngredientRow, ProductIdentifier};
use regex::Regex;

use crate::types::RawDocumentText;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Label, then lazily up to the first colon on the same line. `\s*` may cross
// a line break, so a value printed under its label is still picked up.
re!(re_product_identifier, r"Product identifier.*?:\s*(.*)");

// CAS registry number anywhere in the line. The only admission test for a row.
re!(re_cas_number, r"\d{2,5}-\d{2}-\d");

// Column break: two or more whitespace characters, or any run of tabs.
re!(re_column_break, r"\s{2,}|\t+");

// ── Public extraction API ─────────────────────────────────────────────────────

pub struct Extractor;

impl Extractor {
    /// Extract the product identifier and ingredient rows from recognized text.
    pub fn extract(text: &RawDocumentText) -> IngredientRecordSet {
        IngredientRecordSet::assemble(
            Self::product_identifier(text),
            Self::ingredient_rows(text),
        )
    }

    /// First `Product identifier … : value` in the text, or `UNKNOWN`.
    /// The label is matched literally and case-sensitively.
    pub fn product_identifier(text: &RawDocumentText) -> ProductIdentifier {
        re_product_identifier()
            .captures(text.as_str())
            .and_then(|c| c.get(1))
            .map(|m| ProductIdentifier::new(m.as_str()))
            .unwrap_or_default()
    }

    /// Every CAS-bearing line that splits into at least three columns, in
    /// document order. Lines that do not fit are skipped without error.
    pub fn ingredient_rows(text: &RawDocumentText) -> Vec<IngredientRow> {
        text.lines()
            .filter(|line| re_cas_number().is_match(line))
            .filter_map(parse_ingredient_line)
            .collect()
    }
}

/// Split an admitted line into columns and coerce it to the four-field shape.
///
/// Four or more columns map positionally and the rest are dropped. Exactly
/// three are read as name, CAS, concentration with the synonym cell lost.
/// Fewer cannot fill a row.
fn parse_ingredient_line(line: &str) -> Option<IngredientRow> {
    let parts: Vec<&str> = re_column_break().split(line.trim()).collect();
    match parts.as_slice() {
        [name, synonym, cas, concentration, ..] => {
            Some(IngredientRow::new(name, synonym, cas, concentration))
        }
        [name, cas, concentration] => Some(IngredientRow::without_synonym(name, cas, concentration)),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
