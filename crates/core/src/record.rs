use serde::{Deserialize, Serialize};
use std::fmt;

/// Value used when a document carries no recognizable product identifier.
pub const UNKNOWN_PRODUCT: &str = "UNKNOWN";

/// Placeholder written into the synonym column when the source line had none.
pub const SYNONYM_PLACEHOLDER: &str = "None";

/// Column headers of the exported ingredient sheet, in export order.
pub const EXPORT_HEADERS: [&str; 5] = [
    "2.제품명",
    "3.화학물질명(필수)",
    "4.관용명및이명",
    "5.CAS번호",
    "21.함유량",
];

/// The product identifier of one captured document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductIdentifier(String);

impl ProductIdentifier {
    /// Trims `value`; an empty result resolves to [`UNKNOWN_PRODUCT`].
    pub fn new(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::unknown()
        } else {
            ProductIdentifier(value.to_string())
        }
    }

    pub fn unknown() -> Self {
        ProductIdentifier(UNKNOWN_PRODUCT.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_PRODUCT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProductIdentifier {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for ProductIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of an SDS composition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRow {
    pub substance_name: String,
    pub synonym: String,
    pub cas_number: String,
    pub concentration: String,
}

impl IngredientRow {
    pub fn new(substance_name: &str, synonym: &str, cas_number: &str, concentration: &str) -> Self {
        IngredientRow {
            substance_name: substance_name.to_string(),
            synonym: synonym.to_string(),
            cas_number: cas_number.to_string(),
            concentration: concentration.to_string(),
        }
    }

    /// A row whose synonym cell was missing in the source.
    pub fn without_synonym(substance_name: &str, cas_number: &str, concentration: &str) -> Self {
        Self::new(substance_name, SYNONYM_PLACEHOLDER, cas_number, concentration)
    }

    pub fn fields(&self) -> [&str; 4] {
        [
            &self.substance_name,
            &self.synonym,
            &self.cas_number,
            &self.concentration,
        ]
    }
}

/// Everything extracted from one capture, ready for the sheet writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecordSet {
    pub product: ProductIdentifier,
    pub rows: Vec<IngredientRow>,
}

impl IngredientRecordSet {
    /// Pairs the identifier with the rows as-is: no filtering, no dedup.
    pub fn assemble(product: ProductIdentifier, rows: Vec<IngredientRow>) -> Self {
        IngredientRecordSet { product, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Export rows, each led by the product identifier, aligned with [`EXPORT_HEADERS`].
    pub fn records(&self) -> impl Iterator<Item = [&str; 5]> + '_ {
        let product = self.product.as_str();
        self.rows.iter().map(move |row| {
            let [name, synonym, cas, concentration] = row.fields();
            [product, name, synonym, cas, concentration]
        })
    }
}
