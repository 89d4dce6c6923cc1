pub mod record;

pub use record::{
    IngredientRecordSet, IngredientRow, ProductIdentifier, EXPORT_HEADERS, SYNONYM_PLACEHOLDER,
    UNKNOWN_PRODUCT,
};
