pub mod enums;
pub mod formula;
pub mod herb;
pub mod input;

pub use enums::{MatchPosition, Role, ThermalNature};
pub use formula::FormulaPattern;
pub use herb::{DosageRangeStatus, HerbProperties, HerbRecord};
pub use input::{HerbInput, RawDosage};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
