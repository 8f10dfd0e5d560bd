pub mod alert;
pub mod drug;
pub mod enums;
pub mod interaction;
pub mod patient;
pub mod prescription;

pub use alert::*;
pub use drug::*;
pub use interaction::*;
pub use patient::*;
pub use prescription::*;

/// Canonical form for ingredient names, allergy families and condition codes.
pub fn normalize_code(value: &str) -> String {
    value.trim().to_lowercase()
}
