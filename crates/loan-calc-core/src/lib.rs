pub mod error;
pub mod loans;
pub mod rounding;
pub mod types;
pub mod validation;

pub use error::LoanCalcError;
pub use loans::{
    calculate_product, quote, quote_input, validate_product, LoanBreakdown, LoanModel,
    LoanProduct, ProductInfo,
};
pub use rounding::round_to_nearest_ten;
pub use types::*;
pub use validation::{FieldError, ValidationErrorKind, ValidationResult};

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
