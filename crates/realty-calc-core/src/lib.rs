pub mod config;
pub mod error;
pub mod form;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "gap")]
pub mod gap;

#[cfg(feature = "jeonse")]
pub mod jeonse;

#[cfg(feature = "fair_price")]
pub mod fair_price;

#[cfg(feature = "roi")]
pub mod roi;

#[cfg(feature = "leads")]
pub mod leads;

pub use config::CalculatorConfig;
pub use error::{RealtyCalcError, ValidationErrors};
pub use form::{FieldValue, FormFields};
pub use types::*;

/// Standard result type for all realty-calc operations
pub type RealtyCalcResult<T> = Result<T, RealtyCalcError>;
