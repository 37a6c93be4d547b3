//! Node bindings for the website calculators. Every function takes the raw
//! form as a JSON object string (field name to value, numbers or text as
//! typed) and returns the result envelope as a JSON string. Rejected input
//! throws with a JSON reason holding a field-to-message map.

use napi::{Result as NapiResult, Status};
use napi_derive::napi;
use realty_calc_core::leads::{self, ORDER_PREFIX, SAMPLE_PREFIX};
use realty_calc_core::{FormFields, RealtyCalcError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Calculator failures carry `{"message", "errors"}` JSON as the reason so the
/// page can mark each field. Input problems are raised as `InvalidArg`.
fn calc_error(e: RealtyCalcError) -> napi::Error {
    let status = match &e {
        RealtyCalcError::Validation(_) | RealtyCalcError::InvalidInput { .. } => {
            Status::InvalidArg
        }
        _ => Status::GenericFailure,
    };
    napi::Error::new(status, e.to_json().to_string())
}

fn parse_form(form_json: &str) -> NapiResult<FormFields> {
    serde_json::from_str(form_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan(form_json: String) -> NapiResult<String> {
    let fields = parse_form(&form_json)?;
    let output = realty_calc_core::loan::compute(&fields).map_err(calc_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_gap(form_json: String) -> NapiResult<String> {
    let fields = parse_form(&form_json)?;
    let output = realty_calc_core::gap::compute(&fields).map_err(calc_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_jeonse_ratio(form_json: String) -> NapiResult<String> {
    let fields = parse_form(&form_json)?;
    let output = realty_calc_core::jeonse::compute(&fields).map_err(calc_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_fair_price(form_json: String) -> NapiResult<String> {
    let fields = parse_form(&form_json)?;
    let output = realty_calc_core::fair_price::compute(&fields).map_err(calc_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_roi(form_json: String) -> NapiResult<String> {
    let fields = parse_form(&form_json)?;
    let output = realty_calc_core::roi::compute(&fields).map_err(calc_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lead references
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_order_reference() -> String {
    leads::generate_reference(
        ORDER_PREFIX,
        chrono::Local::now().naive_local(),
        &mut rand::thread_rng(),
    )
}

#[napi]
pub fn generate_sample_reference() -> String {
    leads::generate_reference(
        SAMPLE_PREFIX,
        chrono::Local::now().naive_local(),
        &mut rand::thread_rng(),
    )
}
