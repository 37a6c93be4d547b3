use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values, in whole-won base units. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.045 = 4.5%). Never as percentages.
pub type Rate = Decimal;

/// Values already expressed in percentage points (60.0 = 60%).
pub type Percent = Decimal;

/// Won per 만원 (man-won), the unit every price field on the forms uses.
pub const WON_PER_MAN_WON: Decimal = dec!(10000);

/// Largest amount any calculator accepts (1,000조원). Keeps every projection
/// inside the 96-bit Decimal range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Three-tier risk classification shared by the jeonse and ROI tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Convert a 만원 amount to won, `None` when the result does not fit.
pub fn man_won(value: Decimal) -> Option<Money> {
    value.checked_mul(WON_PER_MAN_WON)
}

/// Round to `dp` decimal places, ties away from zero.
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a money amount to the nearest whole won.
pub fn round_money(value: Money) -> Money {
    round_dp(value, 0)
}

/// Express a fraction as percentage points.
pub fn to_percent(rate: Rate) -> Percent {
    rate * Decimal::ONE_HUNDRED
}
