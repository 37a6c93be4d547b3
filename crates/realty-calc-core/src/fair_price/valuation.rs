use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::factors::AppliedFactors;
use crate::config::{FairPriceAssumptions, Tier};
use crate::error::{RealtyCalcError, ValidationErrors};
use crate::form::{check_amount, FormFields, FormReader};
use crate::types::*;
use crate::RealtyCalcResult;

const DEFAULT_FLOOR: u32 = 5;
const DEFAULT_AGE_YEARS: u32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the fair price estimator. The base price is a recent
/// comparable transaction, in won.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairPriceInput {
    pub apartment_name: String,
    pub area_sqm: Decimal,
    pub recent_transaction_price: Money,
    #[serde(default = "default_floor")]
    pub floor: u32,
    #[serde(default = "default_age")]
    pub age_years: u32,
    #[serde(default)]
    pub location: Tier,
    #[serde(default)]
    pub condition: Tier,
    #[serde(default)]
    pub amenities: Tier,
    #[serde(default)]
    pub transit: Tier,
}

fn default_floor() -> u32 {
    DEFAULT_FLOOR
}

fn default_age() -> u32 {
    DEFAULT_AGE_YEARS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentValue {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl InvestmentValue {
    /// Grade by how far the fair price sits from the market average.
    pub fn from_percent_difference(pct: Percent) -> Self {
        if pct <= dec!(-5) {
            InvestmentValue::Excellent
        } else if pct <= Decimal::ZERO {
            InvestmentValue::Good
        } else if pct <= dec!(5) {
            InvestmentValue::Fair
        } else {
            InvestmentValue::Poor
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            InvestmentValue::Excellent => {
                "Valued below the going rate. Strong buy candidate, consider moving quickly."
            }
            InvestmentValue::Good => {
                "Close to the going rate. Worth buying if negotiation improves the terms."
            }
            InvestmentValue::Fair => {
                "Slightly overvalued but there is room to negotiate. Proceed with care."
            }
            InvestmentValue::Poor => {
                "Valued above the going rate. Looking at other listings is advisable."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketComparison {
    pub average_price: Money,
    pub difference: Money,
    pub percent_difference: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Negotiation {
    pub suggested_offer: Money,
    pub max_offer: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairPriceOutput {
    pub apartment_name: String,
    pub fair_price: Money,
    pub price_range: PriceRange,
    pub price_per_sqm: Money,
    pub price_per_pyeong: Money,
    pub market_comparison: MarketComparison,
    pub investment_value: InvestmentValue,
    pub recommendation: String,
    pub negotiation: Negotiation,
    pub factors: AppliedFactors,
}

// ---------------------------------------------------------------------------
// Input boundary
// ---------------------------------------------------------------------------

impl FairPriceInput {
    /// Read the fair price form: area in ㎡, recent transaction in 만원.
    pub fn from_form(fields: &FormFields) -> Result<Self, ValidationErrors> {
        let mut reader = FormReader::new(fields);

        let apartment_name = reader.required_text("apartment_name", "Apartment name");
        let area_sqm = reader.required_number("area", "Area");
        let recent_transaction_price =
            reader.required_amount("recent_transactions", "Recent transaction price");
        let floor = reader.whole_number("floor", "Floor", DEFAULT_FLOOR);
        let age_years = reader.whole_number("age", "Building age", DEFAULT_AGE_YEARS);
        let location = reader.choice("location", "location grade", Tier::default());
        let condition = reader.choice("condition", "condition grade", Tier::default());
        let amenities = reader.choice("facilities", "facilities grade", Tier::default());
        let transit = reader.choice(
            "transportation_access",
            "transportation grade",
            Tier::default(),
        );

        let input = FairPriceInput {
            apartment_name,
            area_sqm,
            recent_transaction_price,
            floor,
            age_years,
            location,
            condition,
            amenities,
            transit,
        };

        let mut errors = reader.into_errors();
        errors.merge(input.validate());
        errors.into_result(input)
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.apartment_name.trim().is_empty() {
            errors.add("apartment_name", "Enter the apartment name");
        }
        if self.area_sqm <= Decimal::ZERO {
            errors.add("area", "Enter an area greater than 0");
        }
        if self.recent_transaction_price <= Decimal::ZERO {
            errors.add("recent_transactions", "Enter a recent transaction price greater than 0");
        }
        check_amount(
            &mut errors,
            "recent_transactions",
            "Recent transaction price",
            self.recent_transaction_price,
        );

        errors
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub fn compute(fields: &FormFields) -> RealtyCalcResult<ComputationOutput<FairPriceOutput>> {
    compute_with(fields, &FairPriceAssumptions::default())
}

pub fn compute_with(
    fields: &FormFields,
    assumptions: &FairPriceAssumptions,
) -> RealtyCalcResult<ComputationOutput<FairPriceOutput>> {
    let input = FairPriceInput::from_form(fields)?;
    calculate_with(&input, assumptions)
}

pub fn calculate(input: &FairPriceInput) -> RealtyCalcResult<ComputationOutput<FairPriceOutput>> {
    calculate_with(input, &FairPriceAssumptions::default())
}

/// Adjust a comparable transaction by floor, age and qualitative grades.
pub fn calculate_with(
    input: &FairPriceInput,
    assumptions: &FairPriceAssumptions,
) -> RealtyCalcResult<ComputationOutput<FairPriceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate().into_result(())?;

    let factors = AppliedFactors::resolve(
        input.floor,
        input.age_years,
        input.location,
        input.condition,
        input.amenities,
        input.transit,
        assumptions,
    );

    let base = input.recent_transaction_price;
    let fair_price = round_money(base * factors.product());

    let price_range = PriceRange {
        min: round_money(fair_price * (Decimal::ONE - assumptions.range_band)),
        max: round_money(fair_price * (Decimal::ONE + assumptions.range_band)),
    };

    // Per-pyeong is derived from the rounded per-㎡ figure
    let area_too_small = || RealtyCalcError::InvalidInput {
        field: "area".into(),
        reason: format!("price per ㎡ overflows for an area of {}", input.area_sqm),
    };
    let price_per_sqm = round_money(
        fair_price
            .checked_div(input.area_sqm)
            .ok_or_else(area_too_small)?,
    );
    let price_per_pyeong = round_money(
        price_per_sqm
            .checked_mul(assumptions.sqm_per_pyeong)
            .ok_or_else(area_too_small)?,
    );

    let difference = fair_price - base;
    let percent_difference = round_dp(difference / base * dec!(100), 1);
    let investment_value = InvestmentValue::from_percent_difference(percent_difference);

    if input.age_years >= 15 {
        warnings.push(format!(
            "Building age of {} years is past the depreciation floor; age factor held at {}",
            input.age_years, factors.age
        ));
    }

    tracing::debug!(
        apartment = %input.apartment_name,
        fair_price = %fair_price,
        percent_difference = %percent_difference,
        "fair price estimated"
    );

    let output = FairPriceOutput {
        apartment_name: input.apartment_name.clone(),
        fair_price,
        price_range,
        price_per_sqm,
        price_per_pyeong,
        market_comparison: MarketComparison {
            average_price: base,
            difference,
            percent_difference,
        },
        investment_value,
        recommendation: investment_value.recommendation().to_string(),
        negotiation: Negotiation {
            suggested_offer: round_money(fair_price * (Decimal::ONE - assumptions.offer_discount)),
            max_offer: fair_price,
        },
        factors,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Comparable transaction adjusted by multiplicative factors",
        &serde_json::json!({
            "input": input,
            "range_band": assumptions.range_band.to_string(),
            "offer_discount": assumptions.offer_discount.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::form_fields;

    fn neutral(price: Money) -> FairPriceInput {
        FairPriceInput {
            apartment_name: "Raemian".into(),
            area_sqm: dec!(84),
            recent_transaction_price: price,
            floor: 5,
            age_years: 0,
            location: Tier::Average,
            condition: Tier::Average,
            amenities: Tier::Average,
            transit: Tier::Average,
        }
    }

    #[test]
    fn test_neutral_inputs_return_base_price() {
        let out = calculate(&neutral(dec!(800000000))).unwrap().result;
        assert_eq!(out.fair_price, dec!(800000000));
        assert_eq!(out.market_comparison.difference, Decimal::ZERO);
        assert_eq!(out.investment_value, InvestmentValue::Good);
        assert_eq!(out.price_range.min, dec!(760000000));
        assert_eq!(out.price_range.max, dec!(840000000));
        assert_eq!(out.negotiation.suggested_offer, dec!(776000000));
        assert_eq!(out.negotiation.max_offer, dec!(800000000));
    }

    #[test]
    fn test_price_per_area() {
        let out = calculate(&neutral(dec!(840000000))).unwrap().result;
        assert_eq!(out.price_per_sqm, dec!(10000000));
        assert_eq!(out.price_per_pyeong, dec!(33058000));
    }

    #[test]
    fn test_investment_value_thresholds() {
        assert_eq!(
            InvestmentValue::from_percent_difference(dec!(-5)),
            InvestmentValue::Excellent
        );
        assert_eq!(
            InvestmentValue::from_percent_difference(dec!(-4.9)),
            InvestmentValue::Good
        );
        assert_eq!(InvestmentValue::from_percent_difference(dec!(5)), InvestmentValue::Fair);
        assert_eq!(InvestmentValue::from_percent_difference(dec!(5.1)), InvestmentValue::Poor);
    }

    #[test]
    fn test_form_defaults_floor_and_age() {
        let fields = form_fields([
            ("apartment_name", "Raemian"),
            ("area", "84"),
            ("recent_transactions", "80000"),
        ]);
        let input = FairPriceInput::from_form(&fields).unwrap();
        assert_eq!(input.floor, 5);
        assert_eq!(input.age_years, 10);

        // Age 10 knocks 10% off, which reads as undervalued
        let out = calculate(&input).unwrap().result;
        assert_eq!(out.fair_price, dec!(720000000));
        assert_eq!(out.market_comparison.percent_difference, dec!(-10));
        assert_eq!(out.investment_value, InvestmentValue::Excellent);
    }

    #[test]
    fn test_form_requires_name_and_price() {
        let fields = form_fields([("area", "84")]);
        let errors = FairPriceInput::from_form(&fields).unwrap_err();
        assert!(errors.contains("apartment_name"));
        assert!(errors.contains("recent_transactions"));
        assert!(!errors.contains("area"));
    }

    #[test]
    fn test_korean_grade_labels() {
        let fields = form_fields([
            ("apartment_name", "Raemian"),
            ("area", "84"),
            ("recent_transactions", "80000"),
            ("location", "우수"),
            ("facilities", "부족"),
        ]);
        let input = FairPriceInput::from_form(&fields).unwrap();
        assert_eq!(input.location, Tier::Excellent);
        assert_eq!(input.amenities, Tier::Poor);
    }

    #[test]
    fn test_price_above_ceiling_is_a_field_error() {
        match calculate(&neutral(MAX_AMOUNT * dec!(2))) {
            Err(RealtyCalcError::Validation(errors)) => {
                assert!(errors.contains("recent_transactions"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_vanishing_area_errors_instead_of_overflowing() {
        let mut input = neutral(dec!(800000000));
        input.area_sqm = dec!(0.0000000000000000000000001);
        match calculate(&input) {
            Err(RealtyCalcError::InvalidInput { field, .. }) => assert_eq!(field, "area"),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}
