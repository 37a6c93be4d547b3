use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::safety::{market_risk, risk_level, safety_score};
use crate::config::{JeonseAssumptions, Region};
use crate::error::ValidationErrors;
use crate::form::{check_amount, FormFields, FormReader};
use crate::types::*;
use crate::RealtyCalcResult;

/// Offsets applied to the current ratio for the forward-looking scenarios
const CONSERVATIVE_OFFSET: Percent = dec!(5);
const OPTIMISTIC_OFFSET: Percent = dec!(-3);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the jeonse ratio calculator. Amounts in won.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JeonseInput {
    pub purchase_price: Money,
    pub deposit_price: Money,
    /// Optional monthly rent for a semi-jeonse (반전세) contract
    #[serde(default)]
    pub monthly_rent: Money,
    #[serde(default)]
    pub region: Region,
    #[serde(default = "default_building_age")]
    pub building_age_years: Decimal,
    #[serde(default = "default_area")]
    pub area_sqm: Decimal,
}

fn default_building_age() -> Decimal {
    JeonseAssumptions::default().default_building_age_years
}

fn default_area() -> Decimal {
    JeonseAssumptions::default().default_area_sqm
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalComparison {
    pub region: Region,
    pub regional: Percent,
    pub nationwide: Percent,
    /// Ratio minus the regional average
    pub difference: Percent,
}

/// Ratio under simple forward-looking shifts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioScenarios {
    pub conservative: Percent,
    pub realistic: Percent,
    pub optimistic: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JeonseOutput {
    pub jeonse_ratio: Percent,
    pub risk_level: RiskLevel,
    pub recommendation: String,

    pub annual_rent: Money,
    pub rental_yield: Percent,
    pub deposit_yield: Percent,

    /// Cash a buyer must put in on top of the deposit
    pub gap_investment_amount: Money,
    pub gap_ratio: Percent,

    pub comparison: RegionalComparison,

    pub safety_score: u32,
    pub market_risk: RiskLevel,

    pub scenarios: RatioScenarios,
}

// ---------------------------------------------------------------------------
// Input boundary
// ---------------------------------------------------------------------------

impl JeonseInput {
    /// Read the jeonse form: prices in 만원, area in ㎡.
    pub fn from_form(fields: &FormFields) -> Result<Self, ValidationErrors> {
        Self::from_form_with(fields, &JeonseAssumptions::default())
    }

    pub fn from_form_with(
        fields: &FormFields,
        assumptions: &JeonseAssumptions,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FormReader::new(fields);

        let purchase_price = reader.required_amount("purchase_price", "Purchase price");
        let deposit_price = reader.required_amount("jeonse_price", "Jeonse price");
        let monthly_rent = reader.optional_amount("monthly_rent_price", "Monthly rent");
        let region = reader.choice("region", "region", Region::default());
        let building_age_years = reader.optional_number(
            "building_age",
            "Building age",
            assumptions.default_building_age_years,
        );
        let area_sqm = reader.optional_number("area", "Area", assumptions.default_area_sqm);

        let input = JeonseInput {
            purchase_price,
            deposit_price,
            monthly_rent,
            region,
            building_age_years,
            area_sqm,
        };

        let mut errors = reader.into_errors();
        errors.merge(input.validate());
        errors.into_result(input)
    }

    /// Range and consistency checks, keyed by form field name.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.purchase_price <= Decimal::ZERO {
            errors.add("purchase_price", "Enter a purchase price greater than 0");
        }
        if self.deposit_price <= Decimal::ZERO {
            errors.add("jeonse_price", "Enter a jeonse price greater than 0");
        } else if self.deposit_price >= self.purchase_price {
            errors.add("jeonse_price", "Jeonse price must be below the purchase price");
        }
        if self.monthly_rent < Decimal::ZERO {
            errors.add("monthly_rent_price", "Monthly rent cannot be negative");
        }
        if self.building_age_years < Decimal::ZERO {
            errors.add("building_age", "Building age cannot be negative");
        }
        if self.area_sqm <= Decimal::ZERO {
            errors.add("area", "Area must be greater than 0");
        }
        check_amount(&mut errors, "purchase_price", "Purchase price", self.purchase_price);
        check_amount(&mut errors, "jeonse_price", "Jeonse price", self.deposit_price);
        check_amount(&mut errors, "monthly_rent_price", "Monthly rent", self.monthly_rent);

        errors
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub fn compute(fields: &FormFields) -> RealtyCalcResult<ComputationOutput<JeonseOutput>> {
    compute_with(fields, &JeonseAssumptions::default())
}

pub fn compute_with(
    fields: &FormFields,
    assumptions: &JeonseAssumptions,
) -> RealtyCalcResult<ComputationOutput<JeonseOutput>> {
    let input = JeonseInput::from_form_with(fields, assumptions)?;
    calculate_with(&input, assumptions)
}

pub fn calculate(input: &JeonseInput) -> RealtyCalcResult<ComputationOutput<JeonseOutput>> {
    calculate_with(input, &JeonseAssumptions::default())
}

/// Jeonse ratio, safety score and regional comparison for one unit.
pub fn calculate_with(
    input: &JeonseInput,
    assumptions: &JeonseAssumptions,
) -> RealtyCalcResult<ComputationOutput<JeonseOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate().into_result(())?;

    let price = input.purchase_price;
    let ratio = round_dp(input.deposit_price / price * dec!(100), 1);

    let gap_investment_amount = price - input.deposit_price;
    let gap_ratio = round_dp(gap_investment_amount / price * dec!(100), 1);

    let annual_rent = input.monthly_rent * dec!(12);
    let rental_yield = round_dp(annual_rent / price * dec!(100), 2);

    let score = safety_score(ratio, input.building_age_years, input.area_sqm);
    let (level, recommendation) = risk_level(ratio, score);

    let regional = match assumptions.regional_averages.get(&input.region) {
        Some(avg) => *avg,
        None => {
            warnings.push(format!(
                "No regional average configured for {}; using the nationwide average",
                input.region
            ));
            tracing::warn!(region = %input.region, "regional average missing");
            assumptions.nationwide_average
        }
    };

    let comparison = RegionalComparison {
        region: input.region,
        regional,
        nationwide: assumptions.nationwide_average,
        difference: round_dp(ratio - regional, 1),
    };

    let scenarios = RatioScenarios {
        conservative: round_dp(ratio + CONSERVATIVE_OFFSET, 1),
        realistic: ratio,
        optimistic: round_dp(ratio + OPTIMISTIC_OFFSET, 1),
    };

    tracing::debug!(ratio = %ratio, safety_score = score, "jeonse ratio calculated");

    let output = JeonseOutput {
        jeonse_ratio: ratio,
        risk_level: level,
        recommendation: recommendation.to_string(),
        annual_rent: round_money(annual_rent),
        rental_yield,
        deposit_yield: assumptions.deposit_yield,
        gap_investment_amount: round_money(gap_investment_amount),
        gap_ratio,
        comparison,
        safety_score: score,
        market_risk: market_risk(score),
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Jeonse ratio and safety scoring",
        &serde_json::json!({
            "input": input,
            "regional_average": regional.to_string(),
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

    fn input(purchase: Decimal, deposit: Decimal) -> JeonseInput {
        JeonseInput {
            purchase_price: purchase,
            deposit_price: deposit,
            monthly_rent: Decimal::ZERO,
            region: Region::Seoul,
            building_age_years: dec!(10),
            area_sqm: dec!(84),
        }
    }

    #[test]
    fn test_ratio_rounded_to_one_decimal() {
        let out = calculate(&input(dec!(300000000), dec!(200000000))).unwrap().result;
        assert_eq!(out.jeonse_ratio, dec!(66.7));
        assert_eq!(out.gap_ratio, dec!(33.3));
        assert_eq!(out.gap_investment_amount, dec!(100000000));
    }

    #[test]
    fn test_regional_difference() {
        let mut i = input(dec!(500000000), dec!(350000000));
        i.region = Region::Busan;
        let out = calculate(&i).unwrap().result;
        assert_eq!(out.jeonse_ratio, dec!(70));
        assert_eq!(out.comparison.regional, dec!(75));
        assert_eq!(out.comparison.difference, dec!(-5));
        assert_eq!(out.comparison.nationwide, dec!(72));
    }

    #[test]
    fn test_scenarios_offset_ratio() {
        let out = calculate(&input(dec!(500000000), dec!(350000000))).unwrap().result;
        assert_eq!(out.scenarios.conservative, dec!(75));
        assert_eq!(out.scenarios.realistic, dec!(70));
        assert_eq!(out.scenarios.optimistic, dec!(67));
    }

    #[test]
    fn test_rental_yield() {
        let mut i = input(dec!(500000000), dec!(300000000));
        i.monthly_rent = dec!(500000);
        let out = calculate(&i).unwrap().result;
        assert_eq!(out.annual_rent, dec!(6000000));
        assert_eq!(out.rental_yield, dec!(1.2));
        assert_eq!(out.deposit_yield, dec!(4.0));
    }

    #[test]
    fn test_missing_region_average_falls_back() {
        let mut assumptions = JeonseAssumptions::default();
        assumptions.regional_averages.remove(&Region::Ulsan);
        let mut i = input(dec!(500000000), dec!(300000000));
        i.region = Region::Ulsan;
        let out = calculate_with(&i, &assumptions).unwrap();
        assert_eq!(out.result.comparison.regional, dec!(72));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_form_defaults_age_and_area() {
        let fields = form_fields([
            ("purchase_price", "50000"),
            ("jeonse_price", "30000"),
            ("region", "gyeonggi"),
        ]);
        let i = JeonseInput::from_form(&fields).unwrap();
        assert_eq!(i.building_age_years, dec!(10));
        assert_eq!(i.area_sqm, dec!(84));
        assert_eq!(i.region, Region::Gyeonggi);
    }

    #[test]
    fn test_form_unknown_region() {
        let fields = form_fields([
            ("purchase_price", "50000"),
            ("jeonse_price", "30000"),
            ("region", "jeju"),
        ]);
        let errors = JeonseInput::from_form(&fields).unwrap_err();
        assert!(errors.contains("region"));
    }
}
