use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::analysis::{
    inflation_adjusted, risk_analysis, sensitivity, tax_analysis, InflationAdjusted,
    RiskAnalysis, SensitivityAnalysis, TaxAnalysis,
};
use super::scenarios::{ScenarioKind, ScenarioResult, SimulationBase};
use crate::config::{Benchmarks, RoiAssumptions};
use crate::error::{RealtyCalcError, ValidationErrors};
use crate::form::{check_amount, FormFields, FormReader};
use crate::types::*;
use crate::RealtyCalcResult;

const MAX_SIMULATION_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the ROI simulator. Amounts in won, rates as decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiInput {
    /// Equity put into the purchase
    pub initial_investment: Money,
    pub purchase_price: Money,
    pub monthly_rent: Money,
    #[serde(default)]
    pub annual_expenses: Money,
    pub simulation_years: u32,
    pub tax_rate: Rate,
    pub inflation_rate: Rate,
    pub holding_years: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiOutput {
    pub scenarios: Vec<ScenarioResult>,
    pub best_scenario: ScenarioKind,
    pub average_annual_return: Percent,
    pub recommendation: String,
    pub tax_analysis: TaxAnalysis,
    pub inflation_adjusted: InflationAdjusted,
    pub risk_analysis: RiskAnalysis,
    pub benchmark_comparison: Benchmarks,
    pub sensitivity_analysis: SensitivityAnalysis,
}

// ---------------------------------------------------------------------------
// Input boundary
// ---------------------------------------------------------------------------

impl RoiInput {
    /// Read the simulator form: amounts in 만원, rent per month, rates in percent.
    pub fn from_form(fields: &FormFields) -> Result<Self, ValidationErrors> {
        Self::from_form_with(fields, &RoiAssumptions::default())
    }

    pub fn from_form_with(
        fields: &FormFields,
        assumptions: &RoiAssumptions,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FormReader::new(fields);

        let initial_investment =
            reader.required_amount("initial_investment", "Initial investment");
        let purchase_price = reader.required_amount("purchase_price", "Purchase price");
        let monthly_rent =
            reader.required_amount("current_rental_income", "Rental income");
        let annual_expenses = reader.optional_amount("annual_expenses", "Annual expenses");
        let simulation_years = reader.whole_number(
            "simulation_period",
            "Simulation period",
            assumptions.default_simulation_years,
        );
        let tax_rate = reader.optional_number(
            "tax_rate",
            "Tax rate",
            to_percent(assumptions.default_tax_rate),
        ) / dec!(100);
        let inflation_rate = reader.optional_number(
            "inflation_rate",
            "Inflation rate",
            to_percent(assumptions.default_inflation_rate),
        ) / dec!(100);
        let holding_years = reader.optional_number(
            "holding_period",
            "Holding period",
            assumptions.default_holding_years,
        );

        let input = RoiInput {
            initial_investment,
            purchase_price,
            monthly_rent,
            annual_expenses,
            simulation_years,
            tax_rate,
            inflation_rate,
            holding_years,
        };

        let mut errors = reader.into_errors();
        errors.merge(input.validate());
        errors.into_result(input)
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.initial_investment <= Decimal::ZERO {
            errors.add("initial_investment", "Enter an initial investment greater than 0");
        }
        if self.purchase_price <= Decimal::ZERO {
            errors.add("purchase_price", "Enter a purchase price greater than 0");
        }
        if self.monthly_rent < Decimal::ZERO {
            errors.add("current_rental_income", "Rental income must be 0 or more");
        }
        if self.annual_expenses < Decimal::ZERO {
            errors.add("annual_expenses", "Annual expenses cannot be negative");
        }
        if self.simulation_years == 0 || self.simulation_years > MAX_SIMULATION_YEARS {
            errors.add(
                "simulation_period",
                format!("Simulation period must be between 1 and {MAX_SIMULATION_YEARS} years"),
            );
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            errors.add("tax_rate", "Tax rate must be between 0% and 100%");
        }
        if self.inflation_rate <= dec!(-1) {
            errors.add("inflation_rate", "Inflation rate must be above -100%");
        }
        if self.holding_years < Decimal::ZERO {
            errors.add("holding_period", "Holding period cannot be negative");
        }
        for (field, label, value) in [
            ("initial_investment", "Initial investment", self.initial_investment),
            ("purchase_price", "Purchase price", self.purchase_price),
            ("current_rental_income", "Rental income", self.monthly_rent),
            ("annual_expenses", "Annual expenses", self.annual_expenses),
        ] {
            check_amount(&mut errors, field, label, value);
        }

        errors
    }

    pub fn annual_rent(&self) -> Money {
        self.monthly_rent * dec!(12)
    }
}

fn recommendation(average_annual_return: Percent) -> &'static str {
    if average_annual_return >= dec!(8) {
        "Very attractive opportunity. Worth pursuing actively."
    } else if average_annual_return >= dec!(5) {
        "Solid investment. Weigh the risks before deciding."
    } else if average_annual_return >= dec!(2) {
        "Average returns. Compare against other options."
    } else {
        "Low returns. Reconsider the investment."
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub fn compute(fields: &FormFields) -> RealtyCalcResult<ComputationOutput<RoiOutput>> {
    compute_with(fields, &RoiAssumptions::default())
}

pub fn compute_with(
    fields: &FormFields,
    assumptions: &RoiAssumptions,
) -> RealtyCalcResult<ComputationOutput<RoiOutput>> {
    let input = RoiInput::from_form_with(fields, assumptions)?;
    calculate_with(&input, assumptions)
}

pub fn calculate(input: &RoiInput) -> RealtyCalcResult<ComputationOutput<RoiOutput>> {
    calculate_with(input, &RoiAssumptions::default())
}

/// Simulate the four fixed scenarios and layer tax, inflation, risk and
/// sensitivity analysis over the realistic one.
pub fn calculate_with(
    input: &RoiInput,
    assumptions: &RoiAssumptions,
) -> RealtyCalcResult<ComputationOutput<RoiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate().into_result(())?;

    let annual_rent = input.annual_rent();
    let base_yield = annual_rent / input.purchase_price;
    let base = SimulationBase {
        initial_investment: input.initial_investment,
        purchase_price: input.purchase_price,
        annual_rent,
        period_years: input.simulation_years,
    };

    tracing::debug!(
        purchase_price = %input.purchase_price,
        base_yield = %base_yield,
        years = input.simulation_years,
        "roi simulation started"
    );

    let mut scenarios: Vec<ScenarioResult> = Vec::with_capacity(ScenarioKind::ALL.len());
    for kind in ScenarioKind::ALL {
        let (result, total_loss) = kind
            .assumption(base_yield, input.annual_expenses)
            .simulate(&base)?;
        if total_loss {
            warnings.push(format!(
                "The {kind} scenario loses more than the initial investment; annual return reported as -100%"
            ));
            tracing::warn!(scenario = %kind, "non-positive compounding base");
        }
        scenarios.push(result);
    }

    // First scenario wins ties
    let best = scenarios
        .iter()
        .fold(None::<&ScenarioResult>, |best, s| match best {
            Some(b) if s.annual_return <= b.annual_return => Some(b),
            _ => Some(s),
        })
        .ok_or_else(|| RealtyCalcError::InvalidInput {
            field: "scenarios".into(),
            reason: "no scenarios simulated".into(),
        })?;
    let best_scenario = best.kind;

    let returns: Vec<Percent> = scenarios.iter().map(|s| s.annual_return).collect();
    let average_annual_return =
        returns.iter().copied().sum::<Decimal>() / Decimal::from(returns.len() as u64);

    let realistic = scenarios
        .iter()
        .find(|s| s.kind == ScenarioKind::Realistic)
        .ok_or_else(|| RealtyCalcError::InvalidInput {
            field: "scenarios".into(),
            reason: "realistic scenario missing".into(),
        })?;

    let tax = tax_analysis(
        realistic.total_return,
        input.purchase_price,
        annual_rent,
        input.initial_investment,
        input.tax_rate,
        input.holding_years,
        input.simulation_years,
    );
    let inflation = inflation_adjusted(
        realistic.annual_return,
        input.inflation_rate,
        input.initial_investment,
        input.simulation_years,
    )?;
    let sensitivity_analysis = sensitivity(realistic.annual_return);

    let output = RoiOutput {
        best_scenario,
        average_annual_return: round_dp(average_annual_return, 1),
        recommendation: recommendation(average_annual_return).to_string(),
        tax_analysis: tax,
        inflation_adjusted: inflation,
        risk_analysis: risk_analysis(&returns),
        benchmark_comparison: assumptions.benchmarks.clone(),
        sensitivity_analysis,
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Four-scenario ROI projection with tax, inflation and risk layers",
        &serde_json::json!({
            "input": input,
            "sample_years": super::SAMPLE_YEARS,
            "base_rental_yield": base_yield.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
