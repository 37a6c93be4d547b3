use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::GapAssumptions;
use crate::error::ValidationErrors;
use crate::form::{check_amount, FormFields, FormReader};
use crate::time_value::{annuity_payment, compound_annual_rate, monthly_rate};
use crate::types::*;
use crate::RealtyCalcResult;

/// Amortization term assumed for any acquisition loan, whatever the holding period
pub const LOAN_TERM_MONTHS: u32 = 360;

const MONTHS: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the gap investment calculator. Amounts in won, rates as decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapInput {
    pub purchase_price: Money,
    pub expected_sale_price: Money,
    /// Jeonse deposit taken over from (or collected from) the tenant
    pub deposit_price: Money,
    pub holding_years: u32,
    #[serde(default)]
    pub loan_amount: Money,
    #[serde(default)]
    pub loan_rate: Rate,
    /// Monthly management fee
    #[serde(default)]
    pub management_fee: Money,
    /// Annual property tax
    #[serde(default)]
    pub property_tax: Money,
    /// Monthly maintenance
    #[serde(default)]
    pub maintenance_cost: Money,
    /// Acquisition costs as a share of the purchase price
    pub transaction_cost_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapOutput {
    // Cash flow
    pub monthly_income: Money,
    pub monthly_loan_payment: Money,
    pub monthly_expense: Money,
    pub monthly_cash_flow: Money,
    pub total_cash_flow: Money,

    // Sale
    pub capital_gain: Money,
    pub transaction_costs: Money,
    pub net_capital_gain: Money,

    // Returns
    pub total_profit: Money,
    pub total_investment: Money,
    pub total_return: Percent,
    pub annual_return: Percent,

    pub holding_years: u32,
    /// Sale price at which total profit is zero
    pub break_even_price: Money,
}

// ---------------------------------------------------------------------------
// Input boundary
// ---------------------------------------------------------------------------

impl GapInput {
    /// Read the gap form: prices in 만원, rates in percent.
    pub fn from_form(fields: &FormFields) -> Result<Self, ValidationErrors> {
        Self::from_form_with(fields, &GapAssumptions::default())
    }

    pub fn from_form_with(
        fields: &FormFields,
        assumptions: &GapAssumptions,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FormReader::new(fields);

        let purchase_price = reader.required_amount("purchase_price", "Purchase price");
        let expected_sale_price =
            reader.required_amount("expected_sale_price", "Expected sale price");
        let deposit_price = reader.required_amount("jeonse_price", "Jeonse price");
        let holding_years = reader.whole_number(
            "holding_period",
            "Holding period",
            assumptions.default_holding_years,
        );
        let loan_amount = reader.required_amount("loan_amount", "Loan amount");
        let loan_rate =
            reader.optional_number("interest_rate", "Interest rate", Decimal::ZERO) / dec!(100);
        let management_fee = reader.optional_amount("management_fee", "Management fee");
        let property_tax =
            reader.optional_amount("property_tax", "Property tax");
        let maintenance_cost = reader.optional_amount("maintenance_cost", "Maintenance cost");
        let transaction_cost_rate = reader.optional_number(
            "transaction_cost",
            "Transaction cost",
            to_percent(assumptions.default_transaction_cost_rate),
        ) / dec!(100);

        let input = GapInput {
            purchase_price,
            expected_sale_price,
            deposit_price,
            holding_years,
            loan_amount,
            loan_rate,
            management_fee,
            property_tax,
            maintenance_cost,
            transaction_cost_rate,
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
        if self.expected_sale_price <= Decimal::ZERO {
            errors.add("expected_sale_price", "Enter an expected sale price greater than 0");
        }
        if self.deposit_price <= Decimal::ZERO {
            errors.add("jeonse_price", "Enter a jeonse price greater than 0");
        } else if self.purchase_price > Decimal::ZERO && self.deposit_price >= self.purchase_price
        {
            errors.add("jeonse_price", "Jeonse price must be below the purchase price");
        }
        if self.loan_amount < Decimal::ZERO {
            errors.add("loan_amount", "Loan amount cannot be negative");
        } else if self.loan_amount > self.purchase_price {
            errors.add("loan_amount", "Loan amount cannot exceed the purchase price");
        }
        if self.loan_amount > Decimal::ZERO && self.loan_rate <= Decimal::ZERO {
            errors.add("interest_rate", "Enter the loan interest rate");
        }
        if self.loan_rate < Decimal::ZERO {
            errors.add("interest_rate", "Interest rate cannot be negative");
        } else if self.loan_rate > Decimal::ONE {
            errors.add("interest_rate", "Interest rate must be at most 100%");
        }
        if self.holding_years == 0 {
            errors.add("holding_period", "Holding period must be at least 1 year");
        }
        for (field, value) in [
            ("management_fee", self.management_fee),
            ("property_tax", self.property_tax),
            ("maintenance_cost", self.maintenance_cost),
            ("transaction_cost", self.transaction_cost_rate),
        ] {
            if value < Decimal::ZERO {
                errors.add(field, "Cannot be negative");
            }
        }
        for (field, label, value) in [
            ("purchase_price", "Purchase price", self.purchase_price),
            ("expected_sale_price", "Expected sale price", self.expected_sale_price),
            ("jeonse_price", "Jeonse price", self.deposit_price),
            ("loan_amount", "Loan amount", self.loan_amount),
            ("management_fee", "Management fee", self.management_fee),
            ("property_tax", "Property tax", self.property_tax),
            ("maintenance_cost", "Maintenance cost", self.maintenance_cost),
        ] {
            check_amount(&mut errors, field, label, value);
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub fn compute(fields: &FormFields) -> RealtyCalcResult<ComputationOutput<GapOutput>> {
    compute_with(fields, &GapAssumptions::default())
}

pub fn compute_with(
    fields: &FormFields,
    assumptions: &GapAssumptions,
) -> RealtyCalcResult<ComputationOutput<GapOutput>> {
    let input = GapInput::from_form_with(fields, assumptions)?;
    calculate_with(&input, assumptions)
}

pub fn calculate(input: &GapInput) -> RealtyCalcResult<ComputationOutput<GapOutput>> {
    calculate_with(input, &GapAssumptions::default())
}

/// Cash flow, sale gain and return on equity for a gap purchase.
pub fn calculate_with(
    input: &GapInput,
    assumptions: &GapAssumptions,
) -> RealtyCalcResult<ComputationOutput<GapOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate().into_result(())?;

    tracing::debug!(
        purchase_price = %input.purchase_price,
        deposit_price = %input.deposit_price,
        holding_years = input.holding_years,
        "gap investment calculation started"
    );

    let years = Decimal::from(input.holding_years);

    // Cash flow
    let monthly_loan_payment = if input.loan_amount > Decimal::ZERO
        && input.loan_rate > Decimal::ZERO
    {
        annuity_payment(input.loan_amount, monthly_rate(input.loan_rate), LOAN_TERM_MONTHS)?
    } else {
        Decimal::ZERO
    };

    let monthly_income = input.deposit_price * assumptions.deposit_yield / MONTHS;
    let monthly_expense = monthly_loan_payment
        + input.management_fee
        + input.property_tax / MONTHS
        + input.maintenance_cost;
    let monthly_cash_flow = monthly_income - monthly_expense;
    let total_cash_flow = monthly_cash_flow * MONTHS * years;

    if monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Holding costs exceed deposit income by {} won a month",
            round_money(-monthly_cash_flow)
        ));
    }

    // Sale
    let capital_gain = input.expected_sale_price - input.purchase_price;
    let transaction_costs = input.purchase_price * input.transaction_cost_rate;
    let net_capital_gain = capital_gain - transaction_costs;

    // Returns
    let total_profit = net_capital_gain + total_cash_flow;
    let total_investment = (input.purchase_price - input.loan_amount) + transaction_costs;

    let (total_return, annual_return) = if total_investment > Decimal::ZERO {
        let growth = total_profit / total_investment;
        let annual = match compound_annual_rate(growth, years) {
            Some(rate) => to_percent(rate),
            None => {
                warnings.push("Losses exceed the equity invested; annual return floored at -100%".into());
                tracing::warn!(growth = %growth, "non-positive compounding base");
                dec!(-100)
            }
        };
        (to_percent(growth), annual)
    } else {
        warnings.push("No equity invested; returns reported as 0%".into());
        (Decimal::ZERO, Decimal::ZERO)
    };

    let break_even_price = input.purchase_price + transaction_costs - total_cash_flow;

    let output = GapOutput {
        monthly_income: round_money(monthly_income),
        monthly_loan_payment: round_money(monthly_loan_payment),
        monthly_expense: round_money(monthly_expense),
        monthly_cash_flow: round_money(monthly_cash_flow),
        total_cash_flow: round_money(total_cash_flow),
        capital_gain: round_money(capital_gain),
        transaction_costs: round_money(transaction_costs),
        net_capital_gain: round_money(net_capital_gain),
        total_profit: round_money(total_profit),
        total_investment: round_money(total_investment),
        total_return: round_dp(total_return, 2),
        annual_return: round_dp(annual_return, 2),
        holding_years: input.holding_years,
        break_even_price: round_money(break_even_price),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Gap investment return (deposit-financed purchase)",
        &serde_json::json!({
            "input": input,
            "deposit_yield": assumptions.deposit_yield.to_string(),
            "loan_term_months": LOAN_TERM_MONTHS,
        }),
        warnings,
        elapsed,
        output,
    ))
}
