use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortization::{
    amortization_schedule, equal_payment_installment, equal_principal_total_interest,
    AmortizationEntry, LoanTerms, RepaymentMethod,
};
use crate::config::LoanAssumptions;
use crate::error::ValidationErrors;
use crate::form::{check_amount, FormFields, FormReader};
use crate::time_value::{annuity_future_value, annuity_payment, monthly_rate};
use crate::types::*;
use crate::RealtyCalcResult;

/// Yearly rows surfaced in the output schedule
const DISPLAYED_SCHEDULE_YEARS: usize = 10;

/// Years after drawdown at which a lump-sum prepayment is evaluated
const EARLY_REPAYMENT_HORIZONS: [u32; 3] = [3, 5, 10];

const MAX_ANNUAL_RATE: Rate = dec!(1);

/// Highest return whose 50-year monthly compounding still fits a Decimal
const MAX_INVESTMENT_RETURN: Rate = dec!(0.5);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the loan calculator. Amounts in won, rates as decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan_amount: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    #[serde(default)]
    pub method: RepaymentMethod,
    /// Lump sum prepaid at each evaluated horizon
    #[serde(default)]
    pub early_repayment_amount: Money,
    /// Annual return of the invest-instead alternative
    #[serde(default = "default_investment_return")]
    pub investment_return: Rate,
}

fn default_investment_return() -> Rate {
    LoanAssumptions::default().default_investment_return
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqualPaymentSummary {
    pub monthly_payment: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqualPrincipalSummary {
    pub first_payment: Money,
    pub last_payment: Money,
    pub total_interest: Money,
}

/// Both conventions side by side, whichever one was selected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodComparison {
    pub equal_payment: EqualPaymentSummary,
    pub equal_principal: EqualPrincipalSummary,
    /// Interest saved by choosing equal-principal over equal-payment
    pub savings: Money,
}

/// Effect of a lump-sum prepayment made `horizon_years` into the loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyRepaymentPoint {
    pub horizon_years: u32,
    /// Balance outstanding at the horizon, before the prepayment
    pub remaining_balance: Money,
    pub balance_after_repayment: Money,
    pub saved_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateScenario {
    pub annual_rate: Rate,
    pub monthly_payment: Money,
    pub total_interest: Money,
}

/// Equal-payment installment under parallel rate shocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSensitivity {
    pub rate_1pp_lower: RateScenario,
    pub rate_1pp_higher: RateScenario,
    pub rate_2pp_higher: RateScenario,
}

/// What the installments would grow to if invested instead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentAlternative {
    pub monthly_investment: Money,
    pub expected_return: Percent,
    pub future_value: Money,
    pub net_benefit: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub method: RepaymentMethod,
    /// Level installment, or the first installment for equal-principal
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationEntry>,
    pub comparison: MethodComparison,
    pub early_repayment: Vec<EarlyRepaymentPoint>,
    pub rate_sensitivity: RateSensitivity,
    pub investment_alternative: InvestmentAlternative,
}

// ---------------------------------------------------------------------------
// Input boundary
// ---------------------------------------------------------------------------

impl LoanInput {
    /// Read the loan form: amounts in 만원, rates in percent, period in years.
    pub fn from_form(fields: &FormFields) -> Result<Self, ValidationErrors> {
        Self::from_form_with(fields, &LoanAssumptions::default())
    }

    pub fn from_form_with(
        fields: &FormFields,
        assumptions: &LoanAssumptions,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FormReader::new(fields);

        let loan_amount = reader.required_amount("loan_amount", "Loan amount");
        let annual_rate = reader.required_number("interest_rate", "Interest rate") / dec!(100);
        let term_years =
            reader.whole_number("loan_period", "Loan period", assumptions.default_term_years);
        let method = reader.choice("payment_type", "repayment method", RepaymentMethod::default());
        let early_repayment_amount =
            reader.optional_amount("early_payment_amount", "Early repayment amount");
        let investment_return = reader.optional_number(
            "investment_return",
            "Investment return",
            to_percent(assumptions.default_investment_return),
        ) / dec!(100);

        let input = LoanInput {
            loan_amount,
            annual_rate,
            term_years,
            method,
            early_repayment_amount,
            investment_return,
        };

        let mut errors = reader.into_errors();
        errors.merge(input.validate(assumptions));
        errors.into_result(input)
    }

    /// Range checks, keyed by form field name.
    pub fn validate(&self, assumptions: &LoanAssumptions) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.loan_amount <= Decimal::ZERO {
            errors.add("loan_amount", "Enter a loan amount greater than 0");
        }
        if self.annual_rate <= Decimal::ZERO {
            errors.add("interest_rate", "Enter an interest rate greater than 0");
        } else if self.annual_rate > MAX_ANNUAL_RATE {
            errors.add("interest_rate", "Interest rate must be at most 100%");
        }
        if self.term_years == 0 {
            errors.add("loan_period", "Enter a loan period of at least 1 year");
        } else if self.term_years > assumptions.max_term_years {
            errors.add(
                "loan_period",
                format!("Loan period must be at most {} years", assumptions.max_term_years),
            );
        }
        if self.early_repayment_amount < Decimal::ZERO {
            errors.add("early_payment_amount", "Early repayment amount cannot be negative");
        }
        if self.investment_return < Decimal::ZERO
            || self.investment_return > MAX_INVESTMENT_RETURN
        {
            errors.add("investment_return", "Investment return must be between 0% and 50%");
        }
        check_amount(&mut errors, "loan_amount", "Loan amount", self.loan_amount);
        check_amount(
            &mut errors,
            "early_payment_amount",
            "Early repayment amount",
            self.early_repayment_amount,
        );

        errors
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.loan_amount,
            annual_rate: self.annual_rate,
            term_months: self.term_years * 12,
            method: self.method,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Parse the loan form and run the calculator with default assumptions.
pub fn compute(fields: &FormFields) -> RealtyCalcResult<ComputationOutput<LoanOutput>> {
    compute_with(fields, &LoanAssumptions::default())
}

pub fn compute_with(
    fields: &FormFields,
    assumptions: &LoanAssumptions,
) -> RealtyCalcResult<ComputationOutput<LoanOutput>> {
    let input = LoanInput::from_form_with(fields, assumptions)?;
    calculate_with(&input, assumptions)
}

pub fn calculate(input: &LoanInput) -> RealtyCalcResult<ComputationOutput<LoanOutput>> {
    calculate_with(input, &LoanAssumptions::default())
}

/// Repayment analysis for a single loan.
pub fn calculate_with(
    input: &LoanInput,
    assumptions: &LoanAssumptions,
) -> RealtyCalcResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate(assumptions).into_result(())?;

    let terms = input.terms();
    let principal = terms.principal;
    let n = Decimal::from(terms.term_months);
    let r = terms.monthly_rate();

    tracing::debug!(
        principal = %principal,
        annual_rate = %terms.annual_rate,
        term_months = terms.term_months,
        method = %terms.method,
        "loan calculation started"
    );

    // Equal-payment
    let level_payment = equal_payment_installment(&terms)?;
    let level_total_payment = level_payment * n;
    let level_total_interest = level_total_payment - principal;

    // Equal-principal
    let slice = terms.principal_slice();
    let first_payment = slice + principal * r;
    let last_payment = slice + slice * r;
    let straight_total_interest = equal_principal_total_interest(&terms);

    let (monthly_payment, total_payment, total_interest) = match terms.method {
        RepaymentMethod::EqualPayment => {
            (level_payment, level_total_payment, level_total_interest)
        }
        RepaymentMethod::EqualPrincipal => (
            first_payment,
            principal + straight_total_interest,
            straight_total_interest,
        ),
    };

    let mut schedule = amortization_schedule(&terms)?;
    schedule.truncate(DISPLAYED_SCHEDULE_YEARS);

    let comparison = MethodComparison {
        equal_payment: EqualPaymentSummary {
            monthly_payment: round_money(level_payment),
            total_interest: round_money(level_total_interest),
        },
        equal_principal: EqualPrincipalSummary {
            first_payment: round_money(first_payment),
            last_payment: round_money(last_payment),
            total_interest: round_money(straight_total_interest),
        },
        savings: round_money(level_total_interest - straight_total_interest),
    };

    let mut early_repayment = Vec::with_capacity(EARLY_REPAYMENT_HORIZONS.len());
    for horizon_years in EARLY_REPAYMENT_HORIZONS {
        if horizon_years >= input.term_years {
            warnings.push(format!(
                "Early repayment at year {horizon_years} skipped: the loan is repaid by then"
            ));
            continue;
        }
        early_repayment.push(early_repayment_point(
            &terms,
            horizon_years,
            input.early_repayment_amount,
            total_interest,
        )?);
    }

    let rate_sensitivity = RateSensitivity {
        rate_1pp_lower: rate_scenario(&terms, dec!(-0.01), &mut warnings)?,
        rate_1pp_higher: rate_scenario(&terms, dec!(0.01), &mut warnings)?,
        rate_2pp_higher: rate_scenario(&terms, dec!(0.02), &mut warnings)?,
    };

    let future_value = annuity_future_value(
        monthly_payment,
        monthly_rate(input.investment_return),
        terms.term_months,
    )?;
    let investment_alternative = InvestmentAlternative {
        monthly_investment: round_money(monthly_payment),
        expected_return: to_percent(input.investment_return),
        future_value: round_money(future_value),
        net_benefit: round_money(future_value - total_payment),
    };

    let output = LoanOutput {
        method: terms.method,
        monthly_payment: round_money(monthly_payment),
        total_payment: round_money(total_payment),
        total_interest: round_money(total_interest),
        schedule,
        comparison,
        early_repayment,
        rate_sensitivity,
        investment_alternative,
    };

    tracing::debug!(monthly_payment = %output.monthly_payment, "loan calculation finished");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan amortization (equal payment / equal principal)",
        &serde_json::json!({
            "input": input,
            "schedule_cap_months": super::amortization::SCHEDULE_CAP_MONTHS,
            "early_repayment_interest": "remaining balance x monthly rate x remaining months",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Prepayment effect at one horizon.
///
/// Interest after the prepayment is estimated linearly as
/// `balance_after * r * remaining_months` rather than by re-amortising the
/// loan; the estimate overstates remaining interest, so savings are
/// conservative and floored at zero.
fn early_repayment_point(
    terms: &LoanTerms,
    horizon_years: u32,
    amount: Money,
    total_interest: Money,
) -> RealtyCalcResult<EarlyRepaymentPoint> {
    let months = horizon_years * 12;
    let (balance, interest_paid) = terms.roll_forward(months)?;

    let balance_after = (balance - amount).max(Decimal::ZERO);
    let remaining_months = Decimal::from(terms.term_months - months);
    let remaining_interest = if balance_after > Decimal::ZERO {
        balance_after * terms.monthly_rate() * remaining_months
    } else {
        Decimal::ZERO
    };
    let saved = total_interest - (interest_paid + remaining_interest);

    Ok(EarlyRepaymentPoint {
        horizon_years,
        remaining_balance: round_money(balance),
        balance_after_repayment: round_money(balance_after),
        saved_interest: round_money(saved.max(Decimal::ZERO)),
    })
}

fn rate_scenario(
    terms: &LoanTerms,
    shift: Rate,
    warnings: &mut Vec<String>,
) -> RealtyCalcResult<RateScenario> {
    let mut annual_rate = terms.annual_rate + shift;
    if annual_rate < Decimal::ZERO {
        warnings.push(format!(
            "Rate shock {shift} takes the rate below zero; evaluated at 0%"
        ));
        tracing::warn!(shift = %shift, "rate shock floored at zero");
        annual_rate = Decimal::ZERO;
    }

    let payment = annuity_payment(terms.principal, monthly_rate(annual_rate), terms.term_months)?;
    let total_interest = payment * Decimal::from(terms.term_months) - terms.principal;

    Ok(RateScenario {
        annual_rate,
        monthly_payment: round_money(payment),
        total_interest: round_money(total_interest),
    })
}
