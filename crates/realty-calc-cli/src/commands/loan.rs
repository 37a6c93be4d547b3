use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::loan;
use realty_calc_core::CalculatorConfig;

use super::{read_form, FlagForm};

/// Arguments for the loan calculator
#[derive(Args)]
pub struct LoanArgs {
    /// Loan amount in 만원
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 4.5)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan period in years
    #[arg(long)]
    pub loan_period: Option<Decimal>,

    /// Repayment method: equal_payment or equal_principal
    #[arg(long)]
    pub payment_type: Option<String>,

    /// Lump sum prepaid at each horizon, in 만원
    #[arg(long)]
    pub early_payment_amount: Option<Decimal>,

    /// Expected annual investment return in percent
    #[arg(long)]
    pub investment_return: Option<Decimal>,

    /// Path to JSON form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loan(
    args: LoanArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = FlagForm::default()
        .set("loan_amount", args.loan_amount)
        .set("interest_rate", args.interest_rate)
        .set("loan_period", args.loan_period)
        .set("payment_type", args.payment_type)
        .set("early_payment_amount", args.early_payment_amount)
        .set("investment_return", args.investment_return)
        .into_fields();

    let fields = read_form(args.input.as_deref(), flags)?;
    let result = loan::compute_with(&fields, &config.loan)?;
    Ok(serde_json::to_value(result)?)
}
