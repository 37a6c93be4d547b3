use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::roi;
use realty_calc_core::CalculatorConfig;

use super::{read_form, FlagForm};

/// Arguments for the ROI simulator. Amounts in 만원, rates in percent.
#[derive(Args)]
pub struct RoiArgs {
    /// Equity put into the purchase
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Current monthly rent
    #[arg(long)]
    pub current_rental_income: Option<Decimal>,

    #[arg(long)]
    pub annual_expenses: Option<Decimal>,

    /// Simulation period in years
    #[arg(long)]
    pub simulation_period: Option<Decimal>,

    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    #[arg(long)]
    pub inflation_rate: Option<Decimal>,

    /// Expected holding period in years
    #[arg(long)]
    pub holding_period: Option<Decimal>,

    /// Path to JSON form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_roi(
    args: RoiArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = FlagForm::default()
        .set("initial_investment", args.initial_investment)
        .set("purchase_price", args.purchase_price)
        .set("current_rental_income", args.current_rental_income)
        .set("annual_expenses", args.annual_expenses)
        .set("simulation_period", args.simulation_period)
        .set("tax_rate", args.tax_rate)
        .set("inflation_rate", args.inflation_rate)
        .set("holding_period", args.holding_period)
        .into_fields();

    let fields = read_form(args.input.as_deref(), flags)?;
    let result = roi::compute_with(&fields, &config.roi)?;
    Ok(serde_json::to_value(result)?)
}
