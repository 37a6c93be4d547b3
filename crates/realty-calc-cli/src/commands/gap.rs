use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::gap;
use realty_calc_core::CalculatorConfig;

use super::{read_form, FlagForm};

/// Arguments for the gap investment calculator. Amounts in 만원.
#[derive(Args)]
pub struct GapArgs {
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    #[arg(long)]
    pub expected_sale_price: Option<Decimal>,

    /// Jeonse deposit
    #[arg(long)]
    pub jeonse_price: Option<Decimal>,

    /// Holding period in years
    #[arg(long)]
    pub holding_period: Option<Decimal>,

    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Loan rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Monthly management fee
    #[arg(long)]
    pub management_fee: Option<Decimal>,

    /// Annual property tax
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Monthly maintenance cost
    #[arg(long)]
    pub maintenance_cost: Option<Decimal>,

    /// Buy and sell costs in percent of the purchase price
    #[arg(long)]
    pub transaction_cost: Option<Decimal>,

    /// Path to JSON form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_gap(
    args: GapArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = FlagForm::default()
        .set("purchase_price", args.purchase_price)
        .set("expected_sale_price", args.expected_sale_price)
        .set("jeonse_price", args.jeonse_price)
        .set("holding_period", args.holding_period)
        .set("loan_amount", args.loan_amount)
        .set("interest_rate", args.interest_rate)
        .set("management_fee", args.management_fee)
        .set("property_tax", args.property_tax)
        .set("maintenance_cost", args.maintenance_cost)
        .set("transaction_cost", args.transaction_cost)
        .into_fields();

    let fields = read_form(args.input.as_deref(), flags)?;
    let result = gap::compute_with(&fields, &config.gap)?;
    Ok(serde_json::to_value(result)?)
}
