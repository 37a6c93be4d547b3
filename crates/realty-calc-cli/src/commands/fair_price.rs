use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::fair_price;
use realty_calc_core::CalculatorConfig;

use super::{read_form, FlagForm};

/// Arguments for the fair price estimator.
///
/// Grades accept excellent/good/average/poor or the Korean labels used on
/// the site (우수, 좋음, 보통, 불량, ...).
#[derive(Args)]
pub struct FairPriceArgs {
    #[arg(long)]
    pub apartment_name: Option<String>,

    /// Exclusive area in ㎡
    #[arg(long)]
    pub area: Option<Decimal>,

    /// Recent comparable transaction in 만원
    #[arg(long)]
    pub recent_transactions: Option<Decimal>,

    #[arg(long)]
    pub floor: Option<Decimal>,

    /// Building age in years
    #[arg(long)]
    pub age: Option<Decimal>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub condition: Option<String>,

    #[arg(long)]
    pub facilities: Option<String>,

    #[arg(long)]
    pub transportation_access: Option<String>,

    /// Path to JSON form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_fair_price(
    args: FairPriceArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = FlagForm::default()
        .set("apartment_name", args.apartment_name)
        .set("area", args.area)
        .set("recent_transactions", args.recent_transactions)
        .set("floor", args.floor)
        .set("age", args.age)
        .set("location", args.location)
        .set("condition", args.condition)
        .set("facilities", args.facilities)
        .set("transportation_access", args.transportation_access)
        .into_fields();

    let fields = read_form(args.input.as_deref(), flags)?;
    let result = fair_price::compute_with(&fields, &config.fair_price)?;
    Ok(serde_json::to_value(result)?)
}
