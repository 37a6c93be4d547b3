use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::jeonse;
use realty_calc_core::CalculatorConfig;

use super::{read_form, FlagForm};

/// Arguments for the jeonse ratio calculator
#[derive(Args)]
pub struct JeonseRatioArgs {
    /// Purchase price in 만원
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Jeonse deposit in 만원
    #[arg(long)]
    pub jeonse_price: Option<Decimal>,

    /// Monthly rent in 만원, for semi-jeonse contracts
    #[arg(long)]
    pub monthly_rent_price: Option<Decimal>,

    /// Region (seoul, gyeonggi, ... or 서울, 경기, ...)
    #[arg(long)]
    pub region: Option<String>,

    /// Building age in years
    #[arg(long)]
    pub building_age: Option<Decimal>,

    /// Exclusive area in ㎡
    #[arg(long)]
    pub area: Option<Decimal>,

    /// Path to JSON form file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_jeonse_ratio(
    args: JeonseRatioArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = FlagForm::default()
        .set("purchase_price", args.purchase_price)
        .set("jeonse_price", args.jeonse_price)
        .set("monthly_rent_price", args.monthly_rent_price)
        .set("region", args.region)
        .set("building_age", args.building_age)
        .set("area", args.area)
        .into_fields();

    let fields = read_form(args.input.as_deref(), flags)?;
    let result = jeonse::compute_with(&fields, &config.jeonse)?;
    Ok(serde_json::to_value(result)?)
}
