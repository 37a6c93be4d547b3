use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::growth_factor;
use crate::types::*;
use crate::RealtyCalcResult;

/// Price growth assumed when estimating the taxable gain
const ASSUMED_APPRECIATION: Rate = dec!(0.04);
/// Holdings shorter than this many years pay the short-term rate
const SHORT_TERM_YEARS: Decimal = dec!(2);
const SHORT_TERM_CGT: Rate = dec!(0.5);
const LONG_TERM_CGT: Rate = dec!(0.22);

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxAnalysis {
    pub capital_gains_tax: Money,
    pub rental_income_tax: Money,
    /// Realistic total return less taxes, percentage points
    pub net_return: Percent,
    pub effective_tax_rate: Percent,
}

pub fn tax_analysis(
    realistic_total_return: Percent,
    purchase_price: Money,
    annual_rent: Money,
    initial_investment: Money,
    tax_rate: Rate,
    holding_years: Decimal,
    period_years: u32,
) -> TaxAnalysis {
    let period = Decimal::from(period_years);
    let capital_gain = purchase_price * ASSUMED_APPRECIATION * period;
    let cgt_rate = if holding_years < SHORT_TERM_YEARS {
        SHORT_TERM_CGT
    } else {
        LONG_TERM_CGT
    };
    let capital_gains_tax = capital_gain * cgt_rate;
    let rental_income_tax = annual_rent * tax_rate * period;
    let total_tax = capital_gains_tax + rental_income_tax;

    let net_return = realistic_total_return - total_tax / initial_investment * dec!(100);

    let taxable = capital_gain + annual_rent * period;
    let effective_tax_rate = if taxable.is_zero() {
        Decimal::ZERO
    } else {
        total_tax / taxable * dec!(100)
    };

    TaxAnalysis {
        capital_gains_tax: round_money(capital_gains_tax),
        rental_income_tax: round_money(rental_income_tax),
        net_return: round_dp(net_return, 1),
        effective_tax_rate: round_dp(effective_tax_rate, 1),
    }
}

// ---------------------------------------------------------------------------
// Inflation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationAdjusted {
    pub real_return: Percent,
    /// Cumulative price level after the period, 1.00 = today
    pub purchasing_power: Decimal,
    pub inflation_impact: Money,
}

pub fn inflation_adjusted(
    realistic_annual_return: Percent,
    inflation_rate: Rate,
    initial_investment: Money,
    period_years: u32,
) -> RealtyCalcResult<InflationAdjusted> {
    let nominal = realistic_annual_return / dec!(100);
    let real = to_percent((Decimal::ONE + nominal) / (Decimal::ONE + inflation_rate) - Decimal::ONE);
    let purchasing_power = growth_factor(inflation_rate, period_years)?;
    let impact = (nominal - real / dec!(100)) * initial_investment * Decimal::from(period_years);

    Ok(InflationAdjusted {
        real_return: round_dp(real, 1),
        purchasing_power: round_dp(purchasing_power, 2),
        inflation_impact: round_money(impact),
    })
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub volatility: Percent,
    pub max_drawdown: Percent,
    pub sharpe_ratio: Decimal,
    pub risk_score: u32,
}

/// Dispersion of the scenario annual returns. Volatility is the population
/// standard deviation; drawdown is the spread between best and worst.
pub fn risk_analysis(annual_returns: &[Percent]) -> RiskAnalysis {
    if annual_returns.is_empty() {
        return RiskAnalysis {
            volatility: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            risk_score: 100,
        };
    }

    let n = Decimal::from(annual_returns.len() as u64);
    let mean = annual_returns.iter().copied().sum::<Decimal>() / n;
    let variance = annual_returns
        .iter()
        .map(|r| (*r - mean) * (*r - mean))
        .sum::<Decimal>()
        / n;
    let volatility = variance.sqrt().unwrap_or(Decimal::ZERO);

    let max = annual_returns.iter().copied().max().unwrap_or(Decimal::ZERO);
    let min = annual_returns.iter().copied().min().unwrap_or(Decimal::ZERO);

    let sharpe = if volatility.is_zero() {
        tracing::warn!("scenario returns have zero volatility; sharpe ratio reported as 0");
        Decimal::ZERO
    } else {
        mean / volatility
    };

    let score = (dec!(100) - volatility * dec!(5)).clamp(Decimal::ZERO, dec!(100));

    RiskAnalysis {
        volatility: round_dp(volatility, 1),
        max_drawdown: round_dp(max - min, 1),
        sharpe_ratio: round_dp(sharpe, 2),
        risk_score: round_dp(score, 0).to_u32().unwrap_or(0),
    }
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityBand {
    pub up: Percent,
    pub down: Percent,
}

/// Annual return under shocked inputs. These are fixed rule-of-thumb
/// offsets on the realistic return, not a re-run of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    /// Purchase price ±10%
    pub price_change_10: SensitivityBand,
    /// Rent ±20%
    pub rent_change_20: SensitivityBand,
    /// Expenses ±30%; `up` is the higher-expense case
    pub expense_change_30: SensitivityBand,
}

pub fn sensitivity(realistic_annual_return: Percent) -> SensitivityAnalysis {
    let shifted = |delta: Decimal| round_dp(realistic_annual_return + delta, 1);
    SensitivityAnalysis {
        price_change_10: SensitivityBand {
            up: shifted(dec!(2)),
            down: shifted(dec!(-2)),
        },
        rent_change_20: SensitivityBand {
            up: shifted(dec!(1.5)),
            down: shifted(dec!(-1.5)),
        },
        expense_change_30: SensitivityBand {
            up: shifted(dec!(-1)),
            down: shifted(dec!(1)),
        },
    }
}
