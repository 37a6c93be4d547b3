use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RealtyCalcError;
use crate::time_value::compound_annual_rate;
use crate::types::*;
use crate::RealtyCalcResult;

/// Years at which the running ROI is reported
pub const SAMPLE_YEARS: [u32; 4] = [1, 3, 5, 10];

/// Reported when the compounding base is not positive
const TOTAL_LOSS: Percent = dec!(-100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Conservative,
    Realistic,
    Optimistic,
    Pessimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::Conservative,
        ScenarioKind::Realistic,
        ScenarioKind::Optimistic,
        ScenarioKind::Pessimistic,
    ];

    /// Yearly price change assumed for the scenario
    pub fn appreciation(&self) -> Rate {
        match self {
            ScenarioKind::Conservative => dec!(0.02),
            ScenarioKind::Realistic => dec!(0.04),
            ScenarioKind::Optimistic => dec!(0.06),
            ScenarioKind::Pessimistic => dec!(-0.01),
        }
    }

    /// Build the scenario from the property's current yield and expenses.
    /// Only the pessimistic case cuts rent (10%) and raises expenses (20%).
    pub fn assumption(&self, base_yield: Rate, base_expenses: Money) -> ScenarioAssumption {
        let (rental_yield, expenses) = match self {
            ScenarioKind::Pessimistic => (base_yield * dec!(0.9), base_expenses * dec!(1.2)),
            _ => (base_yield, base_expenses),
        };
        ScenarioAssumption {
            kind: *self,
            appreciation: self.appreciation(),
            rental_yield,
            expenses,
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScenarioKind::Conservative => "conservative",
            ScenarioKind::Realistic => "realistic",
            ScenarioKind::Optimistic => "optimistic",
            ScenarioKind::Pessimistic => "pessimistic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAssumption {
    pub kind: ScenarioKind,
    pub appreciation: Rate,
    pub rental_yield: Rate,
    /// Annual expenses in won
    pub expenses: Money,
}

impl ScenarioAssumption {
    pub fn risk(&self) -> RiskLevel {
        if self.appreciation >= dec!(0.04) && self.rental_yield >= dec!(0.04) {
            RiskLevel::Low
        } else if self.appreciation >= dec!(0.02) && self.rental_yield >= dec!(0.02) {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub kind: ScenarioKind,
    pub year1: Percent,
    pub year3: Percent,
    pub year5: Percent,
    pub year10: Percent,
    /// Last sampled ROI
    pub total_return: Percent,
    pub annual_return: Percent,
    pub risk: RiskLevel,
    pub final_value: Money,
    pub total_cash_flow: Money,
    pub capital_gain: Money,
}

/// Simulation context shared by every scenario, all amounts in won.
#[derive(Debug, Clone, Copy)]
pub struct SimulationBase {
    pub initial_investment: Money,
    pub purchase_price: Money,
    pub annual_rent: Money,
    pub period_years: u32,
}

impl ScenarioAssumption {
    /// Run the year-by-year projection.
    ///
    /// Runs at least ten years so every sample point exists. The annualised
    /// figure roots the last sample over the simulation period, and
    /// `total_loss` is set when that root does not exist.
    pub fn simulate(&self, base: &SimulationBase) -> RealtyCalcResult<(ScenarioResult, bool)> {
        let overflow = || RealtyCalcError::InvalidInput {
            field: "purchase_price".into(),
            reason: format!("{} projection exceeds the representable range", self.kind),
        };
        let purchase = base.purchase_price;
        let initial = base.initial_investment;
        let annual_cash_flow = purchase
            .checked_mul(self.rental_yield)
            .and_then(|rent| rent.checked_sub(self.expenses))
            .ok_or_else(overflow)?;
        let horizon = base.period_years.max(10);

        let mut value = purchase;
        let mut cumulative = Decimal::ZERO;
        let mut samples = [Decimal::ZERO; 4];

        for year in 1..=horizon {
            value = value
                .checked_mul(Decimal::ONE + self.appreciation)
                .ok_or_else(overflow)?;
            cumulative = cumulative
                .checked_add(annual_cash_flow)
                .ok_or_else(overflow)?;

            if let Some(slot) = SAMPLE_YEARS.iter().position(|&y| y == year) {
                let roi = (value - purchase)
                    .checked_add(cumulative)
                    .and_then(|gain| gain.checked_sub(initial))
                    .and_then(|gain| gain.checked_div(initial))
                    .and_then(|ratio| ratio.checked_mul(dec!(100)))
                    .ok_or_else(overflow)?;
                samples[slot] = round_dp(roi, 1);
            }
        }

        let total_return = samples[3];
        let years = Decimal::from(base.period_years);
        let (annual_return, total_loss) =
            match compound_annual_rate(total_return / dec!(100), years) {
                Some(rate) => (round_dp(to_percent(rate), 1), false),
                None => (TOTAL_LOSS, true),
            };

        let final_value = initial
            .checked_mul(Decimal::ONE + total_return / dec!(100))
            .ok_or_else(overflow)?;

        let result = ScenarioResult {
            kind: self.kind,
            year1: samples[0],
            year3: samples[1],
            year5: samples[2],
            year10: samples[3],
            total_return,
            annual_return,
            risk: self.risk(),
            final_value: round_money(final_value),
            total_cash_flow: round_money(base.annual_rent * years),
            capital_gain: round_money(purchase * self.appreciation * years),
        };
        Ok((result, total_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimulationBase {
        SimulationBase {
            initial_investment: dec!(100000000),
            purchase_price: dec!(500000000),
            annual_rent: dec!(12000000),
            period_years: 5,
        }
    }

    #[test]
    fn test_pessimistic_adjusts_rent_and_expenses() {
        let a = ScenarioKind::Pessimistic.assumption(dec!(0.03), dec!(1000000));
        assert_eq!(a.appreciation, dec!(-0.01));
        assert_eq!(a.rental_yield, dec!(0.027));
        assert_eq!(a.expenses, dec!(1200000));

        let r = ScenarioKind::Realistic.assumption(dec!(0.03), dec!(1000000));
        assert_eq!(r.rental_yield, dec!(0.03));
        assert_eq!(r.expenses, dec!(1000000));
    }

    #[test]
    fn test_scenario_risk() {
        assert_eq!(
            ScenarioKind::Realistic.assumption(dec!(0.05), Decimal::ZERO).risk(),
            RiskLevel::Low
        );
        assert_eq!(
            ScenarioKind::Conservative.assumption(dec!(0.05), Decimal::ZERO).risk(),
            RiskLevel::Medium
        );
        assert_eq!(
            ScenarioKind::Optimistic.assumption(dec!(0.01), Decimal::ZERO).risk(),
            RiskLevel::High
        );
        assert_eq!(
            ScenarioKind::Pessimistic.assumption(dec!(0.10), Decimal::ZERO).risk(),
            RiskLevel::High
        );
    }

    #[test]
    fn test_year_one_roi() {
        // 500M at 2%: +10M value, +12M rent, less 100M initial
        let a = ScenarioKind::Conservative.assumption(dec!(0.024), Decimal::ZERO);
        let (r, loss) = a.simulate(&base()).unwrap();
        assert!(!loss);
        assert_eq!(r.year1, dec!(-78));
        assert_eq!(r.capital_gain, dec!(50000000));
        assert_eq!(r.total_cash_flow, dec!(60000000));
    }

    #[test]
    fn test_samples_exist_for_short_periods() {
        let mut b = base();
        b.period_years = 1;
        let a = ScenarioKind::Realistic.assumption(dec!(0.024), Decimal::ZERO);
        let (r, _) = a.simulate(&b).unwrap();
        assert_eq!(r.total_return, r.year10);
        assert!(r.year10 > r.year5);
        assert!(r.year5 > r.year3);
    }

    #[test]
    fn test_total_loss_reports_minus_100() {
        let b = SimulationBase {
            initial_investment: dec!(1000000),
            purchase_price: dec!(500000000),
            annual_rent: Decimal::ZERO,
            period_years: 5,
        };
        let a = ScenarioKind::Pessimistic.assumption(Decimal::ZERO, dec!(5000000));
        let (r, loss) = a.simulate(&b).unwrap();
        assert!(loss);
        assert_eq!(r.annual_return, dec!(-100));
    }

    #[test]
    fn test_runaway_projection_is_an_error() {
        let b = SimulationBase {
            initial_investment: dec!(100000000),
            purchase_price: Decimal::MAX / dec!(2),
            annual_rent: Decimal::ZERO,
            period_years: 10,
        };
        let a = ScenarioKind::Optimistic.assumption(Decimal::ZERO, Decimal::ZERO);
        assert!(matches!(
            a.simulate(&b),
            Err(RealtyCalcError::InvalidInput { .. })
        ));
    }
}
