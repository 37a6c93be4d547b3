use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RealtyCalcError;
use crate::time_value::{annuity_payment, monthly_rate};
use crate::types::*;
use crate::RealtyCalcResult;

/// Longest horizon the yearly schedule covers, in months
pub const SCHEDULE_CAP_MONTHS: u32 = 360;

/// Repayment convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentMethod {
    /// 원리금균등: constant installment, interest share shrinking over time
    #[default]
    EqualPayment,
    /// 원금균등: constant principal slice, installment shrinking over time
    EqualPrincipal,
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepaymentMethod::EqualPayment => f.write_str("equal_payment"),
            RepaymentMethod::EqualPrincipal => f.write_str("equal_principal"),
        }
    }
}

impl FromStr for RepaymentMethod {
    type Err = RealtyCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal_payment" | "equal" | "원리금균등" => Ok(RepaymentMethod::EqualPayment),
            "equal_principal" | "principal" | "원금균등" => Ok(RepaymentMethod::EqualPrincipal),
            other => Err(RealtyCalcError::InvalidInput {
                field: "payment_type".into(),
                reason: format!("unknown repayment method '{other}'"),
            }),
        }
    }
}

/// A fully specified loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub method: RepaymentMethod,
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_rate)
    }

    /// Constant principal slice repaid each month under equal-principal.
    pub fn principal_slice(&self) -> Money {
        if self.term_months == 0 {
            return Decimal::ZERO;
        }
        self.principal / Decimal::from(self.term_months)
    }

    /// Principal repaid in a month that starts with `balance` outstanding.
    fn principal_due(&self, installment: Money, balance: Money) -> Money {
        match self.method {
            RepaymentMethod::EqualPayment => installment - balance * self.monthly_rate(),
            RepaymentMethod::EqualPrincipal => installment,
        }
    }

    /// The per-month constant of the selected method: the level installment for
    /// equal-payment, the principal slice for equal-principal.
    pub fn base_installment(&self) -> RealtyCalcResult<Money> {
        match self.method {
            RepaymentMethod::EqualPayment => equal_payment_installment(self),
            RepaymentMethod::EqualPrincipal => Ok(self.principal_slice()),
        }
    }

    /// Walk the first `months` months and return (balance, interest paid).
    pub fn roll_forward(&self, months: u32) -> RealtyCalcResult<(Money, Money)> {
        let installment = self.base_installment()?;
        let r = self.monthly_rate();
        let mut balance = self.principal;
        let mut interest_paid = Decimal::ZERO;

        for _ in 0..months {
            interest_paid += balance * r;
            balance -= self.principal_due(installment, balance);
        }

        Ok((balance, interest_paid))
    }
}

/// One yearly row of the repayment schedule.
///
/// `principal`, `interest` and `payment` are totals over the months of the
/// year; `monthly_payment` is the installment due in the year's last month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub year: u32,
    pub principal: Money,
    pub interest: Money,
    pub payment: Money,
    pub monthly_payment: Money,
    pub balance: Money,
}

/// Level monthly installment: `P * r(1+r)^n / ((1+r)^n - 1)`.
pub fn equal_payment_installment(terms: &LoanTerms) -> RealtyCalcResult<Money> {
    annuity_payment(terms.principal, terms.monthly_rate(), terms.term_months)
}

/// Total interest under equal-principal repayment, simulated month by month.
pub fn equal_principal_total_interest(terms: &LoanTerms) -> Money {
    let slice = terms.principal_slice();
    let r = terms.monthly_rate();
    let mut balance = terms.principal;
    let mut total = Decimal::ZERO;

    for _ in 0..terms.term_months {
        total += balance * r;
        balance -= slice;
    }

    total
}

/// Yearly repayment schedule over the first `min(term, 360)` months.
pub fn amortization_schedule(terms: &LoanTerms) -> RealtyCalcResult<Vec<AmortizationEntry>> {
    let installment = terms.base_installment()?;
    let r = terms.monthly_rate();
    let months = terms.term_months.min(SCHEDULE_CAP_MONTHS);

    let mut schedule = Vec::with_capacity(months.div_ceil(12) as usize);
    let mut balance = terms.principal;
    let mut year_principal = Decimal::ZERO;
    let mut year_interest = Decimal::ZERO;

    for month in 1..=months {
        let interest = balance * r;
        let principal = terms.principal_due(installment, balance);
        balance -= principal;

        year_principal += principal;
        year_interest += interest;

        if month % 12 == 0 || month == terms.term_months {
            schedule.push(AmortizationEntry {
                year: month.div_ceil(12),
                principal: round_money(year_principal),
                interest: round_money(year_interest),
                payment: round_money(year_principal + year_interest),
                monthly_payment: round_money(principal + interest),
                balance: round_money(balance.max(Decimal::ZERO)),
            });
            year_principal = Decimal::ZERO;
            year_interest = Decimal::ZERO;
        }
    }

    Ok(schedule)
}
