use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::RealtyCalcError;
use crate::types::{Money, Rate};
use crate::RealtyCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Convert an annual rate to the equivalent simple monthly rate (annual / 12).
pub fn monthly_rate(annual_rate: Rate) -> Rate {
    annual_rate / MONTHS_PER_YEAR
}

/// (1 + rate)^nper, failing instead of overflowing.
pub fn growth_factor(rate: Rate, nper: u32) -> RealtyCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| RealtyCalcError::InvalidInput {
            field: "rate".into(),
            reason: format!("(1 + {rate})^{nper} overflows"),
        })
}

/// Level installment that fully repays `principal` over `nper` periods.
///
/// `P * r(1+r)^n / ((1+r)^n - 1)`; a zero rate degrades to straight-line `P / n`.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> RealtyCalcResult<Money> {
    if nper == 0 {
        return Err(RealtyCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(RealtyCalcError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    // r(1+r)^n / ((1+r)^n - 1) stays near r; the principal is multiplied last
    rate.checked_mul(factor)
        .and_then(|x| x.checked_div(denominator))
        .and_then(|scale| principal.checked_mul(scale))
        .ok_or_else(|| overflow("annuity payment", nper))
}

/// Future value of an ordinary annuity: `PMT * ((1+i)^n - 1) / i`, or `PMT * n` at zero rate.
pub fn annuity_future_value(payment: Money, rate: Rate, nper: u32) -> RealtyCalcResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(nper))
            .ok_or_else(|| overflow("annuity future value", nper));
    }

    let factor = growth_factor(rate, nper)?;
    (factor - Decimal::ONE)
        .checked_div(rate)
        .and_then(|accumulated| payment.checked_mul(accumulated))
        .ok_or_else(|| overflow("annuity future value", nper))
}

fn overflow(what: &str, nper: u32) -> RealtyCalcError {
    RealtyCalcError::InvalidInput {
        field: "amount".into(),
        reason: format!("{what} over {nper} periods exceeds the representable range"),
    }
}

/// Annualised rate implied by a cumulative return: `(1 + total)^(1/years) - 1`.
///
/// Returns `None` when the growth base `1 + total` is not positive or `years` is not
/// positive, since no real root exists.
pub fn compound_annual_rate(total_return: Rate, years: Decimal) -> Option<Rate> {
    let base = Decimal::ONE + total_return;
    if base <= Decimal::ZERO || years <= Decimal::ZERO {
        return None;
    }
    if base == Decimal::ONE {
        return Some(Decimal::ZERO);
    }
    base.checked_powd(Decimal::ONE / years)
        .map(|root| root - Decimal::ONE)
}
