//! Mortgage repayment: amortization schedules for the two Korean repayment
//! conventions plus the comparison, prepayment, rate-shock and
//! invest-instead analyses built on top of them.

pub mod amortization;
pub mod calculator;

pub use amortization::{AmortizationEntry, LoanTerms, RepaymentMethod};
pub use calculator::{calculate, calculate_with, compute, compute_with, LoanInput, LoanOutput};
