use pretty_assertions::assert_eq;
use proptest::prelude::*;
use realty_calc_core::form::form_fields;
use realty_calc_core::loan::amortization::{
    amortization_schedule, equal_payment_installment, equal_principal_total_interest,
};
use realty_calc_core::loan::{self, LoanInput, LoanTerms, RepaymentMethod};
use realty_calc_core::RealtyCalcError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Concrete mortgage
// ===========================================================================

fn thirty_year_mortgage() -> LoanInput {
    // 3억 at 4.5% over 30 years
    LoanInput {
        loan_amount: dec!(300_000_000),
        annual_rate: dec!(0.045),
        term_years: 30,
        method: RepaymentMethod::EqualPayment,
        early_repayment_amount: Decimal::ZERO,
        investment_return: dec!(0.06),
    }
}

#[test]
fn test_thirty_year_equal_payment() {
    let out = loan::calculate(&thirty_year_mortgage()).unwrap().result;

    assert!((out.monthly_payment - dec!(1_520_000)).abs() <= dec!(1000));
    assert!((out.total_interest - dec!(247_000_000)).abs() <= dec!(500_000));
    // Only the first ten years are displayed
    assert_eq!(out.schedule.len(), 10);
}

#[test]
fn test_form_entry_matches_typed_entry() {
    let fields = form_fields([
        ("loan_amount", "30,000"),
        ("interest_rate", "4.5"),
        ("loan_period", "30"),
        ("payment_type", "equal_payment"),
    ]);
    let from_form = loan::compute(&fields).unwrap().result;
    let typed = loan::calculate(&thirty_year_mortgage()).unwrap().result;

    assert_eq!(from_form.monthly_payment, typed.monthly_payment);
    assert_eq!(from_form.total_interest, typed.total_interest);
}

#[test]
fn test_validation_keys_match_form_fields() {
    let fields = form_fields([("loan_amount", "0"), ("interest_rate", "abc")]);
    match loan::compute(&fields) {
        Err(RealtyCalcError::Validation(errors)) => {
            assert!(errors.contains("loan_amount"));
            assert!(errors.contains("interest_rate"));
            assert!(!errors.contains("loan_period"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ===========================================================================
// Schedule invariants
// ===========================================================================

#[test]
fn test_equal_payment_principal_sums_to_loan() {
    let terms = thirty_year_mortgage().terms();
    let schedule = amortization_schedule(&terms).unwrap();

    let repaid: Decimal = schedule.iter().map(|row| row.principal).sum();
    // One won of rounding slack per yearly row
    assert!((repaid - terms.principal).abs() <= Decimal::from(schedule.len() as u64));

    let last = schedule.last().unwrap();
    assert!(last.balance <= dec!(1));
}

#[test]
fn test_equal_principal_schedule_clears_balance() {
    let terms = LoanTerms {
        principal: dec!(120_000_000),
        annual_rate: dec!(0.04),
        term_months: 120,
        method: RepaymentMethod::EqualPrincipal,
    };
    let schedule = amortization_schedule(&terms).unwrap();
    assert_eq!(schedule.len(), 10);
    assert_eq!(schedule[0].principal, dec!(12_000_000));
    assert_eq!(schedule.last().unwrap().balance, Decimal::ZERO);
    // Payments shrink as the balance does
    assert!(schedule[0].payment > schedule[9].payment);
}

#[test]
fn test_full_early_repayment_saves_remaining_interest() {
    let mut input = thirty_year_mortgage();
    input.early_repayment_amount = dec!(300_000_000);
    let out = loan::calculate(&input).unwrap().result;

    assert_eq!(out.early_repayment.len(), 3);
    for point in &out.early_repayment {
        assert_eq!(point.balance_after_repayment, Decimal::ZERO);
        assert!(point.saved_interest > Decimal::ZERO);
    }
    // Paying off later leaves less interest to save
    assert!(out.early_repayment[0].saved_interest > out.early_repayment[2].saved_interest);
}

#[test]
fn test_short_loan_skips_late_horizons() {
    let mut input = thirty_year_mortgage();
    input.term_years = 5;
    let out = loan::calculate(&input).unwrap();

    let horizons: Vec<u32> = out.result.early_repayment.iter().map(|p| p.horizon_years).collect();
    assert_eq!(horizons, vec![3]);
    assert_eq!(out.warnings.len(), 2);
}

#[test]
fn test_partial_early_repayment_known_answers() {
    // 5000만원 prepaid: the linear estimate of the remaining interest exceeds
    // the amortised total, so nothing is reported as saved
    let mut input = thirty_year_mortgage();
    input.early_repayment_amount = dec!(50_000_000);
    let out = loan::calculate(&input).unwrap().result;

    let points: Vec<(u32, Decimal, Decimal, Decimal)> = out
        .early_repayment
        .iter()
        .map(|p| {
            (
                p.horizon_years,
                p.remaining_balance,
                p.balance_after_repayment,
                p.saved_interest,
            )
        })
        .collect();
    assert_eq!(
        points,
        vec![
            (3, dec!(284_803_744), dec!(234_803_744), Decimal::ZERO),
            (5, dec!(273_473_751), dec!(223_473_751), Decimal::ZERO),
            (10, dec!(240_268_304), dec!(190_268_304), Decimal::ZERO),
        ]
    );
}

#[test]
fn test_method_comparison_known_answers() {
    let out = loan::calculate(&thirty_year_mortgage()).unwrap().result;
    let c = &out.comparison;

    assert_eq!(c.equal_payment.monthly_payment, dec!(1_520_056));
    assert_eq!(c.equal_payment.total_interest, dec!(247_220_135));
    assert_eq!(c.equal_principal.first_payment, dec!(1_958_333));
    assert_eq!(c.equal_principal.last_payment, dec!(836_458));
    assert_eq!(c.equal_principal.total_interest, dec!(203_062_500));
    assert_eq!(c.savings, dec!(44_157_635));
}

#[test]
fn test_rate_sensitivity_known_answers() {
    let out = loan::calculate(&thirty_year_mortgage()).unwrap().result;
    let s = &out.rate_sensitivity;

    assert_eq!(s.rate_1pp_lower.annual_rate, dec!(0.035));
    assert_eq!(s.rate_1pp_lower.monthly_payment, dec!(1_347_134));
    assert_eq!(s.rate_1pp_lower.total_interest, dec!(184_968_263));

    assert_eq!(s.rate_1pp_higher.annual_rate, dec!(0.055));
    assert_eq!(s.rate_1pp_higher.monthly_payment, dec!(1_703_367));
    assert_eq!(s.rate_1pp_higher.total_interest, dec!(313_212_121));

    assert_eq!(s.rate_2pp_higher.annual_rate, dec!(0.065));
    assert_eq!(s.rate_2pp_higher.monthly_payment, dec!(1_896_204));
    assert_eq!(s.rate_2pp_higher.total_interest, dec!(382_633_465));
}

// ===========================================================================
// Extreme inputs
// ===========================================================================

fn expect_field_error(fields: &realty_calc_core::FormFields, field: &str) {
    match loan::compute(fields) {
        Err(RealtyCalcError::Validation(errors)) => {
            assert!(errors.contains(field), "missing {field} in {errors}")
        }
        other => panic!("expected validation error on {field}, got {other:?}"),
    }
}

#[test]
fn test_investment_return_above_cap_rejected() {
    let fields = form_fields([
        ("loan_amount", "30,000"),
        ("interest_rate", "4.5"),
        ("loan_period", "50"),
        ("investment_return", "100"),
    ]);
    expect_field_error(&fields, "investment_return");
}

#[test]
fn test_oversized_loan_amount_rejected() {
    let fields = form_fields([
        ("loan_amount", "12345678901234567890123456"),
        ("interest_rate", "4.5"),
        ("loan_period", "30"),
    ]);
    expect_field_error(&fields, "loan_amount");

    let mut typed = thirty_year_mortgage();
    typed.loan_amount = dec!(2_000_000_000_000_000);
    assert!(matches!(
        loan::calculate(&typed),
        Err(RealtyCalcError::Validation(_))
    ));
}

#[test]
fn test_negative_amount_text_rejected() {
    let fields = form_fields([
        ("loan_amount", "-30,000"),
        ("interest_rate", "4.5"),
        ("loan_period", "30"),
    ]);
    expect_field_error(&fields, "loan_amount");
}

#[test]
fn test_extreme_valid_loan_completes() {
    // 100억 at 100% over 50 years, the widest the form accepts for rate and term
    let fields = form_fields([
        ("loan_amount", "1,000,000"),
        ("interest_rate", "100"),
        ("loan_period", "50"),
        ("early_payment_amount", "10,000"),
        ("investment_return", "50"),
    ]);
    let out = loan::compute(&fields).unwrap().result;
    assert!(out.monthly_payment > Decimal::ZERO);
    assert_eq!(out.early_repayment.len(), 3);
    assert!(out.investment_alternative.future_value > out.total_payment);
}

// ===========================================================================
// Properties
// ===========================================================================

fn total_equal_payment_interest(terms: &LoanTerms) -> Decimal {
    let pmt = equal_payment_installment(terms).unwrap();
    pmt * Decimal::from(terms.term_months) - terms.principal
}

proptest! {
    #[test]
    fn equal_principal_never_costs_more(
        man_won in 1_000u32..1_000_000,
        rate_bp in 10u32..2_000,
        years in 1u32..=50,
    ) {
        let terms = LoanTerms {
            principal: Decimal::from(man_won) * dec!(10_000),
            annual_rate: Decimal::new(rate_bp as i64, 4),
            term_months: years * 12,
            method: RepaymentMethod::EqualPayment,
        };
        let principal_interest = equal_principal_total_interest(&terms);
        let payment_interest = total_equal_payment_interest(&terms);
        prop_assert!(principal_interest < payment_interest);
    }

    #[test]
    fn interest_rises_with_rate(
        man_won in 1_000u32..1_000_000,
        rate_bp in 10u32..2_000,
        bump_bp in 1u32..500,
        years in 1u32..=40,
    ) {
        let low = LoanTerms {
            principal: Decimal::from(man_won) * dec!(10_000),
            annual_rate: Decimal::new(rate_bp as i64, 4),
            term_months: years * 12,
            method: RepaymentMethod::EqualPayment,
        };
        let high = LoanTerms {
            annual_rate: Decimal::new((rate_bp + bump_bp) as i64, 4),
            ..low.clone()
        };
        prop_assert!(total_equal_payment_interest(&high) > total_equal_payment_interest(&low));
        prop_assert!(equal_principal_total_interest(&high) > equal_principal_total_interest(&low));
    }
}
