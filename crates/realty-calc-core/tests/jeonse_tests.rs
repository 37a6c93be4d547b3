use pretty_assertions::assert_eq;
use realty_calc_core::config::{JeonseAssumptions, Region};
use realty_calc_core::form::form_fields;
use realty_calc_core::jeonse::{self, safety_score};
use realty_calc_core::{RealtyCalcError, RiskLevel};
use rust_decimal_macros::dec;

#[test]
fn test_sixty_percent_unit_is_low_risk() {
    let fields = form_fields([("purchase_price", "50000"), ("jeonse_price", "30000")]);
    let out = jeonse::compute(&fields).unwrap().result;

    assert_eq!(out.jeonse_ratio, dec!(60.0));
    assert_eq!(out.safety_score, 100);
    assert_eq!(out.risk_level, RiskLevel::Low);
    assert_eq!(out.market_risk, RiskLevel::Low);
    assert_eq!(out.gap_investment_amount, dec!(200_000_000));
    assert_eq!(out.gap_ratio, dec!(40));
}

#[test]
fn test_deposit_at_price_is_rejected() {
    let fields = form_fields([("purchase_price", "50000"), ("jeonse_price", "50000")]);
    match jeonse::compute(&fields) {
        Err(RealtyCalcError::Validation(errors)) => {
            assert!(errors.contains("jeonse_price"));
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_ratio_thresholds_are_strict() {
    let age = dec!(10);
    let area = dec!(84);
    assert_eq!(safety_score(dec!(60), age, area), 100);
    assert_eq!(safety_score(dec!(60.5), age, area), 99);
    // 20 points over 60 cost 40; nothing yet from the 80 rule
    assert_eq!(safety_score(dec!(80), age, area), 60);
    assert_eq!(safety_score(dec!(81), age, area), 55);
}

#[test]
fn test_high_ratio_old_small_unit() {
    let fields = form_fields([
        ("purchase_price", "30000"),
        ("jeonse_price", "27000"),
        ("building_age", "35"),
        ("area", "49"),
        ("region", "서울"),
    ]);
    let out = jeonse::compute(&fields).unwrap().result;

    // 90%: -60 -30 for ratio, -20 -10 for age, -5 for size
    assert_eq!(out.jeonse_ratio, dec!(90));
    assert_eq!(out.safety_score, 0);
    assert_eq!(out.risk_level, RiskLevel::High);
    assert_eq!(out.comparison.region, Region::Seoul);
    assert_eq!(out.comparison.difference, dec!(25));
}

#[test]
fn test_configured_regional_average() {
    let mut assumptions = JeonseAssumptions::default();
    assumptions.regional_averages.insert(Region::Seoul, dec!(55));
    let fields = form_fields([("purchase_price", "50000"), ("jeonse_price", "30000")]);
    let out = jeonse::compute_with(&fields, &assumptions).unwrap().result;
    assert_eq!(out.comparison.regional, dec!(55));
    assert_eq!(out.comparison.difference, dec!(5));
}
