use realty_calc_core::config::{FairPriceAssumptions, Tier};
use realty_calc_core::fair_price::{self, age_factor, floor_factor, FairPriceInput, InvestmentValue};
use realty_calc_core::form::form_fields;
use realty_calc_core::round_money;
use rust_decimal_macros::dec;

fn unit(floor: u32, age_years: u32) -> FairPriceInput {
    FairPriceInput {
        apartment_name: "Helio City".into(),
        area_sqm: dec!(84),
        recent_transaction_price: dec!(1_000_000_000),
        floor,
        age_years,
        location: Tier::Average,
        condition: Tier::Average,
        amenities: Tier::Average,
        transit: Tier::Average,
    }
}

#[test]
fn test_neutral_grades_leave_only_floor_and_age() {
    for (floor, age) in [(1, 0), (3, 5), (9, 12), (20, 40)] {
        let input = unit(floor, age);
        let out = fair_price::calculate(&input).unwrap().result;
        let expected =
            round_money(input.recent_transaction_price * floor_factor(floor) * age_factor(age));
        assert_eq!(out.fair_price, expected, "floor {floor}, age {age}");
    }
}

#[test]
fn test_premium_unit_reads_as_overpriced() {
    let fields = form_fields([
        ("apartment_name", "Helio City"),
        ("area", "84"),
        ("recent_transactions", "100000"),
        ("floor", "20"),
        ("age", "0"),
        ("location", "우수"),
        ("condition", "최상"),
        ("facilities", "우수"),
        ("transportation_access", "우수"),
    ]);
    let out = fair_price::compute(&fields).unwrap().result;

    // 1.05 * 1.10 * 1.05 * 1.03 * 1.04
    assert_eq!(out.fair_price, dec!(1_299_097_800));
    assert_eq!(out.investment_value, InvestmentValue::Poor);
    assert!(out.negotiation.suggested_offer < out.negotiation.max_offer);
}

#[test]
fn test_custom_range_band() {
    let assumptions = FairPriceAssumptions {
        range_band: dec!(0.10),
        ..FairPriceAssumptions::default()
    };
    let out = fair_price::calculate_with(&unit(5, 0), &assumptions).unwrap().result;
    assert_eq!(out.price_range.min, dec!(900_000_000));
    assert_eq!(out.price_range.max, dec!(1_100_000_000));
}

#[test]
fn test_zero_area_rejected() {
    let fields = form_fields([
        ("apartment_name", "Helio City"),
        ("area", "0"),
        ("recent_transactions", "100000"),
    ]);
    assert!(fair_price::compute(&fields).is_err());
}
