use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{round_dp, Percent, RiskLevel};

const RATIO_SOFT_LIMIT: Percent = dec!(60);
const RATIO_HARD_LIMIT: Percent = dec!(80);
const AGE_SOFT_LIMIT: Decimal = dec!(15);
const AGE_HARD_LIMIT: Decimal = dec!(30);
const SMALL_UNIT_SQM: Decimal = dec!(60);
const LARGE_UNIT_SQM: Decimal = dec!(135);

/// Safety score out of 100.
///
/// Penalties stack: every ratio point above 60 costs 2, and every point above
/// 80 costs a further 3; every year of age above 15 costs 1, above 30 a
/// further 2; units under 60㎡ lose 5 and units over 135㎡ lose 3. Limits are
/// strict, so a ratio of exactly 60 or 80 adds nothing.
pub fn safety_score(ratio: Percent, building_age_years: Decimal, area_sqm: Decimal) -> u32 {
    let mut score = dec!(100);

    if ratio > RATIO_SOFT_LIMIT {
        score -= (ratio - RATIO_SOFT_LIMIT) * dec!(2);
    }
    if ratio > RATIO_HARD_LIMIT {
        score -= (ratio - RATIO_HARD_LIMIT) * dec!(3);
    }

    if building_age_years > AGE_SOFT_LIMIT {
        score -= building_age_years - AGE_SOFT_LIMIT;
    }
    if building_age_years > AGE_HARD_LIMIT {
        score -= (building_age_years - AGE_HARD_LIMIT) * dec!(2);
    }

    if area_sqm < SMALL_UNIT_SQM {
        score -= dec!(5);
    }
    if area_sqm > LARGE_UNIT_SQM {
        score -= dec!(3);
    }

    round_dp(score, 0)
        .clamp(Decimal::ZERO, dec!(100))
        .to_u32()
        .unwrap_or(0)
}

/// Market risk read off the safety score alone.
pub fn market_risk(score: u32) -> RiskLevel {
    match score {
        80.. => RiskLevel::Low,
        60..=79 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// Investment risk tier and the advice shown with it.
///
/// The low tier needs both a modest ratio and a healthy score; a low ratio on
/// an old or awkwardly sized unit still drops to the ratio-only tiers.
pub fn risk_level(ratio: Percent, score: u32) -> (RiskLevel, &'static str) {
    if ratio <= dec!(60) && score >= 70 {
        (
            RiskLevel::Low,
            "Very safe range. Well suited to a gap investment.",
        )
    } else if ratio <= dec!(70) && score >= 60 {
        (RiskLevel::Low, "Safe range. Suitable for a gap investment.")
    } else if ratio <= dec!(80) {
        (
            RiskLevel::Medium,
            "Moderate risk. Review the property carefully before committing.",
        )
    } else {
        (
            RiskLevel::High,
            "High risk. Reconsider the investment.",
        )
    }
}
