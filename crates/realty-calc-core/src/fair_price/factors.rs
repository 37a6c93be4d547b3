use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{FairPriceAssumptions, Tier};

const GROUND_FLOOR_FACTOR: Decimal = dec!(0.98);
const HIGH_FLOOR_FACTOR: Decimal = dec!(1.05);
const HIGH_FLOOR: u32 = 15;
const REFERENCE_FLOOR: Decimal = dec!(5);
const PER_FLOOR_STEP: Decimal = dec!(0.005);

const AGE_FACTOR_FLOOR: Decimal = dec!(0.85);
const PER_YEAR_DEPRECIATION: Decimal = dec!(0.01);

/// Ground floor and below trade at a discount, 15 and up at a fixed premium,
/// and the floors in between scale linearly around the 5th.
pub fn floor_factor(floor: u32) -> Decimal {
    if floor <= 1 {
        GROUND_FLOOR_FACTOR
    } else if floor >= HIGH_FLOOR {
        HIGH_FLOOR_FACTOR
    } else {
        Decimal::ONE + (Decimal::from(floor) - REFERENCE_FLOOR) * PER_FLOOR_STEP
    }
}

/// One percent off per year of building age, never below 0.85.
pub fn age_factor(age_years: u32) -> Decimal {
    (Decimal::ONE - Decimal::from(age_years) * PER_YEAR_DEPRECIATION).max(AGE_FACTOR_FLOOR)
}

/// Every multiplier that went into a fair price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFactors {
    pub floor: Decimal,
    pub age: Decimal,
    pub location: Decimal,
    pub condition: Decimal,
    pub amenities: Decimal,
    pub transit: Decimal,
}

impl AppliedFactors {
    pub fn resolve(
        floor: u32,
        age_years: u32,
        location: Tier,
        condition: Tier,
        amenities: Tier,
        transit: Tier,
        assumptions: &FairPriceAssumptions,
    ) -> Self {
        Self {
            floor: floor_factor(floor),
            age: age_factor(age_years),
            location: assumptions.location.get(location),
            condition: assumptions.condition.get(condition),
            amenities: assumptions.amenities.get(amenities),
            transit: assumptions.transit.get(transit),
        }
    }

    pub fn product(&self) -> Decimal {
        self.floor * self.age * self.location * self.condition * self.amenities * self.transit
    }
}
