//! Policy assumptions and lookup tables.
//!
//! Every constant a calculator reads from a table (regional averages, tier
//! multipliers, benchmark returns) or that a form falls back to lives here, so a
//! deployment can override it from a config file without touching the formulas.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RealtyCalcError;
use crate::types::{Percent, Rate};
use crate::RealtyCalcResult;

/// Assumptions for every calculator, as loaded from a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub loan: LoanAssumptions,
    pub gap: GapAssumptions,
    pub jeonse: JeonseAssumptions,
    pub fair_price: FairPriceAssumptions,
    pub roi: RoiAssumptions,
}

impl CalculatorConfig {
    pub fn from_json_str(json: &str) -> RealtyCalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanAssumptions {
    /// Annual return used for the invest-instead comparison when none is given
    pub default_investment_return: Rate,
    /// Longest loan term accepted, in years
    pub max_term_years: u32,
    /// Default loan term when the form leaves it blank
    pub default_term_years: u32,
}

impl Default for LoanAssumptions {
    fn default() -> Self {
        Self {
            default_investment_return: dec!(0.06),
            max_term_years: 50,
            default_term_years: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Gap investment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapAssumptions {
    /// Annual yield the owner is assumed to earn by deploying the jeonse deposit
    pub deposit_yield: Rate,
    pub default_transaction_cost_rate: Rate,
    pub default_holding_years: u32,
}

impl Default for GapAssumptions {
    fn default() -> Self {
        Self {
            deposit_yield: dec!(0.04),
            default_transaction_cost_rate: dec!(0.03),
            default_holding_years: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Jeonse ratio
// ---------------------------------------------------------------------------

/// Regions with a published average jeonse ratio
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Seoul,
    Gyeonggi,
    Incheon,
    Busan,
    Daegu,
    Gwangju,
    Daejeon,
    Ulsan,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Seoul,
        Region::Gyeonggi,
        Region::Incheon,
        Region::Busan,
        Region::Daegu,
        Region::Gwangju,
        Region::Daejeon,
        Region::Ulsan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Seoul => "seoul",
            Region::Gyeonggi => "gyeonggi",
            Region::Incheon => "incheon",
            Region::Busan => "busan",
            Region::Daegu => "daegu",
            Region::Gwangju => "gwangju",
            Region::Daejeon => "daejeon",
            Region::Ulsan => "ulsan",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = RealtyCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let region = match s.trim().to_ascii_lowercase().as_str() {
            "seoul" | "서울" => Region::Seoul,
            "gyeonggi" | "경기" => Region::Gyeonggi,
            "incheon" | "인천" => Region::Incheon,
            "busan" | "부산" => Region::Busan,
            "daegu" | "대구" => Region::Daegu,
            "gwangju" | "광주" => Region::Gwangju,
            "daejeon" | "대전" => Region::Daejeon,
            "ulsan" | "울산" => Region::Ulsan,
            other => {
                return Err(RealtyCalcError::InvalidInput {
                    field: "region".into(),
                    reason: format!("unsupported region '{other}'"),
                })
            }
        };
        Ok(region)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JeonseAssumptions {
    /// Historical average jeonse ratio per region, in percent
    pub regional_averages: BTreeMap<Region, Percent>,
    pub nationwide_average: Percent,
    /// Yield assumed on a jeonse deposit, in percent
    pub deposit_yield: Percent,
    pub default_building_age_years: Decimal,
    pub default_area_sqm: Decimal,
}

impl Default for JeonseAssumptions {
    fn default() -> Self {
        let regional_averages = BTreeMap::from([
            (Region::Seoul, dec!(65)),
            (Region::Gyeonggi, dec!(70)),
            (Region::Incheon, dec!(72)),
            (Region::Busan, dec!(75)),
            (Region::Daegu, dec!(78)),
            (Region::Gwangju, dec!(80)),
            (Region::Daejeon, dec!(77)),
            (Region::Ulsan, dec!(74)),
        ]);
        Self {
            regional_averages,
            nationwide_average: dec!(72),
            deposit_yield: dec!(4.0),
            default_building_age_years: dec!(10),
            default_area_sqm: dec!(84),
        }
    }
}

// ---------------------------------------------------------------------------
// Fair price
// ---------------------------------------------------------------------------

/// Four-step qualitative grade used by every categorical fair-price factor.
///
/// The site labels the grades differently per factor (우수/최상, 좋음,
/// 일반/보통, 불량/부족); all of them parse to the same four steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    #[default]
    Average,
    Poor,
}

impl FromStr for Tier {
    type Err = RealtyCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tier = match s.trim().to_ascii_lowercase().as_str() {
            "excellent" | "best" | "우수" | "최상" => Tier::Excellent,
            "good" | "좋음" => Tier::Good,
            "average" | "normal" | "일반" | "보통" => Tier::Average,
            "poor" | "lacking" | "불량" | "부족" => Tier::Poor,
            other => {
                return Err(RealtyCalcError::InvalidInput {
                    field: "tier".into(),
                    reason: format!("unknown grade '{other}'"),
                })
            }
        };
        Ok(tier)
    }
}

/// Price multiplier for each grade of one factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMultipliers {
    pub excellent: Decimal,
    pub good: Decimal,
    pub average: Decimal,
    pub poor: Decimal,
}

impl TierMultipliers {
    pub fn get(&self, tier: Tier) -> Decimal {
        match tier {
            Tier::Excellent => self.excellent,
            Tier::Good => self.good,
            Tier::Average => self.average,
            Tier::Poor => self.poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairPriceAssumptions {
    pub location: TierMultipliers,
    pub condition: TierMultipliers,
    pub amenities: TierMultipliers,
    pub transit: TierMultipliers,
    /// Half-width of the quoted price range around the fair price
    pub range_band: Rate,
    /// Discount from the fair price for the opening offer
    pub offer_discount: Rate,
    /// Square metres per pyeong
    pub sqm_per_pyeong: Decimal,
}

impl Default for FairPriceAssumptions {
    fn default() -> Self {
        Self {
            location: TierMultipliers {
                excellent: dec!(1.10),
                good: dec!(1.05),
                average: dec!(1.00),
                poor: dec!(0.95),
            },
            condition: TierMultipliers {
                excellent: dec!(1.05),
                good: dec!(1.02),
                average: dec!(1.00),
                poor: dec!(0.97),
            },
            amenities: TierMultipliers {
                excellent: dec!(1.03),
                good: dec!(1.01),
                average: dec!(1.00),
                poor: dec!(0.98),
            },
            transit: TierMultipliers {
                excellent: dec!(1.04),
                good: dec!(1.02),
                average: dec!(1.00),
                poor: dec!(0.97),
            },
            range_band: dec!(0.05),
            offer_discount: dec!(0.03),
            sqm_per_pyeong: dec!(3.3058),
        }
    }
}

// ---------------------------------------------------------------------------
// ROI simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkRisk {
    VeryLow,
    Low,
    Moderate,
    High,
}

/// Long-run reference return for an alternative asset class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub annual_return: Percent,
    pub risk: BenchmarkRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub stock_market: Benchmark,
    pub bonds: Benchmark,
    pub deposits: Benchmark,
    pub gold: Benchmark,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            stock_market: Benchmark {
                annual_return: dec!(8.5),
                risk: BenchmarkRisk::High,
            },
            bonds: Benchmark {
                annual_return: dec!(3.5),
                risk: BenchmarkRisk::Low,
            },
            deposits: Benchmark {
                annual_return: dec!(2.0),
                risk: BenchmarkRisk::VeryLow,
            },
            gold: Benchmark {
                annual_return: dec!(4.0),
                risk: BenchmarkRisk::Moderate,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiAssumptions {
    pub benchmarks: Benchmarks,
    pub default_tax_rate: Rate,
    pub default_inflation_rate: Rate,
    pub default_simulation_years: u32,
    pub default_holding_years: Decimal,
}

impl Default for RoiAssumptions {
    fn default() -> Self {
        Self {
            benchmarks: Benchmarks::default(),
            default_tax_rate: dec!(0.22),
            default_inflation_rate: dec!(0.025),
            default_simulation_years: 5,
            default_holding_years: dec!(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_region_has_an_average() {
        let jeonse = JeonseAssumptions::default();
        for region in Region::ALL {
            assert!(jeonse.regional_averages.contains_key(&region), "{region}");
        }
        assert_eq!(jeonse.regional_averages[&Region::Gwangju], dec!(80));
    }

    #[test]
    fn test_region_parses_korean_and_english() {
        assert_eq!("busan".parse::<Region>().unwrap(), Region::Busan);
        assert_eq!("대전".parse::<Region>().unwrap(), Region::Daejeon);
        assert!("jeju".parse::<Region>().is_err());
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!("최상".parse::<Tier>().unwrap(), Tier::Excellent);
        assert_eq!("일반".parse::<Tier>().unwrap(), Tier::Average);
        assert_eq!("보통".parse::<Tier>().unwrap(), Tier::Average);
        assert_eq!("부족".parse::<Tier>().unwrap(), Tier::Poor);
    }

    #[test]
    fn test_tier_multipliers_stay_in_band() {
        let fp = FairPriceAssumptions::default();
        for table in [fp.location, fp.condition, fp.amenities, fp.transit] {
            for tier in [Tier::Excellent, Tier::Good, Tier::Average, Tier::Poor] {
                let m = table.get(tier);
                assert!(m >= dec!(0.95) && m <= dec!(1.10), "{m}");
            }
            assert_eq!(table.get(Tier::Average), Decimal::ONE);
        }
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config =
            CalculatorConfig::from_json_str(r#"{"gap": {"deposit_yield": "0.05"}}"#).unwrap();
        assert_eq!(config.gap.deposit_yield, dec!(0.05));
        assert_eq!(config.gap.default_transaction_cost_rate, dec!(0.03));
        assert_eq!(config.roi, RoiAssumptions::default());
    }

    #[test]
    fn test_regional_override() {
        let config = CalculatorConfig::from_json_str(
            r#"{"jeonse": {"regional_averages": {"seoul": "60"}}}"#,
        )
        .unwrap();
        assert_eq!(config.jeonse.regional_averages[&Region::Seoul], dec!(60));
        assert!(!config.jeonse.regional_averages.contains_key(&Region::Busan));
    }
}
