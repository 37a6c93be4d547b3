pub mod factors;
pub mod valuation;

pub use factors::{age_factor, floor_factor, AppliedFactors};
pub use valuation::{
    calculate, calculate_with, compute, compute_with, FairPriceInput, FairPriceOutput,
    InvestmentValue, MarketComparison, Negotiation, PriceRange,
};
