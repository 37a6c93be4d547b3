//! Jeonse ratio: deposit-to-price ratio, a heuristic safety score and the
//! gap a buyer would need to fund.

pub mod ratio;
pub mod safety;

pub use ratio::{calculate, calculate_with, compute, compute_with, JeonseInput, JeonseOutput};
pub use safety::safety_score;
