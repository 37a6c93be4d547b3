//! Gap investment: buying a unit with the sitting tenant's jeonse deposit
//! covering most of the price, so the buyer funds only the "gap".

pub mod returns;

pub use returns::{calculate, calculate_with, compute, compute_with, GapInput, GapOutput};
