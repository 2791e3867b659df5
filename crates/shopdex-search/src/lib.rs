//! The store discovery engine: strategy planning, remote-result
//! reconciliation, and the shared pagination/filtering contract.

mod error;
mod filter;
mod planner;
mod strategy;

pub use error::SearchError;
pub use filter::{apply_filters, matches_filters};
pub use planner::{SearchPlanner, TRGM_SIMILARITY_FLOOR};
pub use strategy::SearchStrategy;
