//! Stats resources and their concurrent aggregation.

pub mod aggregator;
pub mod models;

pub use aggregator::aggregate_stats;
pub use models::{
    ByTimeClass, DrawBreakdown, FinishBreakdown, GameRecord, StatsBundle, StatsResource,
};
