// src/view/mod.rs
//! Display-only projections of engine output

pub mod chart;
pub mod readouts;

pub use chart::{chart_points, ChartPoint};
pub use readouts::{metric_readouts, snapshot_readouts, MetricReadout, Status};
