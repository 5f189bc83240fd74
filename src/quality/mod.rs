// src/quality/mod.rs
//! Quality indicators derived from the sample window

pub mod metrics;

pub use metrics::{artifact_score, MetricsCalculator, QualityAssessment, QualityLevel};
