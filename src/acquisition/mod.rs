// src/acquisition/mod.rs
//! Sample buffering components

pub mod sliding_window;

pub use sliding_window::*;
