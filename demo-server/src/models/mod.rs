//! Data models

pub mod flow;

pub use flow::*;
