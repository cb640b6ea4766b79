//! HTTP handlers

pub mod health;
pub mod page;
pub mod classify;
pub mod model;
