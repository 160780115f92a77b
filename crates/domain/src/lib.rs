//! Domain layer for the SafeHome notification client.
//!
//! This crate contains:
//! - Wire and view models (alerts, push messages, device registration)
//! - Service traits with mock implementations for testing

pub mod models;
pub mod services;
