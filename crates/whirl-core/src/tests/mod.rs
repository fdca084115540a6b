//! Crate-level scenario tests.
//!
//! - `helpers.rs`: scripted mock collaborators and input shortcuts
//! - `integration.rs`: end-to-end controller scenarios
//! - `properties.rs`: proptest properties for hit and timer invariants

mod helpers;
mod integration;

pub use helpers::*;
