//! Integration tests for metrics-relay
//!
//! These tests wire the real storage, converter and HTTP layers together.

pub mod collector_tests;
pub mod durability_tests;
pub mod transport_tests;
