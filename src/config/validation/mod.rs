//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `collector_validators`: collector and database settings
//! - `agent_validators`: agent settings
//! - `tests`: test suite for all validators

mod agent_validators;
mod collector_validators;
#[cfg(test)]
mod tests;
mod trait_def;

pub use trait_def::Validate;
