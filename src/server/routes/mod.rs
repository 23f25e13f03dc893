//! HTTP route modules
//!
//! - `update`: URL and JSON updates
//! - `value`: current value queries
//! - `report`: HTML snapshot pages
//! - `health`: backup reachability

pub mod health;
pub mod report;
pub mod update;
pub mod value;

use actix_web::web;

/// Register every collector route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    update::configure_routes(cfg);
    value::configure_routes(cfg);
    health::configure_routes(cfg);
    report::configure_routes(cfg);
}
