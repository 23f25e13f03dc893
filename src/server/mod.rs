//! HTTP ingestion endpoint of the collector
//!
//! Handlers parse a request into wire records, convert and verify them, store
//! them through the [`StorageStrategy`](crate::storage::StorageStrategy) and
//! answer with the post-update values.

pub mod builder;
pub mod middleware;
pub mod report;
pub mod routes;
pub mod server;
pub mod state;


pub use builder::run_server;
pub use report::PageBuilder;
pub use server::HttpServer;
pub use state::AppState;
