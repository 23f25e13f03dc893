//! Common test utilities for metrics-relay
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures::TestCollector;
//!
//! #[actix_web::test]
//! async fn my_test() {
//!     let collector = TestCollector::file_backed(300).await;
//!     // ...
//! }
//! ```

pub mod fixtures;

pub use fixtures::TestCollector;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
