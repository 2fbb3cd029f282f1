pub mod browser;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
