//! Backend test support utilities
//!
//! Shared by the backend's integration tests: logging initialization and
//! assertions on the problem+json error contract.

pub mod logging;
pub mod problem_details;
