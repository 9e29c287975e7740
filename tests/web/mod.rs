//! # Web API Integration Tests
//!
//! End-to-end tests against a real listener:
//! - Anonymous requests to every item route
//! - Owner and non-owner item operations
//! - Session cookies, sign-in page and sign-out
//! - Health endpoints and request IDs

pub mod session_tests;
pub mod test_infrastructure;

/// Re-export common test utilities
pub use test_infrastructure::*;
