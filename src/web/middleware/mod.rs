//! # Web API Middleware
//!
//! - [`request_id`] - `x-request-id` generation and propagation
//! - [`session`] - session cookie resolution into the current actor

pub mod request_id;
pub mod session;
