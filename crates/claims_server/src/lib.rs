//! claims_server: HTTP gateway for the claims intake service.
//!
//! Everything is mounted under `/api`. All routes except `/api/health`
//! require the caller's identity in the `x-userid` header.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
