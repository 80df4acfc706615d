//! Claims intake core: configuration schema, attribute validation and claim
//! orchestration over storage ports.
//!
//! No database code lives here. Postgres adapters are in `claims_postgres`,
//! the HTTP gateway in `claims_server`.

pub mod attribute;
pub mod claim;
pub mod config;
pub mod error;
pub mod ordered_map;
pub mod ports;
pub mod proto;
pub mod schema;
pub mod service;
pub mod stores;
pub mod validate;

pub use error::{ClaimsError, ErrorCode};
pub use service::{ClaimsService, ClaimsServiceImpl};
