//! # Blogicum Shared
//!
//! Request and response bodies of the JSON API. Kept free of server code so
//! clients can depend on it directly.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
