//! # Quill Shared
//!
//! Wire types of the Quill HTTP API, shared by the server and its clients.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, ValidationErrorResponse};
