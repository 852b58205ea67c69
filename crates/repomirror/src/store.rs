//! Read and maintenance operations on the mirrored data.
//!
//! Sync runs write issues, commits and users through [`crate::sync`]; this
//! module covers everything operators and reports need around them.

pub mod commits;
mod errors;
pub mod issues;
pub mod repos;
pub mod users;

pub use errors::{Result, StoreError};
pub use repos::Checkpoint;
