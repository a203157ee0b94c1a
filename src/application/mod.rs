//! # Application Layer
//!
//! Use-case orchestration between the domain types and the
//! infrastructure adapters.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
