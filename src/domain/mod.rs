//! # Domain Layer
//!
//! Core domain types shared by the RPC protocol, the workers, and the
//! HTTP boundary. The domain layer has no I/O and no broker or HTTP
//! dependencies.

pub mod value_objects;
