//! # API Layer
//!
//! External interfaces; currently the REST boundary only.

pub mod rest;
