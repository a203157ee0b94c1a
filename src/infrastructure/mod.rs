//! # Infrastructure Layer
//!
//! Adapters to the outside world: the message broker ([`messaging`]) and
//! the upstream market-data APIs ([`upstream`]).

pub mod messaging;
pub mod upstream;
