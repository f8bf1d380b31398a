//! # Domain Layer
//!
//! Pure parsing and cryptographic logic with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod freshness;
pub mod payload;
pub mod principal;
pub mod secret;
pub mod signature;
