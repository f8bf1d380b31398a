//! # SpokSpace Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks for the verifier
//! └── src/integration/  # Flows across init data, gateway and runtime
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p spok-tests
//!
//! # Benchmarks
//! cargo bench -p spok-tests
//! ```

#![allow(dead_code)]

pub mod integration;
