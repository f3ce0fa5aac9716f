//! # Message Store Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks for the store domain
//! └── src/integration/  # Store + bus + node flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p store-tests
//!
//! # By category
//! cargo test -p store-tests integration::flows::
//! cargo test -p store-tests integration::node::
//!
//! # Benchmarks
//! cargo bench -p store-tests
//! ```

#![allow(unused_variables)]
#![allow(dead_code)]

pub mod integration;
