//! Shared test utilities for jobtrail integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs against a temporary mail tree and ledger
//! - Builder patterns for configs and `.eml` messages

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
