//! Vesting Property-Based Invariant Tests
//!
//! Uses proptest to verify critical system invariants across:
//! - Release curve bounds and monotonicity
//! - Revocation freezing and store bookkeeping
//! - Summary aggregation and response word encoding

pub mod codec_invariants;
pub mod schedule_invariants;
