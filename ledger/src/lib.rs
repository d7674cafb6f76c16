//! # Vesting Ledger
//!
//! A **token vesting schedule engine**: schedules keyed by deterministic ids,
//! slice-quantised linear release curves with cliffs, milestone-driven
//! release, revocation that freezes accrual, and per-beneficiary /
//! per-category summaries.
//!
//! ## Quick start
//!
//! ```rust
//! use vesting_ledger::{
//!     aggregation, Address, Amount, Category, CreateScheduleParams, StoreConfig, VestingStore,
//!     VestingType,
//! };
//!
//! let beneficiary: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
//! let mut store = VestingStore::new(StoreConfig::default());
//!
//! // 1200 tokens over two minutes, one-second slices, no cliff.
//! let id = store
//!     .create(CreateScheduleParams {
//!         beneficiary,
//!         start: 1_000,
//!         cliff: 0,
//!         duration: 120,
//!         slice_period_seconds: 1,
//!         revocable: true,
//!         amount_total: Amount::from(1_200u32),
//!         category: Category::Team,
//!         vesting_type: VestingType::Linear,
//!     })
//!     .unwrap();
//!
//! assert_eq!(store.releasable(&id, 1_060).unwrap(), Amount::from(600u32));
//! store.release(&id, Amount::from(600u32), 1_060).unwrap();
//!
//! let summary = aggregation::summary(&store, &beneficiary, 1_060);
//! assert_eq!(summary.released_amount, Amount::from(600u32));
//! ```
//!
//! See [`calculator`] for the release formula and [`store`] for the
//! operation contracts.

pub mod aggregation;
pub mod backend;
pub mod calculator;
pub mod config;
pub mod error;
pub mod store;
pub mod types;


// Re-exports for convenience.
pub use {
    aggregation::{BeneficiarySummary, CategorySummary},
    backend::{InMemoryBackend, ScheduleBackend},
    config::{RevocationPolicy, StoreConfig},
    error::VestingError,
    store::VestingStore,
    types::{
        Address, Amount, Category, CreateScheduleParams, ScheduleId, TransferInstruction,
        VestingSchedule, VestingType,
    },
};
