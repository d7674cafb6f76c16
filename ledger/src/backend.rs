//! Storage seam for vesting schedules.
//!
//! The store never assumes a single global ledger: it works against any
//! [`ScheduleBackend`]. [`InMemoryBackend`] is the default; remote state is
//! brought in by mirroring it into a backend through the chain read client.

use {
    crate::{
        error::{Result, VestingError},
        types::{Address, ScheduleId, VestingSchedule},
    },
    std::collections::HashMap,
};

/// Append-only schedule storage with a per-beneficiary index.
///
/// Implementations must keep both id lists in insertion order and must never
/// remove or reorder entries.
pub trait ScheduleBackend {
    fn get(&self, id: &ScheduleId) -> Option<&VestingSchedule>;

    fn get_mut(&mut self, id: &ScheduleId) -> Option<&mut VestingSchedule>;

    /// Ids of `beneficiary`'s schedules, index order.
    fn ids_for_beneficiary(&self, beneficiary: &Address) -> &[ScheduleId];

    /// Every id, creation order.
    fn ids(&self) -> &[ScheduleId];

    /// Append a schedule. Fails with [`VestingError::DuplicateSchedule`] if the
    /// id is taken.
    fn insert(&mut self, schedule: VestingSchedule) -> Result<()>;
}

/// Hash-map backed storage for tests and local mirrors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    schedules: HashMap<ScheduleId, VestingSchedule>,
    by_beneficiary: HashMap<Address, Vec<ScheduleId>>,
    order: Vec<ScheduleId>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ScheduleBackend for InMemoryBackend {
    fn get(&self, id: &ScheduleId) -> Option<&VestingSchedule> {
        self.schedules.get(id)
    }

    fn get_mut(&mut self, id: &ScheduleId) -> Option<&mut VestingSchedule> {
        self.schedules.get_mut(id)
    }

    fn ids_for_beneficiary(&self, beneficiary: &Address) -> &[ScheduleId] {
        self.by_beneficiary
            .get(beneficiary)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn ids(&self) -> &[ScheduleId] {
        &self.order
    }

    fn insert(&mut self, schedule: VestingSchedule) -> Result<()> {
        if self.schedules.contains_key(&schedule.id) {
            return Err(VestingError::DuplicateSchedule(schedule.id));
        }
        self.by_beneficiary
            .entry(schedule.beneficiary)
            .or_default()
            .push(schedule.id);
        self.order.push(schedule.id);
        self.schedules.insert(schedule.id, schedule);
        Ok(())
    }
}
