//! The vesting schedule store.
//!
//! Single-threaded by construction: every mutating operation takes
//! `&mut self`, so callers sharing a store across threads must wrap it in a
//! lock (one writer for `create` / `release` / `revoke`, any number of readers
//! for lookups and summaries).

use {
    crate::{
        backend::{InMemoryBackend, ScheduleBackend},
        calculator::{self, saturating_sub, MILESTONE_BPS_DENOMINATOR},
        config::{RevocationPolicy, StoreConfig},
        error::{Result, VestingError},
        types::{
            Address, Amount, Category, CreateScheduleParams, ScheduleId, TransferInstruction,
            VestingSchedule, VestingType,
        },
    },
    log::{debug, info},
    num_traits::Zero,
};

/// Collection of vesting schedules keyed by [`ScheduleId`].
#[derive(Debug, Clone)]
pub struct VestingStore<B: ScheduleBackend = InMemoryBackend> {
    backend: B,
    config: StoreConfig,
    pending_transfers: Vec<TransferInstruction>,
}

impl VestingStore<InMemoryBackend> {
    /// Create an empty in-memory store.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_backend(InMemoryBackend::new(), config)
    }
}

impl Default for VestingStore<InMemoryBackend> {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<B: ScheduleBackend> VestingStore<B> {
    pub fn with_backend(backend: B, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            pending_transfers: Vec::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Create a schedule and append it to the beneficiary's list.
    ///
    /// The returned id is `ScheduleId::derive(beneficiary, n)` where `n` is
    /// the number of schedules the beneficiary had before this call.
    pub fn create(&mut self, params: CreateScheduleParams) -> Result<ScheduleId> {
        params.validate()?;
        let index = self.count_by_beneficiary(&params.beneficiary);
        let schedule = VestingSchedule::from_params(params, index);
        let id = schedule.id;

        info!(
            "created vesting schedule {} for {} (index {}, {} {}, amount {})",
            id,
            schedule.beneficiary,
            index,
            schedule.category,
            schedule.vesting_type,
            schedule.amount_total
        );
        self.backend.insert(schedule)?;
        Ok(id)
    }

    /// Append an already-existing schedule, e.g. one read from the remote
    /// ledger.
    ///
    /// The schedule must sit at the beneficiary's next index, so mirrors
    /// have to be hydrated in index order.
    pub fn adopt(&mut self, mut schedule: VestingSchedule) -> Result<ScheduleId> {
        if !schedule.initialized {
            return Err(VestingError::NotInitialized(schedule.id));
        }
        schedule.validate()?;

        let expected = self.next_schedule_id(&schedule.beneficiary);
        if schedule.id != expected {
            return Err(VestingError::ScheduleIdMismatch {
                expected,
                actual: schedule.id,
            });
        }
        if schedule.revoked && schedule.vested_at_revocation.is_none() {
            schedule.vested_at_revocation = Some(schedule.released.clone());
        }

        let id = schedule.id;
        debug!("adopted vesting schedule {} for {}", id, schedule.beneficiary);
        self.backend.insert(schedule)?;
        Ok(id)
    }

    /// Release `amount` from schedule `id` at time `now`.
    ///
    /// On success the released counter grows by `amount` and a
    /// [`TransferInstruction`] is queued for the token collaborator.
    pub fn release(&mut self, id: &ScheduleId, amount: Amount, now: u64) -> Result<Amount> {
        let schedule = self
            .backend
            .get_mut(id)
            .ok_or(VestingError::NotInitialized(*id))?;

        let releasable = calculator::releasable_amount(schedule, now);
        if schedule.revoked && releasable.is_zero() {
            return Err(VestingError::Revoked(*id));
        }
        if amount > releasable {
            return Err(VestingError::InsufficientReleasable {
                id: *id,
                requested: amount,
                releasable,
            });
        }

        schedule.released += &amount;
        debug!(
            "released {} from {} ({} of {} now released)",
            amount, id, schedule.released, schedule.amount_total
        );
        if !amount.is_zero() {
            self.pending_transfers.push(TransferInstruction {
                schedule_id: *id,
                to: schedule.beneficiary,
                amount: amount.clone(),
            });
        }
        Ok(amount)
    }

    /// Revoke schedule `id` at time `now` and return the forfeited amount.
    ///
    /// Accrual stops at `now`. Under [`RevocationPolicy::AutoRelease`] the
    /// vested-but-unreleased remainder is released as part of the call; under
    /// [`RevocationPolicy::FreezeClaimable`] it stays claimable through
    /// [`Self::release`]. The forfeited amount is `amount_total` minus
    /// everything vested at `now`. Under auto-release that equals
    /// `amount_total - released` after the payout; under freeze-claimable the
    /// frozen remainder is still owed to the beneficiary and is not counted.
    pub fn revoke(&mut self, id: &ScheduleId, now: u64) -> Result<Amount> {
        let schedule = self
            .backend
            .get_mut(id)
            .ok_or(VestingError::NotInitialized(*id))?;

        if !schedule.revocable {
            return Err(VestingError::NotRevocable(*id));
        }
        if schedule.revoked {
            return Err(VestingError::AlreadyRevoked(*id));
        }

        let vested = calculator::vested_amount(schedule, now);
        let releasable = saturating_sub(&vested, &schedule.released);

        match self.config.revocation_policy {
            RevocationPolicy::AutoRelease => {
                if !releasable.is_zero() {
                    schedule.released += &releasable;
                    self.pending_transfers.push(TransferInstruction {
                        schedule_id: *id,
                        to: schedule.beneficiary,
                        amount: releasable.clone(),
                    });
                }
            }
            RevocationPolicy::FreezeClaimable => {}
        }

        let forfeited = saturating_sub(&schedule.amount_total, &vested);
        schedule.revoked = true;
        schedule.vested_at_revocation = Some(vested);

        info!(
            "revoked vesting schedule {} ({:?}): releasable {}, forfeited {}",
            id, self.config.revocation_policy, releasable, forfeited
        );
        Ok(forfeited)
    }

    /// Record milestone completion for a `Milestone` schedule.
    ///
    /// Progress is expressed in basis points and may only move forward.
    pub fn record_milestone(&mut self, id: &ScheduleId, bps: u16) -> Result<()> {
        let schedule = self
            .backend
            .get_mut(id)
            .ok_or(VestingError::NotInitialized(*id))?;

        let invalid = |reason: String| Err(VestingError::InvalidMilestone { id: *id, reason });

        if schedule.vesting_type != VestingType::Milestone {
            return invalid(format!("schedule is {}", schedule.vesting_type));
        }
        if schedule.revoked {
            return Err(VestingError::Revoked(*id));
        }
        if bps > MILESTONE_BPS_DENOMINATOR {
            return invalid(format!(
                "progress {bps} bps exceeds {MILESTONE_BPS_DENOMINATOR}"
            ));
        }
        if bps < schedule.milestone_bps {
            return invalid(format!(
                "progress {bps} bps is below recorded {} bps",
                schedule.milestone_bps
            ));
        }

        schedule.milestone_bps = bps;
        debug!("milestone progress on {} is now {} bps", id, bps);
        Ok(())
    }

    /// Hand every queued transfer instruction to the caller.
    pub fn drain_transfers(&mut self) -> Vec<TransferInstruction> {
        std::mem::take(&mut self.pending_transfers)
    }

    pub fn pending_transfers(&self) -> &[TransferInstruction] {
        &self.pending_transfers
    }

    // ── Lookups ─────────────────────────────────────────────────────────

    pub fn get(&self, id: &ScheduleId) -> Result<&VestingSchedule> {
        self.backend
            .get(id)
            .ok_or(VestingError::NotInitialized(*id))
    }

    pub fn contains(&self, id: &ScheduleId) -> bool {
        self.backend.get(id).is_some()
    }

    /// Releasable amount of schedule `id` at `now`.
    pub fn releasable(&self, id: &ScheduleId, now: u64) -> Result<Amount> {
        self.get(id)
            .map(|schedule| calculator::releasable_amount(schedule, now))
    }

    /// The beneficiary's schedules in index order.
    pub fn list_by_beneficiary(&self, beneficiary: &Address) -> Vec<&VestingSchedule> {
        self.backend
            .ids_for_beneficiary(beneficiary)
            .iter()
            .filter_map(|id| self.backend.get(id))
            .collect()
    }

    /// The beneficiary's schedules in `category`, index order.
    pub fn list_by_category(
        &self,
        beneficiary: &Address,
        category: Category,
    ) -> Vec<&VestingSchedule> {
        self.list_by_beneficiary(beneficiary)
            .into_iter()
            .filter(|schedule| schedule.category == category)
            .collect()
    }

    pub fn count_by_beneficiary(&self, beneficiary: &Address) -> u64 {
        self.backend.ids_for_beneficiary(beneficiary).len() as u64
    }

    /// The id the beneficiary's next `create` will return.
    pub fn next_schedule_id(&self, beneficiary: &Address) -> ScheduleId {
        ScheduleId::derive(beneficiary, self.count_by_beneficiary(beneficiary))
    }

    pub fn id_at_index(&self, beneficiary: &Address, index: u64) -> Result<ScheduleId> {
        let ids = self.backend.ids_for_beneficiary(beneficiary);
        usize::try_from(index)
            .ok()
            .and_then(|i| ids.get(i))
            .copied()
            .ok_or(VestingError::IndexOutOfBounds {
                beneficiary: *beneficiary,
                index,
                count: ids.len() as u64,
            })
    }

    pub fn last_for_beneficiary(&self, beneficiary: &Address) -> Option<&VestingSchedule> {
        self.backend
            .ids_for_beneficiary(beneficiary)
            .last()
            .and_then(|id| self.backend.get(id))
    }

    /// Every schedule id, creation order.
    pub fn ids(&self) -> &[ScheduleId] {
        self.backend.ids()
    }

    pub fn total_count(&self) -> u64 {
        self.backend.ids().len() as u64
    }

    // ── Ledger bookkeeping ──────────────────────────────────────────────

    /// Tokens the ledger still owes: unreleased amounts of active schedules
    /// plus frozen claimable remainders of revoked ones.
    pub fn total_committed(&self) -> Amount {
        self.backend
            .ids()
            .iter()
            .filter_map(|id| self.backend.get(id))
            .fold(Amount::zero(), |acc, schedule| {
                let ceiling = if schedule.revoked {
                    schedule
                        .vested_at_revocation
                        .as_ref()
                        .unwrap_or(&schedule.released)
                } else {
                    &schedule.amount_total
                };
                acc + saturating_sub(ceiling, &schedule.released)
            })
    }

    /// Portion of `token_balance` not backing any schedule.
    pub fn withdrawable(&self, token_balance: &Amount) -> Amount {
        saturating_sub(token_balance, &self.total_committed())
    }
}
