use {
    crate::types::{Address, Amount, ScheduleId},
    thiserror::Error,
};

/// Errors produced by the vesting ledger.
///
/// Every variant describes caller misuse or a terminal-state violation; none
/// of them is worth retrying without changing the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VestingError {
    /// Creation parameters violate a schedule invariant.
    #[error("Invalid vesting schedule: {reason}")]
    InvalidSchedule { reason: String },

    /// No schedule exists under this id.
    #[error("Vesting schedule {0} is not initialized")]
    NotInitialized(ScheduleId),

    /// The schedule was revoked and has nothing left to release.
    #[error("Vesting schedule {0} is revoked")]
    Revoked(ScheduleId),

    /// `revoke` was called on a schedule that is already revoked.
    #[error("Vesting schedule {0} is already revoked")]
    AlreadyRevoked(ScheduleId),

    /// `revoke` was called on a schedule created as non-revocable.
    #[error("Vesting schedule {0} is not revocable")]
    NotRevocable(ScheduleId),

    /// The release request exceeds what has vested so far.
    #[error(
        "Insufficient releasable amount on {id}: requested {requested}, releasable {releasable}"
    )]
    InsufficientReleasable {
        id: ScheduleId,
        requested: Amount,
        releasable: Amount,
    },

    /// The input does not decode to a 20-byte address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The input does not decode to a 32-byte schedule id.
    #[error("Invalid schedule id: {0}")]
    InvalidScheduleId(String),

    /// Milestone progress was rejected.
    #[error("Invalid milestone update on {id}: {reason}")]
    InvalidMilestone { id: ScheduleId, reason: String },

    /// Word value outside the category enumeration.
    #[error("Unknown vesting category tag {0}")]
    UnknownCategory(u64),

    /// Word value outside the vesting type enumeration.
    #[error("Unknown vesting type tag {0}")]
    UnknownVestingType(u64),

    /// A schedule handed to the store does not sit at the next index of its
    /// beneficiary.
    #[error("Schedule id mismatch: expected {expected} for the next index, got {actual}")]
    ScheduleIdMismatch {
        expected: ScheduleId,
        actual: ScheduleId,
    },

    /// The backend already holds a schedule under this id.
    #[error("Vesting schedule {0} already exists")]
    DuplicateSchedule(ScheduleId),

    /// Per-beneficiary index lookup past the end of the list.
    #[error("Index {index} out of bounds for {beneficiary} ({count} schedules)")]
    IndexOutOfBounds {
        beneficiary: Address,
        index: u64,
        count: u64,
    },
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, VestingError>;
