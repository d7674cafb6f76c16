//! Core data model: addresses, schedule identifiers, tags and the schedule
//! record itself.

use {
    crate::error::{Result, VestingError},
    num_bigint::BigUint,
    serde::{Deserialize, Serialize},
    serde_with::{serde_as, DeserializeFromStr, DisplayFromStr, SerializeDisplay},
    sha3::{Digest, Keccak256},
    std::{fmt, str::FromStr},
};

/// Token amounts are unbounded unsigned integers; the remote ledger uses
/// 256-bit words, which always fit.
pub type Amount = BigUint;

// ── Address ─────────────────────────────────────────────────────────────────

/// A 20-byte account address.
///
/// Parsed from and displayed as `0x`-prefixed hex.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct Address([u8; Address::LEN]);

impl Address {
    pub const LEN: usize = 20;

    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice that must be exactly 20 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; Self::LEN] = bytes.try_into().map_err(|_| {
            VestingError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = VestingError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes =
            hex::decode(digits).map_err(|e| VestingError::InvalidAddress(format!("{s}: {e}")))?;
        if bytes.len() != Self::LEN {
            return Err(VestingError::InvalidAddress(format!(
                "{s}: expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ── Schedule id ─────────────────────────────────────────────────────────────

/// Opaque 32-byte schedule identifier.
///
/// Derived as `keccak256(beneficiary ‖ uint256(index))`, the same packing the
/// ledger contract uses, so an id can be predicted off-chain before the
/// schedule is submitted.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct ScheduleId([u8; ScheduleId::LEN]);

impl ScheduleId {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the id of the `index`-th schedule of `beneficiary`.
    pub fn derive(beneficiary: &Address, index: u64) -> Self {
        let mut index_word = [0u8; 32];
        index_word[24..].copy_from_slice(&index.to_be_bytes());

        let mut hasher = Keccak256::new();
        hasher.update(beneficiary.as_bytes());
        hasher.update(index_word);
        let digest = hasher.finalize();

        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(&digest);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl FromStr for ScheduleId {
    type Err = VestingError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let mut out = [0u8; Self::LEN];
        hex::decode_to_slice(digits, &mut out)
            .map_err(|e| VestingError::InvalidScheduleId(format!("{s}: {e}")))?;
        Ok(Self(out))
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduleId({self})")
    }
}

// ── Tags ────────────────────────────────────────────────────────────────────

/// Allocation bucket a schedule belongs to. Classification only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Mining,
    Ecosystem,
    Team,
    Cornerstone,
}

impl Category {
    /// Every category in word-tag order.
    pub const ALL: [Category; 4] = [
        Category::Mining,
        Category::Ecosystem,
        Category::Team,
        Category::Cornerstone,
    ];

    /// Tag used in the remote ledger's word encoding.
    pub fn tag(self) -> u8 {
        match self {
            Category::Mining => 0,
            Category::Ecosystem => 1,
            Category::Team => 2,
            Category::Cornerstone => 3,
        }
    }

    pub fn from_tag(tag: u64) -> Result<Self> {
        match tag {
            0 => Ok(Category::Mining),
            1 => Ok(Category::Ecosystem),
            2 => Ok(Category::Team),
            3 => Ok(Category::Cornerstone),
            other => Err(VestingError::UnknownCategory(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Mining => "MINING",
            Category::Ecosystem => "ECOSYSTEM",
            Category::Team => "TEAM",
            Category::Cornerstone => "CORNERSTONE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Release curve selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VestingType {
    /// Slice-quantised linear release from `start`, gated by the cliff.
    Linear,
    /// Release driven by recorded milestone completion instead of time.
    Milestone,
    /// Nothing before the cliff, then linear from `start`.
    CliffLinear,
}

impl VestingType {
    pub fn tag(self) -> u8 {
        match self {
            VestingType::Linear => 0,
            VestingType::Milestone => 1,
            VestingType::CliffLinear => 2,
        }
    }

    pub fn from_tag(tag: u64) -> Result<Self> {
        match tag {
            0 => Ok(VestingType::Linear),
            1 => Ok(VestingType::Milestone),
            2 => Ok(VestingType::CliffLinear),
            other => Err(VestingError::UnknownVestingType(other)),
        }
    }

    /// Whether elapsed time drives the curve.
    pub fn is_time_based(self) -> bool {
        match self {
            VestingType::Linear | VestingType::CliffLinear => true,
            VestingType::Milestone => false,
        }
    }
}

impl fmt::Display for VestingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VestingType::Linear => "LINEAR",
            VestingType::Milestone => "MILESTONE",
            VestingType::CliffLinear => "CLIFF_LINEAR",
        })
    }
}

// ── Schedule ────────────────────────────────────────────────────────────────

/// Parameters accepted by [`crate::store::VestingStore::create`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScheduleParams {
    pub beneficiary: Address,
    /// Unix timestamp (seconds) the curve starts from.
    pub start: u64,
    /// Offset from `start`, in seconds, before anything vests.
    pub cliff: u64,
    /// Total length of the curve in seconds.
    pub duration: u64,
    /// Release granularity in seconds.
    pub slice_period_seconds: u64,
    pub revocable: bool,
    #[serde_as(as = "DisplayFromStr")]
    pub amount_total: Amount,
    pub category: Category,
    pub vesting_type: VestingType,
}

/// A single vesting schedule.
///
/// Created once, then mutated only by release, revocation and milestone
/// recording. Schedules are never deleted.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub id: ScheduleId,
    pub beneficiary: Address,
    /// Unix timestamp (seconds) the curve starts from.
    pub start: u64,
    /// Offset from `start`, not an absolute timestamp.
    pub cliff: u64,
    pub duration: u64,
    pub slice_period_seconds: u64,
    pub revocable: bool,
    #[serde_as(as = "DisplayFromStr")]
    pub amount_total: Amount,
    /// Amount already released. Never exceeds `amount_total`.
    #[serde_as(as = "DisplayFromStr")]
    pub released: Amount,
    pub revoked: bool,
    pub category: Category,
    pub vesting_type: VestingType,
    pub initialized: bool,
    /// Vested amount frozen at the revocation instant.
    ///
    /// `None` while the schedule is active. Under auto-release this equals
    /// `released`; under the freeze policy the difference is still claimable.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub vested_at_revocation: Option<Amount>,
    /// Milestone completion in basis points (`Milestone` schedules only).
    #[serde(default)]
    pub milestone_bps: u16,
}

impl VestingSchedule {
    /// Build a fresh, unreleased schedule at `index` of its beneficiary.
    pub fn from_params(params: CreateScheduleParams, index: u64) -> Self {
        Self {
            id: ScheduleId::derive(&params.beneficiary, index),
            beneficiary: params.beneficiary,
            start: params.start,
            cliff: params.cliff,
            duration: params.duration,
            slice_period_seconds: params.slice_period_seconds,
            revocable: params.revocable,
            amount_total: params.amount_total,
            released: Amount::default(),
            revoked: false,
            category: params.category,
            vesting_type: params.vesting_type,
            initialized: true,
            vested_at_revocation: None,
            milestone_bps: 0,
        }
    }

    /// Absolute timestamp of the cliff. Saturates rather than wrapping.
    pub fn cliff_end(&self) -> u64 {
        self.start.saturating_add(self.cliff)
    }

    /// Absolute timestamp at which everything has vested.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.duration)
    }

    /// Check the creation invariants.
    pub fn validate(&self) -> Result<()> {
        validate_terms(
            &self.amount_total,
            self.start,
            self.cliff,
            self.duration,
            self.slice_period_seconds,
        )?;
        if self.released > self.amount_total {
            return Err(VestingError::InvalidSchedule {
                reason: format!(
                    "released ({}) exceeds amount_total ({})",
                    self.released, self.amount_total
                ),
            });
        }
        Ok(())
    }
}

impl CreateScheduleParams {
    pub fn validate(&self) -> Result<()> {
        validate_terms(
            &self.amount_total,
            self.start,
            self.cliff,
            self.duration,
            self.slice_period_seconds,
        )
    }
}

fn validate_terms(
    amount_total: &Amount,
    start: u64,
    cliff: u64,
    duration: u64,
    slice_period_seconds: u64,
) -> Result<()> {
    let invalid = |reason: String| Err(VestingError::InvalidSchedule { reason });

    if *amount_total == Amount::default() {
        return invalid("amount_total must be > 0".to_string());
    }
    if duration == 0 {
        return invalid("duration must be > 0".to_string());
    }
    if slice_period_seconds == 0 {
        return invalid("slice_period_seconds must be >= 1".to_string());
    }
    if cliff > duration {
        return invalid(format!("cliff ({cliff}) exceeds duration ({duration})"));
    }
    if start.checked_add(duration).is_none() {
        return invalid(format!(
            "start ({start}) + duration ({duration}) overflows a u64 timestamp"
        ));
    }
    Ok(())
}

/// A token movement owed to a beneficiary. Emitted on release and handed to
/// the token collaborator, which performs the actual transfer.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub schedule_id: ScheduleId,
    pub to: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}
