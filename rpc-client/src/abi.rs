//! Call data construction and fixed-width response decoding.
//!
//! The remote ledger speaks the usual contract ABI: a call is a 4-byte
//! function selector followed by 32-byte argument words, and the responses
//! this client reads are fixed sequences of 32-byte big-endian words. Each
//! response shape is described by a small layout table instead of a general
//! ABI decoder.

use {
    crate::error::{ClientError, Result},
    num_traits::{ToPrimitive, Zero},
    sha3::{Digest, Keccak256},
    std::{fmt, str::FromStr},
    vesting_ledger::{
        Address, Amount, BeneficiarySummary, Category, ScheduleId, VestingSchedule, VestingType,
    },
};

/// Width of one ABI word in bytes.
pub const WORD_LEN: usize = 32;

// ── Selectors ───────────────────────────────────────────────────────────────

/// The first four bytes of `keccak256(signature)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector([u8; Selector::LEN]);

impl Selector {
    pub const LEN: usize = 4;

    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Selector of a canonical signature such as `getVestingSchedule(bytes32)`.
    pub fn from_signature(signature: &str) -> Self {
        let digest = Keccak256::digest(signature.as_bytes());
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&digest[..Self::LEN]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

/// Accepts either a raw selector (`0x` followed by 8 hex digits) or a
/// function signature.
impl FromStr for Selector {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix("0x") {
            let mut bytes = [0u8; Self::LEN];
            hex::decode_to_slice(digits, &mut bytes)
                .map_err(|e| ClientError::Config(format!("invalid selector {s}: {e}")))?;
            return Ok(Self(bytes));
        }
        if s.contains('(') && s.ends_with(')') {
            return Ok(Self::from_signature(s));
        }
        Err(ClientError::Config(format!(
            "invalid selector {s}: expected 0x-prefixed hex or a function signature"
        )))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({self})")
    }
}

// ── Call data ───────────────────────────────────────────────────────────────

/// Parse a hex address, mapping failures to [`ClientError::InvalidAddress`].
pub fn parse_address(address: &str) -> Result<Address> {
    address
        .parse()
        .map_err(|_| ClientError::InvalidAddress(address.to_string()))
}

/// `selector ‖ 12 zero bytes ‖ address`: a call taking one `address`.
pub fn build_call_data(selector: Selector, address: &str) -> Result<Vec<u8>> {
    let address = parse_address(address)?;
    Ok(build_call_data_address(selector, &address))
}

pub fn build_call_data_address(selector: Selector, address: &Address) -> Vec<u8> {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - Address::LEN..].copy_from_slice(address.as_bytes());
    build_call_data_word(selector, &word)
}

/// `selector ‖ word`: a call taking one `bytes32`.
pub fn build_call_data_word(selector: Selector, word: &[u8; WORD_LEN]) -> Vec<u8> {
    let mut data = Vec::with_capacity(Selector::LEN + WORD_LEN);
    data.extend_from_slice(selector.as_bytes());
    data.extend_from_slice(word);
    data
}

// ── Layout tables ───────────────────────────────────────────────────────────

/// One word of a fixed response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
}

const fn field(name: &'static str, index: usize) -> Field {
    Field {
        name,
        offset: index * WORD_LEN,
    }
}

/// `getBeneficiarySummary(address)` response: five words.
pub const SUMMARY_LAYOUT: [Field; 5] = [
    field("totalAmount", 0),
    field("releasedAmount", 1),
    field("releasableAmount", 2),
    field("lockedAmount", 3),
    field("scheduleCount", 4),
];

/// `getVestingSchedule(bytes32)` response: twelve words. `cliff` is the
/// offset from `start`, booleans and enums are word-encoded.
pub const SCHEDULE_LAYOUT: [Field; 12] = [
    field("beneficiary", 0),
    field("cliff", 1),
    field("start", 2),
    field("duration", 3),
    field("slicePeriodSeconds", 4),
    field("revocable", 5),
    field("amountTotal", 6),
    field("released", 7),
    field("revoked", 8),
    field("category", 9),
    field("vestingType", 10),
    field("initialized", 11),
];

const fn layout_len(fields: usize) -> usize {
    fields * WORD_LEN
}

/// Bytes a summary response must hold.
pub const SUMMARY_LEN: usize = layout_len(SUMMARY_LAYOUT.len());
/// Bytes a schedule response must hold.
pub const SCHEDULE_LEN: usize = layout_len(SCHEDULE_LAYOUT.len());

/// Slice `raw` into the words of `layout`.
///
/// An empty response reads as all zeros; anything else must be at least as
/// long as the layout. Trailing bytes are ignored.
fn split_words<'a, const N: usize>(
    raw: &'a [u8],
    layout: &[Field; N],
    layout_name: &'static str,
) -> Result<[&'a [u8]; N]> {
    static ZERO: [u8; WORD_LEN] = [0u8; WORD_LEN];
    let expected = layout_len(N);
    if !raw.is_empty() && raw.len() < expected {
        return Err(ClientError::short_response(layout_name, expected, raw.len()));
    }

    let mut words = [&ZERO[..]; N];
    if !raw.is_empty() {
        for (word, field) in words.iter_mut().zip(layout) {
            *word = raw
                .get(field.offset..field.offset.saturating_add(WORD_LEN))
                .ok_or_else(|| ClientError::short_response(layout_name, expected, raw.len()))?;
        }
    }
    Ok(words)
}

fn word_to_amount(word: &[u8]) -> Amount {
    Amount::from_bytes_be(word)
}

fn word_to_u64(word: &[u8], field: &Field) -> Result<u64> {
    word_to_amount(word)
        .to_u64()
        .ok_or_else(|| ClientError::decode(field.name, "value exceeds u64"))
}

fn word_to_bool(word: &[u8], field: &Field) -> Result<bool> {
    match word_to_u64(word, field)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ClientError::decode(
            field.name,
            format!("expected 0 or 1, got {other}"),
        )),
    }
}

fn word_to_address(word: &[u8], field: &Field) -> Result<Address> {
    let (padding, address) = word.split_at(WORD_LEN - Address::LEN);
    if padding.iter().any(|b| *b != 0) {
        return Err(ClientError::decode(
            field.name,
            "address word has non-zero padding",
        ));
    }
    Ok(Address::try_from_slice(address)?)
}

fn amount_to_word(value: &Amount, field: &'static str) -> Result<[u8; WORD_LEN]> {
    let mut word = [0u8; WORD_LEN];
    if value.is_zero() {
        return Ok(word);
    }
    let bytes = value.to_bytes_be();
    let pad = WORD_LEN
        .checked_sub(bytes.len())
        .ok_or_else(|| ClientError::ValueOutOfRange {
            field,
            value: value.clone(),
        })?;
    word[pad..].copy_from_slice(&bytes);
    Ok(word)
}

fn u64_to_word(value: u64) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

// ── Summary ─────────────────────────────────────────────────────────────────

/// The five raw words of a summary response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryWords {
    pub total_amount: Amount,
    pub released_amount: Amount,
    pub releasable_amount: Amount,
    pub locked_amount: Amount,
    pub schedule_count: Amount,
}

impl SummaryWords {
    /// Convert to a [`BeneficiarySummary`], keeping the remote locked amount
    /// as reported.
    pub fn into_summary(self) -> Result<BeneficiarySummary> {
        let schedule_count = self
            .schedule_count
            .to_u64()
            .ok_or_else(|| ClientError::decode(SUMMARY_LAYOUT[4].name, "value exceeds u64"))?;
        Ok(BeneficiarySummary {
            total_amount: self.total_amount,
            released_amount: self.released_amount,
            releasable_amount: self.releasable_amount,
            locked_amount: self.locked_amount,
            schedule_count,
        })
    }
}

impl From<&BeneficiarySummary> for SummaryWords {
    fn from(summary: &BeneficiarySummary) -> Self {
        Self {
            total_amount: summary.total_amount.clone(),
            released_amount: summary.released_amount.clone(),
            releasable_amount: summary.releasable_amount.clone(),
            locked_amount: summary.locked_amount.clone(),
            schedule_count: Amount::from(summary.schedule_count),
        }
    }
}

/// Decode a summary response. An empty response yields all zeros.
pub fn decode_fixed_summary(raw: &[u8]) -> Result<SummaryWords> {
    let [total, released, releasable, locked, count] =
        split_words(raw, &SUMMARY_LAYOUT, "summary")?;
    Ok(SummaryWords {
        total_amount: word_to_amount(total),
        released_amount: word_to_amount(released),
        releasable_amount: word_to_amount(releasable),
        locked_amount: word_to_amount(locked),
        schedule_count: word_to_amount(count),
    })
}

/// Inverse of [`decode_fixed_summary`].
pub fn encode_fixed_summary(words: &SummaryWords) -> Result<Vec<u8>> {
    let values = [
        &words.total_amount,
        &words.released_amount,
        &words.releasable_amount,
        &words.locked_amount,
        &words.schedule_count,
    ];
    let mut raw = Vec::with_capacity(SUMMARY_LEN);
    for (value, field) in values.into_iter().zip(&SUMMARY_LAYOUT) {
        raw.extend_from_slice(&amount_to_word(value, field.name)?);
    }
    Ok(raw)
}

// ── Schedule ────────────────────────────────────────────────────────────────

/// Decode a schedule response fetched under `id`.
///
/// The response does not carry the id, so the caller supplies the one it
/// queried. An empty response decodes to an uninitialized record.
pub fn decode_schedule(id: ScheduleId, raw: &[u8]) -> Result<VestingSchedule> {
    let words = split_words(raw, &SCHEDULE_LAYOUT, "schedule")?;
    let [beneficiary, cliff, start, duration, slice, revocable, total, released, revoked, category, vesting_type, initialized] =
        words;
    let f = &SCHEDULE_LAYOUT;

    let category = Category::from_tag(word_to_u64(category, &f[9])?)?;
    let vesting_type = VestingType::from_tag(word_to_u64(vesting_type, &f[10])?)?;

    Ok(VestingSchedule {
        id,
        beneficiary: word_to_address(beneficiary, &f[0])?,
        start: word_to_u64(start, &f[2])?,
        cliff: word_to_u64(cliff, &f[1])?,
        duration: word_to_u64(duration, &f[3])?,
        slice_period_seconds: word_to_u64(slice, &f[4])?,
        revocable: word_to_bool(revocable, &f[5])?,
        amount_total: word_to_amount(total),
        released: word_to_amount(released),
        revoked: word_to_bool(revoked, &f[8])?,
        category,
        vesting_type,
        initialized: word_to_bool(initialized, &f[11])?,
        vested_at_revocation: None,
        milestone_bps: 0,
    })
}

/// Encode a schedule the way the remote ledger returns it.
pub fn encode_schedule(schedule: &VestingSchedule) -> Result<Vec<u8>> {
    let mut beneficiary = [0u8; WORD_LEN];
    beneficiary[WORD_LEN - Address::LEN..].copy_from_slice(schedule.beneficiary.as_bytes());

    let words = [
        beneficiary,
        u64_to_word(schedule.cliff),
        u64_to_word(schedule.start),
        u64_to_word(schedule.duration),
        u64_to_word(schedule.slice_period_seconds),
        u64_to_word(u64::from(schedule.revocable)),
        amount_to_word(&schedule.amount_total, SCHEDULE_LAYOUT[6].name)?,
        amount_to_word(&schedule.released, SCHEDULE_LAYOUT[7].name)?,
        u64_to_word(u64::from(schedule.revoked)),
        u64_to_word(u64::from(schedule.category.tag())),
        u64_to_word(u64::from(schedule.vesting_type.tag())),
        u64_to_word(u64::from(schedule.initialized)),
    ];
    Ok(words.concat())
}
