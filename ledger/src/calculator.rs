use {
    crate::types::{Amount, VestingSchedule, VestingType},
    num_traits::Zero,
};

/// Denominator for milestone completion fractions (basis points).
pub const MILESTONE_BPS_DENOMINATOR: u16 = 10_000;

/// Amount of `schedule` that may be released at `now`.
///
/// # Formula
///
/// ```text
/// if revoked:                  vested_at_revocation - released   (0 under auto-release)
/// if now <  start + cliff:     0
/// if now >= start + duration:  amount_total - released
///
/// otherwise (LINEAR / CLIFF_LINEAR):
///     elapsed_slices = (now - start) / slice_period_seconds
///     total_slices   = duration / slice_period_seconds
///     vested         = amount_total × elapsed_slices / total_slices
///     releasable     = max(vested - released, 0)
///
/// otherwise (MILESTONE):
///     vested         = amount_total × milestone_bps / 10_000
/// ```
///
/// All divisions truncate toward zero so a schedule can never release more
/// than its curve allows.
pub fn releasable_amount(schedule: &VestingSchedule, now: u64) -> Amount {
    saturating_sub(&vested_amount(schedule, now), &schedule.released)
}

/// Total vested amount of `schedule` at `now`, including what has already
/// been released.
pub fn vested_amount(schedule: &VestingSchedule, now: u64) -> Amount {
    if schedule.revoked {
        // Accrual stopped at revocation.
        return schedule
            .vested_at_revocation
            .clone()
            .unwrap_or_else(|| schedule.released.clone());
    }

    if now < schedule.cliff_end() {
        return Amount::zero();
    }
    if now >= schedule.end() {
        return schedule.amount_total.clone();
    }

    match schedule.vesting_type {
        VestingType::Linear | VestingType::CliffLinear => time_vested_amount(schedule, now),
        VestingType::Milestone => {
            vested_amount_with_fraction(&schedule.amount_total, schedule.milestone_bps)
        }
    }
}

/// `amount_total × bps / 10_000`, truncating. Fractions above 100 % are
/// clamped.
pub fn vested_amount_with_fraction(amount_total: &Amount, bps: u16) -> Amount {
    let bps = bps.min(MILESTONE_BPS_DENOMINATOR);
    amount_total * Amount::from(bps) / Amount::from(MILESTONE_BPS_DENOMINATOR)
}

/// Slice-quantised linear curve, for `cliff_end <= now < end`.
fn time_vested_amount(schedule: &VestingSchedule, now: u64) -> Amount {
    // start <= cliff_end <= now < end, so neither subtraction can underflow.
    let elapsed = now.saturating_sub(schedule.start);
    let slice = schedule.slice_period_seconds;
    let elapsed_slices = elapsed.checked_div(slice).unwrap_or(0);
    let total_slices = schedule.duration.checked_div(slice).unwrap_or(0);

    if total_slices == 0 {
        // The slice is longer than the whole curve: nothing vests until `end`.
        return Amount::zero();
    }

    &schedule.amount_total * Amount::from(elapsed_slices) / Amount::from(total_slices)
}

/// `a - b`, or zero when `b > a`.
pub(crate) fn saturating_sub(a: &Amount, b: &Amount) -> Amount {
    if a > b {
        a - b
    } else {
        Amount::zero()
    }
}
