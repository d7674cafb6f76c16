//! Beneficiary and category summaries folded over a [`VestingStore`].

use {
    crate::{
        backend::ScheduleBackend,
        calculator::{self, saturating_sub},
        store::VestingStore,
        types::{Address, Amount, Category, ScheduleId, VestingSchedule},
    },
    num_traits::Zero,
    serde::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    std::fmt,
};

/// Per-beneficiary totals across every schedule.
///
/// `locked_amount = total_amount - released_amount - releasable_amount`.
/// The field order matches the remote summary query's five response words.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiarySummary {
    #[serde_as(as = "DisplayFromStr")]
    pub total_amount: Amount,
    #[serde_as(as = "DisplayFromStr")]
    pub released_amount: Amount,
    #[serde_as(as = "DisplayFromStr")]
    pub releasable_amount: Amount,
    #[serde_as(as = "DisplayFromStr")]
    pub locked_amount: Amount,
    pub schedule_count: u64,
}

impl BeneficiarySummary {
    /// Build a summary, deriving `locked_amount` from the other totals.
    pub fn from_totals(
        total_amount: Amount,
        released_amount: Amount,
        releasable_amount: Amount,
        schedule_count: u64,
    ) -> Self {
        let locked_amount = saturating_sub(
            &saturating_sub(&total_amount, &released_amount),
            &releasable_amount,
        );
        Self {
            total_amount,
            released_amount,
            releasable_amount,
            locked_amount,
            schedule_count,
        }
    }

    pub fn released_pct(&self) -> String {
        format_percentage(&self.released_amount, &self.total_amount)
    }

    pub fn releasable_pct(&self) -> String {
        format_percentage(&self.releasable_amount, &self.total_amount)
    }

    pub fn locked_pct(&self) -> String {
        format_percentage(&self.locked_amount, &self.total_amount)
    }
}

impl fmt::Display for BeneficiarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Total Vested:  {}", self.total_amount)?;
        writeln!(
            f,
            "  Released:      {} ({}%)",
            self.released_amount,
            self.released_pct()
        )?;
        writeln!(
            f,
            "  Releasable:    {} ({}%)",
            self.releasable_amount,
            self.releasable_pct()
        )?;
        writeln!(
            f,
            "  Locked:        {} ({}%)",
            self.locked_amount,
            self.locked_pct()
        )?;
        writeln!(f, "  Schedules:     {}", self.schedule_count)?;
        Ok(())
    }
}

/// Totals for one category of a beneficiary's schedules.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: Category,
    pub schedule_ids: Vec<ScheduleId>,
    #[serde_as(as = "DisplayFromStr")]
    pub total_amount: Amount,
    #[serde_as(as = "DisplayFromStr")]
    pub released_amount: Amount,
    #[serde_as(as = "DisplayFromStr")]
    pub releasable_amount: Amount,
}

impl fmt::Display for CategorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} ({} schedules)",
            self.category,
            self.schedule_ids.len()
        )?;
        writeln!(f, "    Total:       {}", self.total_amount)?;
        writeln!(
            f,
            "    Released:    {} ({}%)",
            self.released_amount,
            format_percentage(&self.released_amount, &self.total_amount)
        )?;
        writeln!(
            f,
            "    Releasable:  {} ({}%)",
            self.releasable_amount,
            format_percentage(&self.releasable_amount, &self.total_amount)
        )?;
        for id in &self.schedule_ids {
            writeln!(f, "    - {id}")?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Totals {
    total: Amount,
    released: Amount,
    releasable: Amount,
    count: u64,
}

impl Totals {
    fn add(&mut self, schedule: &VestingSchedule, now: u64) {
        self.total += &schedule.amount_total;
        self.released += &schedule.released;
        self.releasable += calculator::releasable_amount(schedule, now);
        self.count = self.count.saturating_add(1);
    }
}

/// Fold every schedule of `beneficiary` into one summary at time `now`.
///
/// Revoked schedules contribute their total and released amounts; their
/// releasable contribution is whatever is still claimable after revocation,
/// which is zero under the default auto-release policy.
pub fn summary<B: ScheduleBackend>(
    store: &VestingStore<B>,
    beneficiary: &Address,
    now: u64,
) -> BeneficiarySummary {
    let mut totals = Totals::default();
    for schedule in store.list_by_beneficiary(beneficiary) {
        totals.add(schedule, now);
    }
    BeneficiarySummary::from_totals(
        totals.total,
        totals.released,
        totals.releasable,
        totals.count,
    )
}

/// Like [`summary`], partitioned by category.
///
/// Categories in which the beneficiary holds no schedule are omitted. The
/// result follows [`Category::ALL`] order.
pub fn summary_by_category<B: ScheduleBackend>(
    store: &VestingStore<B>,
    beneficiary: &Address,
    now: u64,
) -> Vec<CategorySummary> {
    let schedules = store.list_by_beneficiary(beneficiary);

    Category::ALL
        .iter()
        .filter_map(|&category| {
            let mut totals = Totals::default();
            let mut schedule_ids = Vec::new();
            for schedule in schedules.iter().filter(|s| s.category == category) {
                totals.add(schedule, now);
                schedule_ids.push(schedule.id);
            }
            (!schedule_ids.is_empty()).then(|| CategorySummary {
                category,
                schedule_ids,
                total_amount: totals.total,
                released_amount: totals.released,
                releasable_amount: totals.releasable,
            })
        })
        .collect()
}

/// `part / total` as a percentage with two truncated decimals, e.g. `"33.33"`.
///
/// A zero total renders as `"0.00"`.
pub fn format_percentage(part: &Amount, total: &Amount) -> String {
    if total.is_zero() {
        return "0.00".to_string();
    }
    let hundredths = part * Amount::from(10_000u32) / total;
    let whole = &hundredths / Amount::from(100u32);
    let fraction = &hundredths % Amount::from(100u32);
    format!("{whole}.{fraction:02}")
}
