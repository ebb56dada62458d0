use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::EnginePolicy;
use crate::error::{EngineError, EngineResult};
use crate::repository::NetworkRepository;
use crate::schemas::{CommissionBatch, CommissionEntry};

/// Period filter for batch listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    All,
    Year(i32),
    Month { year: i32, month: u32 },
}

impl PeriodFilter {
    /// Map the loose external query surface onto a filter. Unknown modes and
    /// missing parts degrade to `All` instead of erroring.
    pub fn from_parts(mode: &str, year: Option<i32>, month: Option<u32>) -> Self {
        match (mode.trim().to_ascii_lowercase().as_str(), year, month) {
            ("year", Some(year), _) => Self::Year(year),
            ("month", Some(year), Some(month)) => Self::Month { year, month },
            _ => Self::All,
        }
    }

    fn keeps(self, batch: &CommissionBatch) -> bool {
        match self {
            Self::All => true,
            Self::Year(year) => batch.year == year,
            Self::Month { year, month } => batch.year == year && batch.month == month,
        }
    }
}

/// Due date for a batch: the policy payment day of the month after the
/// batch's month.
fn batch_due_date(year: i32, month: u32, payment_day: u32) -> NaiveDate {
    let (due_year, due_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(due_year, due_month, payment_day.clamp(1, 28))
        .expect("clamped payment day exists in every month")
}

/// Group ledger entries into monthly payable batches.
///
/// The key is (member, year, month) of the **sale** date, never the payment
/// date. A batch reads paid only when every entry in it is paid; one unpaid
/// entry makes the whole batch pending. Output is ordered by year, month,
/// then member so repeated reads render identically.
pub fn group_by_member_and_month(
    entries: &[CommissionEntry],
    policy: &EnginePolicy,
) -> Vec<CommissionBatch> {
    let mut groups: BTreeMap<(i32, u32, Uuid), (f64, usize, bool)> = BTreeMap::new();
    for entry in entries {
        let key = (
            entry.sale_date.year(),
            entry.sale_date.month(),
            entry.member_id,
        );
        let group = groups.entry(key).or_insert((0.0, 0, true));
        group.0 += entry.commission_value;
        group.1 += 1;
        group.2 &= entry.is_paid;
    }

    groups
        .into_iter()
        .map(
            |((year, month, member_id), (total_value, entry_count, is_paid))| CommissionBatch {
                member_id,
                year,
                month,
                total_value,
                entry_count,
                is_paid,
                due_date: batch_due_date(year, month, policy.payment_day),
            },
        )
        .collect()
}

/// Pay (or reopen) every entry in one member-month batch. Returns how many
/// entries were touched; an empty match means the batch does not exist.
///
/// Entries are written one at a time and the store guarantees per-entry
/// atomicity only, so a reader grouping entries mid-call can observe the
/// batch as unpaid until the last write lands. The calling workflow re-reads
/// after the call returns.
pub fn mark_batch_paid(
    repo: &mut dyn NetworkRepository,
    member_id: Uuid,
    month: u32,
    year: i32,
    paid: bool,
) -> EngineResult<usize> {
    let matching: Vec<CommissionEntry> = repo
        .entries()
        .into_iter()
        .filter(|entry| {
            entry.member_id == member_id
                && entry.sale_date.year() == year
                && entry.sale_date.month() == month
        })
        .collect();

    if matching.is_empty() {
        return Err(EngineError::BatchNotFound {
            member_id,
            month,
            year,
        });
    }

    let paid_on = Utc::now().date_naive();
    let count = matching.len();
    for mut entry in matching {
        entry.is_paid = paid;
        entry.payment_date = paid.then_some(paid_on);
        repo.update_entry(&entry)?;
    }

    info!(member_id = %member_id, month, year, paid, entries = count, "Batch payment status updated");
    Ok(count)
}

/// Apply a period filter to already grouped batches.
pub fn filter_by_period(batches: Vec<CommissionBatch>, filter: PeriodFilter) -> Vec<CommissionBatch> {
    batches
        .into_iter()
        .filter(|batch| filter.keeps(batch))
        .collect()
}
