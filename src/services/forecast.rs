use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::config::EnginePolicy;
use crate::schemas::{CommissionEntry, CommissionForecast};

/// Rolling payment-cycle boundary: the payment day of the current month while
/// today is on or before it, otherwise the payment day of the next month.
/// Stable within a day and non-decreasing as today advances.
pub fn next_payment_date(today: NaiveDate, payment_day: u32) -> NaiveDate {
    let day = payment_day.clamp(1, 28);
    let (year, month) = if today.day() <= day {
        (today.year(), today.month())
    } else if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped payment day exists in every month")
}

/// Project pending commission over a date window.
///
/// With no window the reference is the next payment date and every unpaid
/// entry sold in today's month or any earlier month counts, however overdue;
/// sales dated after the running month stay out even once the reference rolls
/// into the next month. With a window the reference is its end and only unpaid
/// entries sold inside `[start, end]` inclusive count. Paid entries never
/// count in either mode.
pub fn commissions_forecast(
    entries: &[CommissionEntry],
    window: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
    policy: &EnginePolicy,
) -> CommissionForecast {
    let reference = match window {
        Some((_, end)) => end,
        None => next_payment_date(today, policy.payment_day),
    };

    let mut total_pending_amount = 0.0;
    let mut pending_batches: HashSet<(Uuid, i32, u32)> = HashSet::new();
    let mut members_with_pending: HashSet<Uuid> = HashSet::new();

    for entry in entries {
        if entry.is_paid {
            continue;
        }
        let included = match window {
            Some((start, end)) => entry.sale_date >= start && entry.sale_date <= end,
            None => {
                (entry.sale_date.year(), entry.sale_date.month())
                    <= (today.year(), today.month())
            }
        };
        if !included {
            continue;
        }

        total_pending_amount += entry.commission_value;
        pending_batches.insert((
            entry.member_id,
            entry.sale_date.year(),
            entry.sale_date.month(),
        ));
        members_with_pending.insert(entry.member_id);
    }

    CommissionForecast {
        next_payment_date: reference,
        total_pending_amount,
        pending_batches: pending_batches.len(),
        members_with_pending: members_with_pending.len(),
    }
}
