use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::config::EnginePolicy;
use crate::error::{EngineError, EngineResult};
use crate::repository::NetworkRepository;
use crate::schemas::{CommissionEntry, Grade};
use crate::services::squad::MemberLine;

/// Commission owed on a single closed sale, split between the seller and
/// (when eligible) their upline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionSplit {
    pub member_commission: f64,
    pub upline_commission: f64,
}

/// Override rate an upline earns on a downline sale.
///
/// Non-zero only when the seller sits on line 2 (their upline is itself a
/// root) and the upline's grade reaches Silver: Silver earns the mid rate,
/// Gold and Diamond the top rate. Deeper lines always rate zero; two lines is
/// the policy cap, not a gap.
pub fn override_rate(line: MemberLine, upline_grade: Option<Grade>, policy: &EnginePolicy) -> f64 {
    match (line, upline_grade) {
        (MemberLine::Second, Some(Grade::Silver)) => policy.override_rate_mid,
        (MemberLine::Second, Some(Grade::Gold | Grade::Diamond)) => policy.override_rate_top,
        _ => 0.0,
    }
}

/// Split a sale value into the seller's direct commission and the upline
/// override. The direct share is a flat rate regardless of tier.
pub fn calculate_commission(
    sale_value: f64,
    line: MemberLine,
    upline_grade: Option<Grade>,
    policy: &EnginePolicy,
) -> CommissionSplit {
    CommissionSplit {
        member_commission: sale_value * policy.direct_commission_rate,
        upline_commission: sale_value * override_rate(line, upline_grade, policy),
    }
}

/// Append a ledger entry with a freshly generated id. Entries start unpaid
/// with no payment date.
pub fn add_commission(
    repo: &mut dyn NetworkRepository,
    member_id: Uuid,
    lead_id: Uuid,
    sale_date: NaiveDate,
    sale_value: f64,
    commission_percentage: f64,
) -> CommissionEntry {
    let entry = CommissionEntry {
        id: Uuid::new_v4(),
        member_id,
        lead_id,
        sale_date,
        sale_value,
        commission_percentage,
        commission_value: sale_value * commission_percentage,
        is_paid: false,
        payment_date: None,
    };
    repo.append_entry(entry.clone());
    entry
}

/// Flip the paid flag and payment date on a single entry. Everything else on
/// an entry is immutable once written.
///
/// Unknown ids surface `EntryNotFound`; callers match on the result instead
/// of assuming the mutation happened.
pub fn update_commission_payment_status(
    repo: &mut dyn NetworkRepository,
    entry_id: Uuid,
    paid: bool,
    paid_on: NaiveDate,
) -> EngineResult<()> {
    let mut entry = repo
        .entry(entry_id)
        .ok_or(EngineError::EntryNotFound(entry_id))?;
    entry.is_paid = paid;
    entry.payment_date = paid.then_some(paid_on);
    repo.update_entry(&entry)?;
    info!(entry_id = %entry_id, paid, "Commission payment status updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{add_commission, calculate_commission, update_commission_payment_status};
    use crate::config::EnginePolicy;
    use crate::error::EngineError;
    use crate::repository::memory::InMemoryRepository;
    use crate::repository::NetworkRepository;
    use crate::schemas::Grade;
    use crate::services::squad::MemberLine;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
    }

    #[test]
    fn direct_commission_is_flat_rate() {
        let policy = EnginePolicy::default();
        let split = calculate_commission(1000.0, MemberLine::First, None, &policy);
        assert!((split.member_commission - 30.0).abs() < 0.01);
        assert_eq!(split.upline_commission, 0.0);
    }

    #[test]
    fn override_requires_line_two_and_grade() {
        let policy = EnginePolicy::default();

        let gold = calculate_commission(2000.0, MemberLine::Second, Some(Grade::Gold), &policy);
        assert!((gold.upline_commission - 10.0).abs() < 0.01);

        let diamond =
            calculate_commission(2000.0, MemberLine::Second, Some(Grade::Diamond), &policy);
        assert!((diamond.upline_commission - 10.0).abs() < 0.01);

        let silver =
            calculate_commission(2000.0, MemberLine::Second, Some(Grade::Silver), &policy);
        assert!((silver.upline_commission - 5.0).abs() < 0.01);

        let bronze =
            calculate_commission(2000.0, MemberLine::Second, Some(Grade::Bronze), &policy);
        assert_eq!(bronze.upline_commission, 0.0);

        let deeper = calculate_commission(2000.0, MemberLine::Deeper, Some(Grade::Gold), &policy);
        assert_eq!(deeper.upline_commission, 0.0);

        let root = calculate_commission(2000.0, MemberLine::First, Some(Grade::Gold), &policy);
        assert_eq!(root.upline_commission, 0.0);
    }

    #[test]
    fn appended_entry_derives_commission_value() {
        let mut repo = InMemoryRepository::new();
        let entry = add_commission(
            &mut repo,
            Uuid::new_v4(),
            Uuid::new_v4(),
            march(5),
            1234.5,
            0.03,
        );
        assert!((entry.commission_value - entry.sale_value * entry.commission_percentage).abs() < 0.01);
        assert!(!entry.is_paid);
        assert!(entry.payment_date.is_none());
        assert_eq!(repo.entries().len(), 1);
    }

    #[test]
    fn payment_status_toggles_date_with_flag() {
        let mut repo = InMemoryRepository::new();
        let entry = add_commission(
            &mut repo,
            Uuid::new_v4(),
            Uuid::new_v4(),
            march(5),
            100.0,
            0.03,
        );

        update_commission_payment_status(&mut repo, entry.id, true, march(31)).expect("paid");
        let paid = repo.entry(entry.id).expect("entry");
        assert!(paid.is_paid);
        assert_eq!(paid.payment_date, Some(march(31)));

        update_commission_payment_status(&mut repo, entry.id, false, march(31)).expect("unpaid");
        let reopened = repo.entry(entry.id).expect("entry");
        assert!(!reopened.is_paid);
        assert!(reopened.payment_date.is_none());
    }

    #[test]
    fn unknown_entry_is_reported_not_mutated() {
        let mut repo = InMemoryRepository::new();
        let ghost = Uuid::new_v4();
        assert_eq!(
            update_commission_payment_status(&mut repo, ghost, true, march(31)),
            Err(EngineError::EntryNotFound(ghost))
        );
        assert!(repo.entries().is_empty());
    }
}
