use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::config::EnginePolicy;
use crate::error::{EngineError, EngineResult};
use crate::repository::NetworkRepository;
use crate::schemas::{
    validate_input, CommissionEntry, CreateLeadInput, Lead, LeadStatus, LeadTransition,
};
use crate::services::grade::grade_for_sales;
use crate::services::ledger::{add_commission, override_rate};
use crate::services::squad::member_line;

/// Register a new lead for a member. Leads start in `New`.
pub fn register_lead(repo: &mut dyn NetworkRepository, input: CreateLeadInput) -> EngineResult<Lead> {
    validate_input(&input)?;
    if repo.member(input.member_id).is_none() {
        return Err(EngineError::MemberNotFound(input.member_id));
    }

    let lead = Lead {
        id: Uuid::new_v4(),
        member_id: input.member_id,
        customer_name: input.customer_name.trim().to_string(),
        status: LeadStatus::New,
        sale_value: input.sale_value,
    };
    repo.insert_lead(lead.clone());
    Ok(lead)
}

/// Move a lead to a new status.
///
/// Terminal leads reject every further transition, which is what makes the
/// closed-sale trigger fire at most once per lead. Closing a lead
/// synchronously writes the commission entries and refreshes the seller's
/// cumulative totals and grade; losing it settles the lead with no ledger
/// effect.
pub fn transition_lead(
    repo: &mut dyn NetworkRepository,
    lead_id: Uuid,
    next: LeadStatus,
    policy: &EnginePolicy,
    today: NaiveDate,
) -> EngineResult<LeadTransition> {
    let mut lead = repo
        .lead(lead_id)
        .ok_or(EngineError::LeadNotFound(lead_id))?;
    if lead.status.is_terminal() {
        return Err(EngineError::LeadAlreadySettled(lead_id));
    }

    let previous_status = lead.status;
    lead.status = next;

    // First contact feeds the member's cumulative contact counter.
    if previous_status == LeadStatus::New && next == LeadStatus::Contacted {
        let mut member = repo
            .member(lead.member_id)
            .ok_or(EngineError::MemberNotFound(lead.member_id))?;
        member.total_contacts += 1;
        repo.update_member(&member)?;
    }

    // Ledger writes happen before the status is persisted, so a rejected
    // close leaves the lead open instead of closed with no entry.
    let entries = if next == LeadStatus::Closed {
        close_lead(repo, &lead, policy, today)?
    } else {
        Vec::new()
    };
    repo.update_lead(&lead)?;

    info!(
        lead_id = %lead_id,
        from = previous_status.as_str(),
        to = next.as_str(),
        "Lead status updated"
    );
    Ok(LeadTransition {
        lead,
        previous_status,
        entries,
    })
}

/// The sole trigger for ledger writes: one direct entry for the seller, plus
/// one separate override entry when a line-2 seller has a qualifying upline.
fn close_lead(
    repo: &mut dyn NetworkRepository,
    lead: &Lead,
    policy: &EnginePolicy,
    sale_date: NaiveDate,
) -> EngineResult<Vec<CommissionEntry>> {
    let members = repo.members();
    let line = member_line(&members, lead.member_id)?;

    let mut seller = repo
        .member(lead.member_id)
        .ok_or(EngineError::MemberNotFound(lead.member_id))?;
    let upline = seller.upline_id.and_then(|id| repo.member(id));
    let upline_grade = upline.as_ref().map(|u| u.grade);

    let direct = add_commission(
        repo,
        seller.id,
        lead.id,
        sale_date,
        lead.sale_value,
        policy.direct_commission_rate,
    );
    let mut entries = vec![direct];

    seller.total_sales += lead.sale_value;
    seller.total_commission += entries[0].commission_value;
    seller.grade = grade_for_sales(seller.total_sales, policy);
    repo.update_member(&seller)?;

    let rate = override_rate(line, upline_grade, policy);
    if rate > 0.0 {
        if let Some(mut upline_member) = upline {
            let bonus = add_commission(
                repo,
                upline_member.id,
                lead.id,
                sale_date,
                lead.sale_value,
                rate,
            );
            upline_member.total_commission += bonus.commission_value;
            repo.update_member(&upline_member)?;
            entries.push(bonus);
        }
    }

    info!(
        lead_id = %lead.id,
        member_id = %lead.member_id,
        sale_value = lead.sale_value,
        entries = entries.len(),
        "Lead closed, commission recorded"
    );
    Ok(entries)
}
