use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{EngineError, EngineResult};

pub fn validate_input<T: Validate>(input: &T) -> EngineResult<()> {
    input
        .validate()
        .map_err(|errors| EngineError::Validation(errors.to_string()))
}

/// Member tier derived from cumulative sales.
///
/// Variant order is the tier order, so the derived `Ord` is the one used for
/// override eligibility and monotonicity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

/// Lead pipeline status. `Closed` and `Lost` are terminal; the transition
/// into `Closed` is the sole trigger for commission-entry creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    InProgress,
    Negotiating,
    Closed,
    Lost,
}

impl LeadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::InProgress => "in_progress",
            Self::Negotiating => "negotiating",
            Self::Closed => "closed",
            Self::Lost => "lost",
        }
    }
}

/// A member of the sales network. `upline_id == None` marks a root ("line 1")
/// member. Cumulative totals and the grade are refreshed at the moment a
/// commission entry is written, never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub upline_id: Option<Uuid>,
    pub grade: Grade,
    pub total_sales: f64,
    pub total_contacts: u64,
    pub total_commission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub member_id: Uuid,
    pub customer_name: String,
    pub status: LeadStatus,
    pub sale_value: f64,
}

/// One ledger line: the commission owed to one member for one closed lead.
/// Immutable once written, except for the paid flag / payment date pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionEntry {
    pub id: Uuid,
    pub member_id: Uuid,
    pub lead_id: Uuid,
    pub sale_date: NaiveDate,
    pub sale_value: f64,
    pub commission_percentage: f64,
    pub commission_value: f64,
    pub is_paid: bool,
    pub payment_date: Option<NaiveDate>,
}

/// Derived monthly payable unit: every entry for one member in one calendar
/// month of sale. Never persisted; recomputed on each read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionBatch {
    pub member_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub total_value: f64,
    pub entry_count: usize,
    pub is_paid: bool,
    pub due_date: NaiveDate,
}

/// Aggregated totals over a leader's full downline closure. The leader is
/// excluded from the sums and reported separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadMetrics {
    pub leader_id: Uuid,
    pub squad_size: usize,
    pub total_contacts: u64,
    pub total_sales: f64,
    pub total_commission: f64,
}

/// Projection of pending commission up to a reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionForecast {
    pub next_payment_date: NaiveDate,
    pub total_pending_amount: f64,
    pub pending_batches: usize,
    pub members_with_pending: usize,
}

/// Outcome of a lead status change, including any commission entries the
/// transition wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadTransition {
    pub lead: Lead,
    pub previous_status: LeadStatus,
    pub entries: Vec<CommissionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrollMemberInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub upline_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadInput {
    pub member_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    #[validate(range(min = 0.0))]
    pub sale_value: f64,
}
