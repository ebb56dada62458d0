pub mod memory;

use uuid::Uuid;

use crate::error::EngineResult;
use crate::schemas::{CommissionEntry, Lead, Member};

/// Storage seam between the engine and the backing data-access layer.
///
/// Implementations guarantee atomicity per call only. The engine never relies
/// on atomicity across calls; see `services::batches::mark_batch_paid` for the
/// one place that matters.
pub trait NetworkRepository {
    fn member(&self, id: Uuid) -> Option<Member>;
    fn members(&self) -> Vec<Member>;
    /// Rejects a member whose id is already present.
    fn insert_member(&mut self, member: Member) -> EngineResult<()>;
    fn update_member(&mut self, member: &Member) -> EngineResult<()>;

    fn lead(&self, id: Uuid) -> Option<Lead>;
    fn leads(&self) -> Vec<Lead>;
    fn insert_lead(&mut self, lead: Lead);
    fn update_lead(&mut self, lead: &Lead) -> EngineResult<()>;

    fn entry(&self, id: Uuid) -> Option<CommissionEntry>;
    fn entries(&self) -> Vec<CommissionEntry>;
    fn append_entry(&mut self, entry: CommissionEntry);
    fn update_entry(&mut self, entry: &CommissionEntry) -> EngineResult<()>;
}
