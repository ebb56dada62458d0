use uuid::Uuid;

pub type EngineResult<T> = Result<T, EngineError>;

/// Failure taxonomy for engine mutations and traversals.
///
/// Pure aggregation functions return plain values; everything that targets a
/// record by id, enforces capacity policy or walks the hierarchy returns one
/// of these so call sites stay exhaustive over each failure kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Member {0} was not found.")]
    MemberNotFound(Uuid),
    #[error("Lead {0} was not found.")]
    LeadNotFound(Uuid),
    #[error("Commission entry {0} was not found.")]
    EntryNotFound(Uuid),
    #[error("No commission entries exist for member {member_id} in {month}/{year}.")]
    BatchNotFound {
        member_id: Uuid,
        month: u32,
        year: i32,
    },
    #[error("A member with id {0} already exists.")]
    DuplicateMember(Uuid),
    #[error("The network already has the maximum of {0} root members.")]
    RootCapacityReached(usize),
    #[error("Member {member_id} already has the maximum of {max} direct downlines.")]
    DownlineCapacityReached { member_id: Uuid, max: usize },
    #[error("Lead {0} is already settled and cannot change status.")]
    LeadAlreadySettled(Uuid),
    #[error("Upline chain loops back on itself at member {0}.")]
    HierarchyCycle(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
}
