use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::repository::NetworkRepository;
use crate::schemas::{CommissionEntry, Lead, Member};

/// In-memory store backing tests and embedders that do not bring their own
/// database. Members and leads are keyed by id in ordered maps so listings
/// are deterministic; the ledger keeps append order.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    members: BTreeMap<Uuid, Member>,
    leads: BTreeMap<Uuid, Lead>,
    entries: Vec<CommissionEntry>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetworkRepository for InMemoryRepository {
    fn member(&self, id: Uuid) -> Option<Member> {
        self.members.get(&id).cloned()
    }

    fn members(&self) -> Vec<Member> {
        self.members.values().cloned().collect()
    }

    fn insert_member(&mut self, member: Member) -> EngineResult<()> {
        if self.members.contains_key(&member.id) {
            return Err(EngineError::DuplicateMember(member.id));
        }
        self.members.insert(member.id, member);
        Ok(())
    }

    fn update_member(&mut self, member: &Member) -> EngineResult<()> {
        let slot = self
            .members
            .get_mut(&member.id)
            .ok_or(EngineError::MemberNotFound(member.id))?;
        *slot = member.clone();
        Ok(())
    }

    fn lead(&self, id: Uuid) -> Option<Lead> {
        self.leads.get(&id).cloned()
    }

    fn leads(&self) -> Vec<Lead> {
        self.leads.values().cloned().collect()
    }

    fn insert_lead(&mut self, lead: Lead) {
        self.leads.insert(lead.id, lead);
    }

    fn update_lead(&mut self, lead: &Lead) -> EngineResult<()> {
        let slot = self
            .leads
            .get_mut(&lead.id)
            .ok_or(EngineError::LeadNotFound(lead.id))?;
        *slot = lead.clone();
        Ok(())
    }

    fn entry(&self, id: Uuid) -> Option<CommissionEntry> {
        self.entries.iter().find(|entry| entry.id == id).cloned()
    }

    fn entries(&self) -> Vec<CommissionEntry> {
        self.entries.clone()
    }

    fn append_entry(&mut self, entry: CommissionEntry) {
        self.entries.push(entry);
    }

    fn update_entry(&mut self, entry: &CommissionEntry) -> EngineResult<()> {
        let slot = self
            .entries
            .iter_mut()
            .find(|candidate| candidate.id == entry.id)
            .ok_or(EngineError::EntryNotFound(entry.id))?;
        *slot = entry.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::InMemoryRepository;
    use crate::error::EngineError;
    use crate::repository::NetworkRepository;
    use crate::schemas::{Grade, Member};

    fn member(id: Uuid) -> Member {
        Member {
            id,
            name: "Ana".to_string(),
            upline_id: None,
            grade: Grade::Bronze,
            total_sales: 0.0,
            total_contacts: 0,
            total_commission: 0.0,
        }
    }

    #[test]
    fn rejects_duplicate_member_identity() {
        let mut repo = InMemoryRepository::new();
        let id = Uuid::new_v4();
        repo.insert_member(member(id)).expect("first insert");
        assert_eq!(
            repo.insert_member(member(id)),
            Err(EngineError::DuplicateMember(id))
        );
    }

    #[test]
    fn update_of_unknown_member_is_not_found() {
        let mut repo = InMemoryRepository::new();
        let ghost = member(Uuid::new_v4());
        assert_eq!(
            repo.update_member(&ghost),
            Err(EngineError::MemberNotFound(ghost.id))
        );
    }
}
