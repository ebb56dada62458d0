use tracing::info;
use uuid::Uuid;

use crate::config::EnginePolicy;
use crate::error::{EngineError, EngineResult};
use crate::repository::NetworkRepository;
use crate::schemas::{validate_input, EnrollMemberInput, Grade, Member};

/// Enroll a member into the network, enforcing the capacity policy.
///
/// Roots ("line 1") are capped network-wide; every other enrollment hangs off
/// an existing upline, which is capped on direct downlines. Both checks run
/// before any mutation, so a rejected enrollment leaves the store untouched.
pub fn enroll_member(
    repo: &mut dyn NetworkRepository,
    input: EnrollMemberInput,
    policy: &EnginePolicy,
) -> EngineResult<Member> {
    validate_input(&input)?;

    let members = repo.members();
    match input.upline_id {
        None => {
            let roots = members.iter().filter(|m| m.upline_id.is_none()).count();
            if roots >= policy.max_root_members {
                return Err(EngineError::RootCapacityReached(policy.max_root_members));
            }
        }
        Some(upline_id) => {
            if repo.member(upline_id).is_none() {
                return Err(EngineError::MemberNotFound(upline_id));
            }
            let direct = members
                .iter()
                .filter(|m| m.upline_id == Some(upline_id))
                .count();
            if direct >= policy.max_direct_downlines {
                return Err(EngineError::DownlineCapacityReached {
                    member_id: upline_id,
                    max: policy.max_direct_downlines,
                });
            }
        }
    }

    let member = Member {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        upline_id: input.upline_id,
        grade: Grade::Bronze,
        total_sales: 0.0,
        total_contacts: 0,
        total_commission: 0.0,
    };
    repo.insert_member(member.clone())?;
    info!(member_id = %member.id, upline_id = ?member.upline_id, "Member enrolled");
    Ok(member)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::enroll_member;
    use crate::config::EnginePolicy;
    use crate::error::EngineError;
    use crate::repository::memory::InMemoryRepository;
    use crate::schemas::{EnrollMemberInput, Grade};

    fn input(name: &str, upline_id: Option<Uuid>) -> EnrollMemberInput {
        EnrollMemberInput {
            name: name.to_string(),
            upline_id,
        }
    }

    fn small_policy() -> EnginePolicy {
        EnginePolicy {
            max_root_members: 2,
            max_direct_downlines: 1,
            ..EnginePolicy::default()
        }
    }

    #[test]
    fn enrolls_roots_and_downlines() {
        let policy = small_policy();
        let mut repo = InMemoryRepository::new();

        let root = enroll_member(&mut repo, input("Ana", None), &policy).expect("root");
        assert_eq!(root.grade, Grade::Bronze);
        assert_eq!(root.total_sales, 0.0);

        let child =
            enroll_member(&mut repo, input("Bruno", Some(root.id)), &policy).expect("child");
        assert_eq!(child.upline_id, Some(root.id));
    }

    #[test]
    fn enforces_root_capacity() {
        let policy = small_policy();
        let mut repo = InMemoryRepository::new();
        enroll_member(&mut repo, input("Ana", None), &policy).expect("first root");
        enroll_member(&mut repo, input("Bia", None), &policy).expect("second root");
        assert_eq!(
            enroll_member(&mut repo, input("Caio", None), &policy),
            Err(EngineError::RootCapacityReached(2))
        );
    }

    #[test]
    fn enforces_direct_downline_capacity() {
        let policy = small_policy();
        let mut repo = InMemoryRepository::new();
        let root = enroll_member(&mut repo, input("Ana", None), &policy).expect("root");
        enroll_member(&mut repo, input("Bruno", Some(root.id)), &policy).expect("first child");
        assert_eq!(
            enroll_member(&mut repo, input("Caio", Some(root.id)), &policy),
            Err(EngineError::DownlineCapacityReached {
                member_id: root.id,
                max: 1,
            })
        );
    }

    #[test]
    fn rejects_unknown_upline() {
        let policy = small_policy();
        let mut repo = InMemoryRepository::new();
        let ghost = Uuid::new_v4();
        assert_eq!(
            enroll_member(&mut repo, input("Ana", Some(ghost)), &policy),
            Err(EngineError::MemberNotFound(ghost))
        );
    }

    #[test]
    fn rejects_blank_names() {
        let policy = small_policy();
        let mut repo = InMemoryRepository::new();
        assert!(matches!(
            enroll_member(&mut repo, input("", None), &policy),
            Err(EngineError::Validation(_))
        ));
    }
}
