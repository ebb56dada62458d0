use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::schemas::{Member, SquadMetrics};

/// Hierarchy depth classification. Only the first two lines carry commercial
/// meaning: override commission is paid exclusively on line-2 sales, and
/// deeper levels never earn one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLine {
    First,
    Second,
    Deeper,
}

impl MemberLine {
    /// External encoding: 1 for roots, 2 for direct children of a root,
    /// 0 for everything deeper.
    pub fn as_number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Deeper => 0,
        }
    }
}

fn arena(members: &[Member]) -> HashMap<Uuid, &Member> {
    members.iter().map(|member| (member.id, member)).collect()
}

fn children_index(members: &[Member]) -> HashMap<Uuid, Vec<Uuid>> {
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for member in members {
        if let Some(upline_id) = member.upline_id {
            children.entry(upline_id).or_default().push(member.id);
        }
    }
    children
}

/// Collect the full downline closure of `root_id`, root excluded.
///
/// Breadth-first pass over an id-indexed arena with an explicit work queue
/// and visited set, so it terminates on any input. Each member hangs off one
/// upline, so re-encountering a visited member means the upline pointers loop
/// back; that corruption is surfaced instead of truncated away.
pub fn member_squad(members: &[Member], root_id: Uuid) -> EngineResult<Vec<Member>> {
    let by_id = arena(members);
    if !by_id.contains_key(&root_id) {
        return Err(EngineError::MemberNotFound(root_id));
    }
    let children = children_index(members);

    let mut visited: HashSet<Uuid> = HashSet::from([root_id]);
    let mut queue: VecDeque<Uuid> = VecDeque::from([root_id]);
    let mut squad = Vec::new();

    while let Some(current) = queue.pop_front() {
        for child_id in children.get(&current).into_iter().flatten() {
            if !visited.insert(*child_id) {
                warn!(member_id = %child_id, "Upline chain loops back on itself");
                return Err(EngineError::HierarchyCycle(*child_id));
            }
            if let Some(child) = by_id.get(child_id) {
                squad.push((*child).clone());
                queue.push_back(*child_id);
            }
        }
    }

    Ok(squad)
}

/// Sum contact, sales and commission totals over a leader's downline closure.
/// The leader is excluded from the sums and reported separately; every
/// metrics view applies the same convention.
pub fn squad_metrics(members: &[Member], leader_id: Uuid) -> EngineResult<SquadMetrics> {
    let squad = member_squad(members, leader_id)?;

    let mut metrics = SquadMetrics {
        leader_id,
        squad_size: squad.len(),
        total_contacts: 0,
        total_sales: 0.0,
        total_commission: 0.0,
    };
    for member in &squad {
        metrics.total_contacts += member.total_contacts;
        metrics.total_sales += member.total_sales;
        metrics.total_commission += member.total_commission;
    }

    Ok(metrics)
}

/// Walk upline pointers from `member_id` to the topmost ancestor.
///
/// The first element is the starting member, the last the root of its line.
/// A dangling upline reference ends the walk at the last member that
/// resolves; a revisited member surfaces `HierarchyCycle`.
pub fn member_path(members: &[Member], member_id: Uuid) -> EngineResult<Vec<Member>> {
    let by_id = arena(members);
    let Some(start) = by_id.get(&member_id) else {
        return Err(EngineError::MemberNotFound(member_id));
    };

    let mut visited: HashSet<Uuid> = HashSet::from([member_id]);
    let mut path = vec![(*start).clone()];
    let mut cursor = start.upline_id;

    while let Some(next_id) = cursor {
        if !visited.insert(next_id) {
            warn!(member_id = %next_id, "Upline chain loops back on itself");
            return Err(EngineError::HierarchyCycle(next_id));
        }
        let Some(next) = by_id.get(&next_id) else {
            break;
        };
        path.push((*next).clone());
        cursor = next.upline_id;
    }

    Ok(path)
}

/// Classify a member's hierarchy line: `First` for roots, `Second` when the
/// upline is itself a root, `Deeper` otherwise. An upline reference that does
/// not resolve cannot prove line 2, so it classifies as `Deeper` and never
/// earns an override.
pub fn member_line(members: &[Member], member_id: Uuid) -> EngineResult<MemberLine> {
    let by_id = arena(members);
    let Some(member) = by_id.get(&member_id) else {
        return Err(EngineError::MemberNotFound(member_id));
    };
    let Some(upline_id) = member.upline_id else {
        return Ok(MemberLine::First);
    };
    match by_id.get(&upline_id) {
        Some(upline) if upline.upline_id.is_none() => Ok(MemberLine::Second),
        _ => Ok(MemberLine::Deeper),
    }
}
