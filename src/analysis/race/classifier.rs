//! Turns a flat list of guarded accesses into the set of racing pairs
//! (SPEC_FULL.md §4.J): an O(n^2) cross-product check using
//! `GuardedAccess::intersects`, since the whole point of the lockset and
//! clock bookkeeping upstream is to make each individual check O(1).

use crate::analysis::race::guarded_access::GuardedAccess;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RacePair {
    pub first: GuardedAccess,
    pub second: GuardedAccess,
}

/// All unordered pairs `(a, b)` with `a.id < b.id` for which
/// `a.intersects(b)` holds, sorted by `(a.id, b.id)` for stable output.
pub fn find_races(accesses: &[GuardedAccess]) -> Vec<RacePair> {
    let mut pairs = Vec::new();
    for i in 0..accesses.len() {
        for j in (i + 1)..accesses.len() {
            let (a, b) = (&accesses[i], &accesses[j]);
            if a.intersects(b) {
                let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };
                pairs.push(RacePair {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
    }
    pairs.sort_by_key(|pair| (pair.first.id, pair.second.id));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::race::guarded_access::OpKind;
    use crate::analysis::race::lockset::Lockset;
    use crate::analysis::race::primitives::{IntStack, VectorClock};
    use crate::ssa::{Pos, Value};

    fn access(id: u64, task: u64, op: OpKind) -> GuardedAccess {
        let mut clock = VectorClock::new();
        clock.increment(task);
        GuardedAccess {
            id,
            position: Pos(0),
            value: Value(1),
            op_kind: op,
            lockset: Lockset::new(),
            goroutine_id: task,
            clock,
            stack_trace: IntStack::new(),
        }
    }

    #[test]
    fn finds_one_racing_pair_among_three_accesses() {
        let accesses = vec![
            access(1, 0, OpKind::Write),
            access(2, 1, OpKind::Write),
            access(3, 0, OpKind::Read),
        ];
        let races = find_races(&accesses);
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].first.id, 1);
        assert_eq!(races[0].second.id, 2);
    }

    #[test]
    fn no_accesses_means_no_races() {
        assert!(find_races(&[]).is_empty());
    }
}
