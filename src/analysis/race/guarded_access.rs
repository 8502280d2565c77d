//! A single read/write site tagged with lockset, clock, task identity and
//! call stack (SPEC_FULL.md §4.C). Grounded on the distilled
//! `domain/GuardedAccess.go`, restated here with the race predicate in
//! positive polarity rather than the original's inverted `Intersects`
//! (see §9's open question).

use crate::analysis::race::lockset::Lockset;
use crate::analysis::race::primitives::{IntStack, TaskId, VectorClock};
use crate::ssa::{Pos, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Read,
    Write,
}

/// `(goroutine_id, clock)` — the task a guarded access (or the context
/// producing it) belongs to, and its happens-before witness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoroutineState {
    pub goroutine_id: TaskId,
    pub clock: VectorClock,
}

impl GoroutineState {
    pub fn new(goroutine_id: TaskId) -> Self {
        Self {
            goroutine_id,
            clock: VectorClock::new(),
        }
    }

    pub fn increment(&mut self) {
        self.clock.increment(self.goroutine_id);
    }
}

/// `id = 0` is the sentinel "context-stripped" value (§4.D `strip_context`).
pub const CONTEXT_STRIPPED_ID: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedAccess {
    pub id: u64,
    pub position: Pos,
    pub value: Value,
    pub op_kind: OpKind,
    pub lockset: Lockset,
    pub goroutine_id: TaskId,
    pub clock: VectorClock,
    pub stack_trace: IntStack,
}

impl GuardedAccess {
    /// Builds a context-stripped access: the shape produced while walking
    /// a function in isolation, before `apply_context` (§4.D) fills in a
    /// real id, task, clock and composed stack.
    pub fn new_stripped(position: Pos, value: Value, op_kind: OpKind, lockset: Lockset) -> Self {
        Self {
            id: CONTEXT_STRIPPED_ID,
            position,
            value,
            op_kind,
            lockset,
            goroutine_id: 0,
            clock: VectorClock::new(),
            stack_trace: IntStack::new(),
        }
    }

    /// The race-filter predicate, stated in reporting polarity: returns
    /// `true` when the pair *should* be considered a race candidate,
    /// i.e. none of the five exclusions in SPEC_FULL.md §4.C apply.
    pub fn intersects(&self, other: &GuardedAccess) -> bool {
        if self.id == other.id {
            return false;
        }
        if self.goroutine_id == other.goroutine_id {
            return false;
        }
        if self.op_kind == OpKind::Read && other.op_kind == OpKind::Read {
            return false;
        }
        if self.clock.ordered(&other.clock) {
            return false;
        }
        if !self.lockset.common(&other.lockset).is_empty() {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(id: u64, task: TaskId, op: OpKind, tick: u64) -> GuardedAccess {
        let mut clock = VectorClock::new();
        for _ in 0..tick {
            clock.increment(task);
        }
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
    fn same_id_never_races_with_itself() {
        let a = access(1, 0, OpKind::Write, 1);
        assert!(!a.intersects(&a));
    }

    #[test]
    fn same_task_is_sequential() {
        let a = access(1, 0, OpKind::Write, 1);
        let b = access(2, 0, OpKind::Write, 2);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn two_reads_never_race() {
        let a = access(1, 0, OpKind::Read, 1);
        let b = access(2, 1, OpKind::Read, 1);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn hb_ordered_writes_do_not_race() {
        let a = access(1, 0, OpKind::Write, 1);
        let mut b = access(2, 1, OpKind::Write, 1);
        b.clock.join(&a.clock);
        b.clock.increment(1);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn concurrent_unguarded_writes_race() {
        let a = access(1, 0, OpKind::Write, 1);
        let b = access(2, 1, OpKind::Write, 1);
        assert!(a.intersects(&b));
    }

    #[test]
    fn shared_lock_prevents_race() {
        let mut a = access(1, 0, OpKind::Write, 1);
        let mut b = access(2, 1, OpKind::Write, 1);
        let lock = crate::analysis::race::lockset::Lock::new(Value(9));
        a.lockset.add_lock(lock);
        b.lockset.add_lock(lock);
        assert!(!a.intersects(&b));
    }
}
