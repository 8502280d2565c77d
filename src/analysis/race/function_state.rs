//! `FunctionState` — the abstract result of executing a function prefix
//! (SPEC_FULL.md §4.D). Unifies the two conflicting shapes the distilled
//! original carries across `domain/FunctionState.go`'s two definitions
//! (one with `DeferredFunctions`, one without) into the superset §3
//! describes.

use crate::analysis::race::context::Context;
use crate::analysis::race::guarded_access::{GuardedAccess, CONTEXT_STRIPPED_ID};
use crate::analysis::race::lockset::Lockset;
use crate::analysis::race::primitives::VectorClock;
use crate::ssa::{FunctionId, Value};

/// `(function_handle, captured_arguments_snapshot, origin_block_index)`.
/// `origin_block_index` is retained for fidelity with §3's record shape
/// but is not consulted by the LIFO unwinder (§9's open question on
/// `BlockIndex`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCall {
    pub function: FunctionId,
    pub captured_arguments: Vec<Value>,
    pub origin_block_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionState {
    pub guarded_accesses: Vec<GuardedAccess>,
    pub lockset: Lockset,
    pub deferred: Vec<DeferredCall>,
}

impl FunctionState {
    pub fn new() -> Self {
        Self {
            guarded_accesses: Vec::new(),
            lockset: Lockset::new(),
            deferred: Vec::new(),
        }
    }

    /// The effect of executing `next` immediately after `self` on the same
    /// path (sequential composition, e.g. after a direct call returns).
    pub fn merge_sequential(&mut self, next: &FunctionState) {
        self.guarded_accesses.extend(next.guarded_accesses.iter().cloned());
        self.deferred.extend(next.deferred.iter().cloned());
        self.lockset
            .sequential_update(next.lockset.held(), next.lockset.released());
    }

    /// Merges a spawned task's accumulated state into the spawner.
    /// Guarded accesses and deferred calls are concatenated, but the
    /// lockset is *not* updated: the child's locks are not held by the
    /// parent (§4.D, §4.G "Spawn").
    pub fn merge_after_spawn(&mut self, child: &FunctionState) {
        self.guarded_accesses.extend(child.guarded_accesses.iter().cloned());
        self.deferred.extend(child.deferred.iter().cloned());
    }

    /// Control-flow join: accesses are set-unioned by id, deferred calls
    /// set-unioned by value (both branches carry the same inherited prefix
    /// from the fork point, and only one branch ever actually runs, so a
    /// defer present on both sides must still unwind exactly once), lockset
    /// via `merge_branch`.
    pub fn merge_branch(&mut self, other: &FunctionState) {
        for ga in &other.guarded_accesses {
            if !self.guarded_accesses.iter().any(|existing| existing.id == ga.id) {
                self.guarded_accesses.push(ga.clone());
            }
        }
        for d in &other.deferred {
            if !self.deferred.contains(d) {
                self.deferred.push(d.clone());
            }
        }
        self.lockset.merge_branch(&other.lockset);
    }

    /// Rewrites each access to reflect the caller's prior lockset, used
    /// when inlining a callee whose accesses were recorded starting from
    /// an empty lockset.
    pub fn rewrite_accesses_with_prior_lockset(&mut self, prior: &Lockset) {
        for ga in &mut self.guarded_accesses {
            let mut rewritten = prior.clone();
            rewritten.sequential_update(ga.lockset.held(), ga.lockset.released());
            ga.lockset = rewritten;
        }
    }

    /// Fills in, for each guarded access, a fresh id, the current task id,
    /// a copy of the current clock, and a composed stack trace (context
    /// stack then the access's own relative stack).
    pub fn apply_context(&mut self, ctx: &mut Context) {
        for ga in &mut self.guarded_accesses {
            ga.id = ctx.next_access_id();
            ga.goroutine_id = ctx.goroutine_id();
            ga.clock = ctx.clock().clone();
            ga.stack_trace = ctx.stack_trace().merge(&ga.stack_trace);
        }
    }

    /// Inverse pre-image operation used when caching a callee's summary:
    /// id/task/clock reset to neutral, and each access's stack trimmed of
    /// the prefix it shares with the context's current stack, so the
    /// stored summary is relocatable to any call site.
    pub fn strip_context(&mut self, ctx: &Context) {
        for ga in &mut self.guarded_accesses {
            let shared = ctx.stack_trace().common_prefix_len(&ga.stack_trace);
            let trimmed: Vec<usize> = ga.stack_trace.items()[shared..].to_vec();
            ga.id = CONTEXT_STRIPPED_ID;
            ga.goroutine_id = 0;
            ga.clock = VectorClock::new();
            ga.stack_trace = trimmed.into_iter().fold(
                crate::analysis::race::primitives::IntStack::new(),
                |mut acc, pos| {
                    acc.push(pos);
                    acc
                },
            );
        }
    }

    pub fn push_deferred(&mut self, call: DeferredCall) {
        self.deferred.push(call);
    }

    /// Pops deferred calls LIFO, as at function exit (§4.F step 3,
    /// §4.G "Return").
    pub fn pop_deferred(&mut self) -> Option<DeferredCall> {
        self.deferred.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::race::guarded_access::OpKind;
    use crate::ssa::Pos;

    fn stub_access(id: u64) -> GuardedAccess {
        let mut ga = GuardedAccess::new_stripped(Pos(1), Value(1), OpKind::Write, Lockset::new());
        ga.id = id;
        ga
    }

    #[test]
    fn merge_branch_dedups_by_id() {
        let mut a = FunctionState::new();
        a.guarded_accesses.push(stub_access(1));
        let mut b = FunctionState::new();
        b.guarded_accesses.push(stub_access(1));
        b.guarded_accesses.push(stub_access(2));
        a.merge_branch(&b);
        assert_eq!(a.guarded_accesses.len(), 2);
    }

    #[test]
    fn strip_then_apply_round_trips_id_clock_task() {
        let mut ctx = Context::new_top_level();
        let mut state = FunctionState::new();
        let mut ga = GuardedAccess::new_stripped(Pos(1), Value(1), OpKind::Write, Lockset::new());
        ga.id = 42;
        ga.goroutine_id = 5;
        ga.clock.increment(5);
        state.guarded_accesses.push(ga);

        state.apply_context(&mut ctx);
        let applied = state.guarded_accesses[0].clone();
        assert_ne!(applied.id, CONTEXT_STRIPPED_ID);
        assert_eq!(applied.goroutine_id, ctx.goroutine_id());

        state.strip_context(&ctx);
        let stripped = &state.guarded_accesses[0];
        assert_eq!(stripped.id, CONTEXT_STRIPPED_ID);
        assert_eq!(stripped.goroutine_id, 0);
        assert_eq!(stripped.clock, VectorClock::new());
    }
}
