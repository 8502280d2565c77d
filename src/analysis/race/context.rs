//! Per-traversal mutable state (SPEC_FULL.md §4.E): which task is being
//! walked, its vector clock, the call-stack of positions that got us here,
//! and the cycle-fuse `BlockStack`.
//!
//! The fresh-id `Counter` is shared (via `Rc<RefCell<_>>`) between a
//! `Context` and every `Context` forked from it for a spawned task, rather
//! than living behind a process-wide static — see SPEC_FULL.md §9, "Global
//! mutable counter".

use std::cell::RefCell;
use std::rc::Rc;

use crate::analysis::race::primitives::{BlockStack, Counter, IntStack, TaskId, VectorClock};

#[derive(Debug, Clone)]
pub struct Context {
    goroutine_id: TaskId,
    clock: VectorClock,
    stack_trace: IntStack,
    counter: Rc<RefCell<Counter>>,
    visited_blocks: BlockStack,
}

impl Context {
    /// A fresh context for the top-level task: id 0, zero clock (§4.I).
    pub fn new_top_level() -> Self {
        Self {
            goroutine_id: 0,
            clock: VectorClock::new(),
            stack_trace: IntStack::new(),
            counter: Rc::new(RefCell::new(Counter::new())),
            visited_blocks: BlockStack::new(),
        }
    }

    pub fn goroutine_id(&self) -> TaskId {
        self.goroutine_id
    }

    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    pub fn stack_trace(&self) -> &IntStack {
        &self.stack_trace
    }

    pub fn visited_blocks(&mut self) -> &mut BlockStack {
        &mut self.visited_blocks
    }

    pub fn push_call(&mut self, pos: usize) {
        self.stack_trace.push(pos);
    }

    pub fn pop_call(&mut self) {
        self.stack_trace.pop();
    }

    /// Bumps the current task's own clock tick, e.g. on every load/store
    /// or opaque instruction (§4.G).
    pub fn bump_own_tick(&mut self) {
        self.clock.increment(self.goroutine_id);
    }

    pub fn next_access_id(&mut self) -> u64 {
        self.counter.borrow_mut().next()
    }

    /// Forks a fresh `Context` for a spawned task (§4.E, §4.G "Spawn"):
    /// bumps the parent's own tick, then seeds the child's clock with the
    /// parent's post-bump clock and a freshly minted, strictly-greater
    /// task id. The child starts its own call stack and cycle fuse from
    /// scratch, since it begins analysis of a new function from its entry
    /// block.
    pub fn fork_for_spawn(&mut self) -> Context {
        self.bump_own_tick();
        let child_id = self.counter.borrow_mut().next();
        Context {
            goroutine_id: child_id,
            clock: self.clock.clone(),
            stack_trace: IntStack::new(),
            counter: Rc::clone(&self.counter),
            visited_blocks: BlockStack::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_seeds_child_strictly_ahead_of_parent() {
        let mut parent = Context::new_top_level();
        let parent_tick_before = parent.clock().tick_of(parent.goroutine_id());
        let child = parent.fork_for_spawn();

        assert!(child.goroutine_id() > parent.goroutine_id());
        let parent_tick_after = parent.clock().tick_of(parent.goroutine_id());
        assert_eq!(parent_tick_after, parent_tick_before + 1);
        assert_eq!(child.clock().tick_of(parent.goroutine_id()), parent_tick_after);
    }

    #[test]
    fn task_ids_are_unique_across_sibling_spawns() {
        let mut parent = Context::new_top_level();
        let child_a = parent.fork_for_spawn();
        let child_b = parent.fork_for_spawn();
        assert_ne!(child_a.goroutine_id(), child_b.goroutine_id());
    }

    #[test]
    fn access_ids_never_zero() {
        let mut ctx = Context::new_top_level();
        for _ in 0..3 {
            assert_ne!(ctx.next_access_id(), 0);
        }
    }
}
