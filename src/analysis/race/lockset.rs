//! Held/released lock tracking across a path (SPEC_FULL.md §4.B).
//!
//! A `Lock`'s identity is the SSA value identity of the object it guards,
//! mirroring the teacher's own `LockObject` (`analysis/deadlock/types.rs`)
//! which keys on `DefId`. Our SSA value handles are already unique per
//! declaration site, so no separate position component is needed here.

use std::collections::BTreeSet;

use crate::ssa::Value;

/// Opaque identity of a lock value. No state is attached to the lock
/// itself; equality is by the SSA value it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lock(pub Value);

impl Lock {
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

/// `(Held, Released)` over `Lock`. `Held` is the must-hold set; `Released`
/// records locks unlocked on some prior path, used to invalidate future
/// merges with a lock that might still be thought held elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lockset {
    held: BTreeSet<Lock>,
    released: BTreeSet<Lock>,
}

impl Lockset {
    pub fn new() -> Self {
        Self {
            held: BTreeSet::new(),
            released: BTreeSet::new(),
        }
    }

    pub fn held(&self) -> &BTreeSet<Lock> {
        &self.held
    }

    pub fn released(&self) -> &BTreeSet<Lock> {
        &self.released
    }

    pub fn add_lock(&mut self, lock: Lock) {
        self.held.insert(lock);
        self.released.remove(&lock);
    }

    pub fn remove_lock(&mut self, lock: Lock) {
        self.held.remove(&lock);
        self.released.insert(lock);
    }

    /// Applies `other`'s effects as if executed immediately after self —
    /// used to graft a callee's lockset effects onto the caller's.
    pub fn sequential_update(&mut self, other_held: &BTreeSet<Lock>, other_released: &BTreeSet<Lock>) {
        let mut held: BTreeSet<Lock> = self.held.union(other_held).copied().collect();
        for lock in other_released {
            held.remove(lock);
        }
        let mut released: BTreeSet<Lock> = self.released.union(other_released).copied().collect();
        for lock in other_held {
            released.remove(lock);
        }
        self.held = held;
        self.released = released;
    }

    /// Meet of the lockset lattice at a CFG join: only locks held on
    /// *every* incoming edge survive in `Held`; a release on *any* edge
    /// taints `Released` going forward.
    pub fn merge_branch(&mut self, other: &Lockset) {
        self.held = self.held.intersection(&other.held).copied().collect();
        self.released = self.released.union(&other.released).copied().collect();
    }

    pub fn common(&self, other: &Lockset) -> BTreeSet<Lock> {
        self.held.intersection(&other.held).copied().collect()
    }

    pub fn is_held(&self, lock: &Lock) -> bool {
        self.held.contains(lock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssa::Value;

    fn lock(n: u32) -> Lock {
        Lock::new(Value(n))
    }

    #[test]
    fn add_then_remove_round_trips() {
        let mut ls = Lockset::new();
        let m = lock(1);
        ls.add_lock(m);
        assert!(ls.is_held(&m));
        assert!(!ls.released().contains(&m));
        ls.remove_lock(m);
        assert!(!ls.is_held(&m));
        assert!(ls.released().contains(&m));
    }

    #[test]
    fn merge_branch_is_glb_on_held_lub_on_released() {
        let mut a = Lockset::new();
        a.add_lock(lock(1));
        a.add_lock(lock(2));
        let mut b = Lockset::new();
        b.add_lock(lock(1));
        b.remove_lock(lock(3));

        a.merge_branch(&b);
        assert_eq!(a.held().iter().copied().collect::<Vec<_>>(), vec![lock(1)]);
        assert!(a.released().contains(&lock(3)));
    }

    #[test]
    fn merge_branch_idempotent() {
        let mut a = Lockset::new();
        a.add_lock(lock(1));
        a.remove_lock(lock(2));
        let snapshot = a.clone();
        a.merge_branch(&snapshot);
        assert_eq!(a, snapshot);
    }

    #[test]
    fn unlock_one_branch_not_other_yields_released_after_join() {
        let mut locked_both = Lockset::new();
        locked_both.add_lock(lock(1));

        let mut unlocked_on_one_branch = locked_both.clone();
        unlocked_on_one_branch.remove_lock(lock(1));

        let mut joined = locked_both.clone();
        joined.merge_branch(&unlocked_on_one_branch);

        assert!(!joined.is_held(&lock(1)));
        assert!(joined.released().contains(&lock(1)));
    }
}
