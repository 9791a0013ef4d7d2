//! Slot arena.
//!
//! Tuple bytes live in groups, each one contiguous allocation of
//! `group_size * tuple_size` bytes. Links between slots are kept in two
//! parallel index tables (`prev`, `next`) indexed by node id. Node ids
//! `0..FIRST_SLOT` are the sentinels bounding the free list and the data
//! list, so no list operation has to handle a missing neighbour.

use std::fmt;

use tracing::debug;

use crate::error::{StorageError, StorageResult};

const FREE_HEAD: u32 = 0;
const FREE_TAIL: u32 = 1;
const DATA_HEAD: u32 = 2;
const DATA_TAIL: u32 = 3;
const FIRST_SLOT: u32 = 4;

/// Identity of a tuple slot within its table store.
///
/// A live tuple keeps its id until it is deleted; updates rewrite its bytes
/// in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleId(u32);

impl TupleId {
    /// Creates a tuple id from its raw node index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw node index.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which list a slot is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotState {
    /// In the free list, reusable.
    Free,
    /// In the free list, kept at its tail and not reusable until released.
    Retained,
    /// In the data list.
    Live,
}

pub(crate) struct SlotArena {
    tuple_size: usize,
    group_size: usize,
    groups: Vec<Box<[u8]>>,
    prev: Vec<u32>,
    next: Vec<u32>,
    /// Indexed by `node - FIRST_SLOT`.
    state: Vec<SlotState>,
    free_len: usize,
}

impl SlotArena {
    pub(crate) fn new(tuple_size: usize, group_size: usize) -> Self {
        // Sentinels: each head points at its tail and vice versa.
        let prev = vec![FREE_HEAD, FREE_HEAD, DATA_HEAD, DATA_HEAD];
        let next = vec![FREE_TAIL, FREE_TAIL, DATA_TAIL, DATA_TAIL];
        Self {
            tuple_size,
            group_size,
            groups: Vec::new(),
            prev,
            next,
            state: Vec::new(),
            free_len: 0,
        }
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.state.len()
    }

    pub(crate) fn free_len(&self) -> usize {
        self.free_len
    }

    pub(crate) fn state(&self, id: TupleId) -> Option<SlotState> {
        id.0.checked_sub(FIRST_SLOT)
            .and_then(|slot| self.state.get(slot as usize))
            .copied()
    }

    fn set_state(&mut self, id: TupleId, state: SlotState) {
        self.state[(id.0 - FIRST_SLOT) as usize] = state;
    }

    /// Checks that `id` names a slot in `expected` state.
    pub(crate) fn expect_state(
        &self,
        id: TupleId,
        expected: &[SlotState],
        description: &'static str,
    ) -> StorageResult<SlotState> {
        match self.state(id) {
            Some(state) if expected.contains(&state) => Ok(state),
            _ => Err(StorageError::InvalidTuple {
                tuple: id,
                expected: description,
            }),
        }
    }

    // =========================================================================
    // Tuple Bytes
    // =========================================================================

    fn locate(&self, id: TupleId) -> (usize, usize) {
        let slot = (id.0 - FIRST_SLOT) as usize;
        (slot / self.group_size, (slot % self.group_size) * self.tuple_size)
    }

    /// Returns a slot's bytes. The id must have been checked.
    pub(crate) fn body(&self, id: TupleId) -> &[u8] {
        let (group, offset) = self.locate(id);
        &self.groups[group][offset..offset + self.tuple_size]
    }

    /// Returns a slot's bytes mutably. The id must have been checked.
    pub(crate) fn body_mut(&mut self, id: TupleId) -> &mut [u8] {
        let (group, offset) = self.locate(id);
        let size = self.tuple_size;
        &mut self.groups[group][offset..offset + size]
    }

    // =========================================================================
    // Growth
    // =========================================================================

    /// Allocates one group and pushes its slots onto the free list head.
    fn grow(&mut self) -> StorageResult<()> {
        let bytes = self.group_size.saturating_mul(self.tuple_size);
        let alloc_failed = || StorageError::AllocationFailed { bytes };

        let first = FIRST_SLOT as usize + self.state.len();
        let end = first
            .checked_add(self.group_size)
            .filter(|&end| end <= u32::MAX as usize)
            .ok_or_else(alloc_failed)?;

        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(bytes).map_err(|_| alloc_failed())?;
        buf.resize(bytes, 0);
        self.prev.try_reserve(self.group_size).map_err(|_| alloc_failed())?;
        self.next.try_reserve(self.group_size).map_err(|_| alloc_failed())?;
        self.state.try_reserve(self.group_size).map_err(|_| alloc_failed())?;

        self.groups.push(buf.into_boxed_slice());
        for _ in first..end {
            self.prev.push(FREE_HEAD);
            self.next.push(FREE_HEAD);
            self.state.push(SlotState::Free);
        }
        // Highest first, so the lowest new slot ends up at the head.
        for node in (first..end).rev() {
            self.link_after(node as u32, FREE_HEAD);
        }
        self.free_len += self.group_size;

        debug!(
            groups = self.groups.len(),
            slots = self.state.len(),
            bytes,
            "allocated tuple group"
        );
        Ok(())
    }

    // =========================================================================
    // List Operations
    // =========================================================================

    fn unlink(&mut self, node: u32) {
        let (p, n) = (self.prev[node as usize], self.next[node as usize]);
        self.next[p as usize] = n;
        self.prev[n as usize] = p;
    }

    fn link_after(&mut self, node: u32, anchor: u32) {
        let n = self.next[anchor as usize];
        self.prev[node as usize] = anchor;
        self.next[node as usize] = n;
        self.next[anchor as usize] = node;
        self.prev[n as usize] = node;
    }

    fn link_before(&mut self, node: u32, anchor: u32) {
        let p = self.prev[anchor as usize];
        self.link_after(node, p);
    }

    /// Takes a reusable slot off the free list, growing if there is none.
    ///
    /// Retained slots are always at the tail of the free list, so a retained
    /// head means nothing is reusable.
    pub(crate) fn pop_free(&mut self) -> StorageResult<TupleId> {
        let head = self.next[FREE_HEAD as usize];
        let reusable = head != FREE_TAIL && self.state(TupleId(head)) == Some(SlotState::Free);
        if !reusable {
            self.grow()?;
        }
        let node = self.next[FREE_HEAD as usize];
        self.unlink(node);
        self.free_len -= 1;
        Ok(TupleId(node))
    }

    /// Moves a slot out of whichever list holds it into the data list head.
    pub(crate) fn push_live(&mut self, id: TupleId, from_free_list: bool) {
        if from_free_list {
            self.unlink(id.0);
            self.free_len -= 1;
        }
        self.link_after(id.0, DATA_HEAD);
        self.set_state(id, SlotState::Live);
    }

    /// Moves a live slot into the free list.
    pub(crate) fn release_live(&mut self, id: TupleId, retain: bool) {
        self.unlink(id.0);
        self.push_free(id, retain);
    }

    /// Marks a retained slot reusable by moving it to the free list head.
    pub(crate) fn unretain(&mut self, id: TupleId) {
        self.unlink(id.0);
        self.free_len -= 1;
        self.push_free(id, false);
    }

    fn push_free(&mut self, id: TupleId, retain: bool) {
        if retain {
            self.link_before(id.0, FREE_TAIL);
            self.set_state(id, SlotState::Retained);
        } else {
            self.link_after(id.0, FREE_HEAD);
            self.set_state(id, SlotState::Free);
        }
        self.free_len += 1;
    }

    /// First live slot (most recently inserted).
    pub(crate) fn first_live(&self) -> Option<TupleId> {
        self.live_after(DATA_HEAD)
    }

    /// Live slot following `id` in the data list.
    pub(crate) fn next_live(&self, id: TupleId) -> Option<TupleId> {
        self.live_after(id.0)
    }

    fn live_after(&self, node: u32) -> Option<TupleId> {
        let n = self.next[node as usize];
        (n != DATA_TAIL).then_some(TupleId(n))
    }
}

impl fmt::Debug for SlotArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotArena")
            .field("tuple_size", &self.tuple_size)
            .field("group_size", &self.group_size)
            .field("groups", &self.groups.len())
            .field("slots", &self.state.len())
            .field("free", &self.free_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(arena: &SlotArena, head: u32, tail: u32) -> Vec<u32> {
        let mut nodes = Vec::new();
        let mut node = arena.next[head as usize];
        while node != tail {
            assert_eq!(arena.next[arena.prev[node as usize] as usize], node);
            nodes.push(node);
            node = arena.next[node as usize];
        }
        nodes
    }

    #[test]
    fn test_empty_arena() {
        let arena = SlotArena::new(8, 3);
        assert_eq!(arena.group_count(), 0);
        assert!(arena.first_live().is_none());
        assert!(walk(&arena, FREE_HEAD, FREE_TAIL).is_empty());
    }

    #[test]
    fn test_grow_on_first_pop() {
        let mut arena = SlotArena::new(8, 3);
        let id = arena.pop_free().unwrap();
        assert_eq!(id, TupleId(FIRST_SLOT));
        assert_eq!(arena.group_count(), 1);
        assert_eq!(arena.free_len(), 2);
        assert_eq!(walk(&arena, FREE_HEAD, FREE_TAIL), vec![5, 6]);
    }

    #[test]
    fn test_data_list_is_newest_first() {
        let mut arena = SlotArena::new(8, 3);
        let a = arena.pop_free().unwrap();
        arena.push_live(a, false);
        let b = arena.pop_free().unwrap();
        arena.push_live(b, false);

        assert_eq!(arena.first_live(), Some(b));
        assert_eq!(arena.next_live(b), Some(a));
        assert_eq!(arena.next_live(a), None);
    }

    #[test]
    fn test_retained_slots_are_not_reused() {
        let mut arena = SlotArena::new(8, 1);
        let a = arena.pop_free().unwrap();
        arena.push_live(a, false);
        arena.release_live(a, true);
        assert_eq!(arena.state(a), Some(SlotState::Retained));

        let b = arena.pop_free().unwrap();
        assert_ne!(a, b);
        assert_eq!(arena.group_count(), 2);

        arena.unretain(a);
        let c = arena.pop_free().unwrap();
        assert_eq!(c, a);
        assert_eq!(arena.group_count(), 2);
    }

    #[test]
    fn test_body_locations_do_not_overlap() {
        let mut arena = SlotArena::new(4, 2);
        let ids: Vec<_> = (0..5).map(|_| arena.pop_free().unwrap()).collect();
        for (i, id) in ids.iter().enumerate() {
            arena.body_mut(*id).fill(i as u8);
        }
        for (i, id) in ids.iter().enumerate() {
            assert!(arena.body(*id).iter().all(|&b| b == i as u8));
        }
        assert_eq!(arena.group_count(), 3);
    }

    #[test]
    fn test_state_of_unknown_id() {
        let arena = SlotArena::new(4, 2);
        assert_eq!(arena.state(TupleId(DATA_TAIL)), None);
        assert_eq!(arena.state(TupleId(1000)), None);
    }
}
