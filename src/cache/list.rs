//! Node Arena Module
//!
//! Index-linked doubly-linked rings stored in one slab, shared by the LRU
//! recency list and the LFU frequency buckets.
//!
//! Every ring is anchored by a sentinel slot that carries no item. Walking
//! `next` from the sentinel visits the front (most recently linked) first and
//! the back last. Freed slots go on a free list and are reused by the next
//! allocation.

// == Slot ==
#[derive(Debug)]
struct Slot<T> {
    prev: usize,
    next: usize,
    /// `None` for sentinels and freed slots
    item: Option<T>,
}

// == Node Arena ==
/// Slab of index-linked nodes.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn alloc(&mut self, item: Option<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Slot {
                    prev: idx,
                    next: idx,
                    item,
                };
                idx
            }
            None => {
                let idx = self.slots.len();
                self.slots.push(Slot {
                    prev: idx,
                    next: idx,
                    item,
                });
                idx
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<T> {
        let item = self.slots[idx].item.take();
        self.free.push(idx);
        item
    }

    // == Rings ==
    /// Allocates an empty ring and returns its sentinel.
    pub fn new_list(&mut self) -> usize {
        self.alloc(None)
    }

    /// Frees the sentinel of an empty ring.
    pub fn drop_list(&mut self, sentinel: usize) {
        debug_assert!(self.is_empty(sentinel), "dropping a non-empty ring");
        self.release(sentinel);
    }

    pub fn is_empty(&self, sentinel: usize) -> bool {
        self.slots[sentinel].next == sentinel
    }

    /// Index of the node at the back of the ring, if any.
    pub fn back(&self, sentinel: usize) -> Option<usize> {
        let last = self.slots[sentinel].prev;
        (last != sentinel).then_some(last)
    }

    // == Nodes ==
    /// Allocates a node holding `item` and links it at the front of `sentinel`.
    pub fn push_front(&mut self, sentinel: usize, item: T) -> usize {
        let idx = self.alloc(Some(item));
        self.link_front(sentinel, idx);
        idx
    }

    /// Links a detached node at the front of the ring.
    pub fn link_front(&mut self, sentinel: usize, idx: usize) {
        let first = self.slots[sentinel].next;
        self.slots[idx].prev = sentinel;
        self.slots[idx].next = first;
        self.slots[first].prev = idx;
        self.slots[sentinel].next = idx;
    }

    /// Detaches a node from whatever ring holds it. The slot stays allocated.
    pub fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[idx].prev = idx;
        self.slots[idx].next = idx;
    }

    pub fn move_to_front(&mut self, sentinel: usize, idx: usize) {
        self.unlink(idx);
        self.link_front(sentinel, idx);
    }

    /// Unlinks and frees a node, handing back its item.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        self.unlink(idx);
        self.release(idx)
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(|slot| slot.item.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(|slot| slot.item.as_mut())
    }

    /// Drops every slot, sentinels included.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Iterates the ring front to back.
    #[cfg(test)]
    pub fn iter(&self, sentinel: usize) -> ListIter<'_, T> {
        ListIter {
            arena: self,
            sentinel,
            current: self.slots[sentinel].next,
        }
    }

    /// Number of allocated slots, sentinels included.
    #[cfg(test)]
    pub fn allocated(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

// == Iterator ==
#[cfg(test)]
pub(crate) struct ListIter<'a, T> {
    arena: &'a NodeArena<T>,
    sentinel: usize,
    current: usize,
}

#[cfg(test)]
impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.sentinel {
            return None;
        }
        let slot = &self.arena.slots[self.current];
        self.current = slot.next;
        slot.item.as_ref()
    }
}
