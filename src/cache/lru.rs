//! LRU List Module
//!
//! Recency order for cache entries, kept as a doubly linked list over an
//! arena of slots. Links are slot indices, so promotion and eviction are
//! O(1) relinks with no references into the arena held anywhere else.

// == Slot ==
#[derive(Debug)]
struct Slot<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Recency-ordered arena list.
///
/// - Front (head) = most recently used
/// - Back (tail) = least recently used
///
/// Handles returned by [`LruList::push_front`] stay valid until the slot is
/// removed; freed slots are recycled through a free list.
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Option<Slot<T>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value at the most-recently-used end and returns its slot.
    pub fn push_front(&mut self, value: T) -> usize {
        let idx = self.alloc(Slot {
            value,
            prev: None,
            next: self.head,
        });
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Push Back ==
    /// Inserts a value at the least-recently-used end and returns its slot.
    pub fn push_back(&mut self, value: T) -> usize {
        let idx = self.alloc(Slot {
            value,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail_idx) => {
                if let Some(tail) = self.slots[tail_idx].as_mut() {
                    tail.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Promotes a slot to the most-recently-used end.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || self.slots.get(idx).map_or(true, Option::is_none) {
            return;
        }

        self.unlink(idx);
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = None;
            slot.next = self.head;
        }
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks a slot and returns its value.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        if self.slots.get(idx).map_or(true, Option::is_none) {
            return None;
        }

        self.unlink(idx);
        let slot = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(slot.value)
    }

    // == Back ==
    /// Slot index of the least recently used value.
    pub fn back(&self) -> Option<usize> {
        self.tail
    }

    // == Pop Back ==
    /// Removes and returns the least recently used value.
    #[cfg(test)]
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.remove(idx)
    }

    // == Accessors ==
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx)?.as_ref().map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx)?.as_mut().map(|slot| &mut slot.value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates `(slot, value)` pairs from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Clear ==
    /// Drops every value and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Internal Linking ==
    fn alloc(&mut self, slot: Slot<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        }
    }

    /// Makes `idx` the new head. The slot's own `next` must already point at
    /// the old head.
    fn link_front(&mut self, idx: usize) {
        if let Some(head_idx) = self.head {
            if let Some(head) = self.slots[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(slot) => (slot.prev, slot.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_slot) = self.slots[prev_idx].as_mut() {
                    prev_slot.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_slot) = self.slots[next_idx].as_mut() {
                    next_slot.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = self.list.slots[idx].as_ref()?;
        self.cursor = slot.next;
        Some((idx, &slot.value))
    }
}
