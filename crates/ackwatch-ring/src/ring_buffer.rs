//! Circular FIFO buffer that doubles its storage instead of rejecting pushes.
//!
//! # Invariants
//! - `slots.len() >= 2`; one slot is always left empty as the sentinel.
//! - `head == tail` means empty; `(tail + 1) % slots.len() == head` means full.
//! - Slots in the logical range `[head, tail)` (wrapping) hold `Some`; every
//!   other slot holds `None`.
//! - Capacity only grows. A push that fills the buffer grows it before
//!   returning, so callers never observe a full buffer.

use std::fmt;
use std::iter::{FusedIterator, Rev};

/// Usable capacity of a buffer built through [`GrowableRingBuffer::new`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Growable circular FIFO buffer.
///
/// Values come out in exactly the order they went in, across any number of
/// growth events. Popped slots are reset to `None` immediately so the buffer
/// never keeps a retired value alive.
pub struct GrowableRingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
}

impl<T> GrowableRingBuffer<T> {
    /// Create a buffer with [`DEFAULT_CAPACITY`] usable slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a buffer that holds `capacity` values before its first growth.
    ///
    /// Storage is `capacity + 1` slots; the extra slot is the empty/full
    /// sentinel. A capacity of 0 is treated as 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let slot_count = capacity.max(1).saturating_add(1);
        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, || None);

        Self {
            slots,
            head: 0,
            tail: 0,
        }
    }

    /// Number of values the buffer can hold before it grows again.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of values currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        (self.tail + self.slots.len() - self.head) % self.slots.len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns `true` when the next push would land on the sentinel slot.
    ///
    /// [`push`](Self::push) grows the buffer as soon as this becomes true, so
    /// outside of a push it always reports `false`.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.next_index(self.tail) == self.head
    }

    /// Append `value` at the tail, growing the storage if this fills it.
    pub fn push(&mut self, value: T) {
        debug_assert!(!self.is_full(), "buffer left full by a previous push");

        if let Some(slot) = self.slots.get_mut(self.tail) {
            *slot = Some(value);
        }
        self.tail = self.next_index(self.tail);

        if self.is_full() {
            self.grow();
        }
    }

    /// Remove and return the value at the head, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slots.get_mut(self.head).and_then(Option::take);
        self.head = self.next_index(self.head);
        value
    }

    /// Borrow the value at the head without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots.get(self.head).and_then(Option::as_ref)
    }

    /// Iterate the current contents from oldest to newest.
    ///
    /// The iterator borrows the buffer, so the contents cannot change while it
    /// is alive. Cloning the iterator restarts from the clone point.
    #[must_use]
    pub fn peek_all(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            front: self.head,
            remaining: self.len(),
        }
    }

    /// Iterate the current contents from newest to oldest.
    #[must_use]
    pub fn peek_all_reverse(&self) -> Rev<Iter<'_, T>> {
        self.peek_all().rev()
    }

    /// Drop every stored value and reset both cursors. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
    }

    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }

    /// Double the storage and lay the logical contents out from index 0.
    fn grow(&mut self) {
        let len = self.len();
        let slot_count = self.slots.len().saturating_mul(2);

        // Rotating by `head` makes `[0, len)` the logical range in push order;
        // the sentinel and any cleared slots follow it as `None`.
        self.slots.rotate_left(self.head);
        self.slots.resize_with(slot_count, || None);
        self.head = 0;
        self.tail = len;

        debug_assert!(!self.is_full());
    }
}

impl<T: PartialEq> GrowableRingBuffer<T> {
    /// Append `value` unless an equal value is already stored.
    ///
    /// Returns `true` if the value was pushed.
    ///
    /// # Cost
    ///
    /// This scans the whole buffer, O(n) in the current length. Use it only on
    /// buffers whose length is small or bounded.
    pub fn push_unique(&mut self, value: T) -> bool {
        if self.peek_all().any(|stored| *stored == value) {
            return false;
        }
        self.push(value);
        true
    }
}

impl<T> Default for GrowableRingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.peek_all()).finish()
    }
}

impl<T> Extend<T> for GrowableRingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for GrowableRingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut ring = Self::with_capacity(iter.size_hint().0.max(DEFAULT_CAPACITY));
        ring.extend(iter);
        ring
    }
}

impl<'a, T> IntoIterator for &'a GrowableRingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.peek_all()
    }
}

/// Snapshot iterator over a [`GrowableRingBuffer`], oldest first.
///
/// Created by [`GrowableRingBuffer::peek_all`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    slots: &'a [Option<T>],
    front: usize,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            front: self.front,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front;
        self.front = (self.front + 1) % self.slots.len();
        self.remaining -= 1;
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = (self.front + self.remaining - 1) % self.slots.len();
        self.remaining -= 1;
        self.slots.get(index).and_then(Option::as_ref)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
