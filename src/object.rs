//! Indirect object numbering and the offset table behind the xref section.
//!
//! Object numbers are handed out in strictly increasing order. Each number owns an
//! [`OffsetSlot`] that starts out deferred (holding the output length at reservation time)
//! and becomes fixed once the object's `n 0 obj` line is written.

use std::fmt;

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl From<u32> for ObjectRef {
    fn from(id: u32) -> Self {
        Self::new(id, 0)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// Byte offset state of one object number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSlot {
    /// Number not handed out
    Unassigned,
    /// Reserved but not begun; resolves to the output length at reservation time
    PendingAt(usize),
    /// `n 0 obj` was written at this offset
    Resolved(usize),
}

impl OffsetSlot {
    /// Offset of the slot, `None` if the number was never handed out.
    pub fn resolve(&self) -> Option<usize> {
        match self {
            OffsetSlot::Unassigned => None,
            OffsetSlot::PendingAt(snapshot) => Some(*snapshot),
            OffsetSlot::Resolved(offset) => Some(*offset),
        }
    }
}

/// The allocator: object counter plus offset slots, index = object number.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    // slot 0 is the free-list head and never assigned
    slots: Vec<OffsetSlot>,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: vec![OffsetSlot::Unassigned],
        }
    }

    /// Forget every number; the next reservation is 1 again.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.slots.push(OffsetSlot::Unassigned);
    }

    /// Highest number handed out so far.
    pub fn count(&self) -> u32 {
        (self.slots.len().max(1) - 1) as u32
    }

    /// Reserve the next number without writing anything.
    pub fn reserve(&mut self, current_len: usize) -> u32 {
        if self.slots.is_empty() {
            self.slots.push(OffsetSlot::Unassigned);
        }
        self.slots.push(OffsetSlot::PendingAt(current_len));
        let id = self.count();
        log::trace!("reserved object {} at {}", id, current_len);
        id
    }

    /// Fix the offset of `id`. Numbers beyond the counter are reserved up to `id` first.
    pub fn begin(&mut self, id: u32, offset: usize) {
        let index = id as usize;
        while self.slots.len() <= index {
            self.slots.push(OffsetSlot::PendingAt(offset));
        }
        self.slots[index] = OffsetSlot::Resolved(offset);
    }

    /// The slot for `id`.
    pub fn slot(&self, id: u32) -> OffsetSlot {
        self.slots
            .get(id as usize)
            .copied()
            .unwrap_or(OffsetSlot::Unassigned)
    }

    /// Offsets for objects `1..=count`. Unassigned slots read as `current_len`.
    pub fn offsets(&self, current_len: usize) -> Vec<usize> {
        self.slots
            .iter()
            .skip(1)
            .map(|slot| slot.resolve().unwrap_or(current_len))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
        assert_eq!(ObjectRef::from(3).gen, 0);
    }

    #[test]
    fn test_numbers_increase_from_one() {
        let mut table = ObjectTable::new();
        assert_eq!(table.reserve(0), 1);
        assert_eq!(table.reserve(0), 2);
        assert_eq!(table.count(), 2);
    }

    #[test]
    fn test_deferred_slot_resolves_to_snapshot() {
        let mut table = ObjectTable::new();
        let id = table.reserve(10);
        assert_eq!(table.slot(id), OffsetSlot::PendingAt(10));
        assert_eq!(table.slot(id).resolve(), Some(10));
        assert_eq!(table.offsets(99), vec![10]);
        table.begin(id, 42);
        assert_eq!(table.offsets(99), vec![42]);
        assert_eq!(OffsetSlot::Unassigned.resolve(), None);
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut table = ObjectTable::new();
        table.reserve(0);
        table.reserve(5);
        table.reset();
        assert_eq!(table.count(), 0);
        assert_eq!(table.reserve(0), 1);
        assert_eq!(table.slot(2), OffsetSlot::Unassigned);
    }

    #[test]
    fn test_begin_beyond_counter_fills_gap() {
        let mut table = ObjectTable::new();
        table.begin(3, 17);
        assert_eq!(table.count(), 3);
        assert_eq!(table.slot(3), OffsetSlot::Resolved(17));
        assert_eq!(table.slot(1), OffsetSlot::PendingAt(17));
    }
}
