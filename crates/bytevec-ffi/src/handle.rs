//! Slot+generation handle table for vectors owned across the C boundary.
//!
//! A handle packs a slot index (upper 32 bits) and a generation (lower 32
//! bits). Generations start at 1, so the all-zero value is never issued and
//! serves as the null handle. Removing a value bumps its slot's generation,
//! which turns every outstanding copy of the handle stale: lookups return
//! `None` and a second destroy is a no-op.

/// The handle value that never refers to anything.
pub const NULL_HANDLE: u64 = 0;

const FIRST_GENERATION: u32 = 1;

fn encode(slot: u32, generation: u32) -> u64 {
    ((slot as u64) << 32) | (generation as u64)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    data: Option<T>,
}

/// Maps `u64` handles to owned values, reusing slots through a free list.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value` and return its handle. Never returns [`NULL_HANDLE`].
    ///
    /// Returns `None` once all 2^32 slots are in use or retired.
    pub fn insert(&mut self, value: T) -> Option<u64> {
        if let Some(slot_idx) = self.free_list.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.data = Some(value);
            return Some(encode(slot_idx, slot.generation));
        }
        let slot_idx = u32::try_from(self.slots.len()).ok()?;
        self.slots.push(Slot {
            generation: FIRST_GENERATION,
            data: Some(value),
        });
        Some(encode(slot_idx, FIRST_GENERATION))
    }

    /// The value behind `handle`, or `None` if it is null or stale.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.data.as_ref()
    }

    /// Take the value behind `handle` out of the table.
    ///
    /// A slot whose generation wraps to zero is retired rather than reused,
    /// so a handle from its first lifetime can never match again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get_mut(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.data.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(slot_idx);
        }
        Some(value)
    }

    /// Number of live values.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.data.is_some()).count()
    }
}
