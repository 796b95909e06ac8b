// Hash-consed set of frozen states, keyed by regions of the arena itself.

use crate::arc::ARC_SIZE;
use crate::arena::Arena;

/// Open-addressed hash set of frozen state addresses.
///
/// Two states are equivalent exactly when their arc runs are byte-for-byte
/// identical: targets inside a frozen region already point at canonical
/// states (suffixes freeze before prefixes), so byte equality over the
/// region is Myhill-Nerode equivalence of the sub-automata.
///
/// Keys are arena offsets, which stay valid across arena growth; the slot
/// array only rehashes when the register itself resizes. Slot value 0 means
/// empty (offset 0 is never a state address). There are no deletions, so no
/// tombstones.
pub struct Register {
    slots: Vec<u32>,
    entries: usize,
}

impl Register {
    pub fn new() -> Self {
        Self {
            slots: vec![0; 2],
            entries: 0,
        }
    }

    /// Canonicalize the state whose arcs occupy `[start, start + len)`.
    ///
    /// On a hit the existing address is returned and the probe region is
    /// simply abandoned as scratch. On a miss the region is copied to a
    /// fresh allocation, interned, and the copy's address returned.
    pub fn intern(&mut self, arena: &mut Arena, start: u32, len: u32) -> u32 {
        let mask = self.slots.len() - 1;
        let mut slot = hash_region(arena, start, len) as usize & mask;
        let mut i = 0;
        loop {
            let state = self.slots[slot];
            if state == 0 {
                let interned = arena.append_copy(start, len);
                self.slots[slot] = interned;
                self.entries += 1;
                if self.entries > self.slots.len() / 2 {
                    self.grow(arena);
                }
                return interned;
            }
            if arena.regions_equal(state, start, len) {
                return state;
            }
            // Triangular probing: step lengths 1, 2, 3, ...
            i += 1;
            slot = (slot + i) & mask;
        }
    }

    /// Double the slot array and rehash every occupied entry.
    fn grow(&mut self, arena: &Arena) {
        let mut slots = vec![0u32; self.slots.len() * 2];
        let mask = slots.len() - 1;
        for &state in &self.slots {
            if state == 0 {
                continue;
            }
            let len = arena.state_len(state);
            let mut slot = hash_region(arena, state, len) as usize & mask;
            let mut i = 0;
            while slots[slot] != 0 {
                i += 1;
                slot = (slot + i) & mask;
            }
            slots[slot] = state;
        }
        self.slots = slots;
    }

    /// Current slot array length (a power of two).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of interned states.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

/// Order-sensitive fold over every equivalence-relevant byte of a region:
/// label, target and the final bit of each arc. The last-arc bit is a layout
/// artifact of the region's end, not a semantic property, and is excluded.
fn hash_region(arena: &Arena, start: u32, len: u32) -> u32 {
    debug_assert!(len % ARC_SIZE as u32 == 0);
    let mut h: u32 = 0;
    let mut offset = start;
    let end = start + len;
    while offset < end {
        let arc = arena.arc(offset);
        h = h.wrapping_mul(17).wrapping_add(arc.label as u32);
        h = h.wrapping_mul(17).wrapping_add(arc.target());
        if arc.is_final() {
            h = h.wrapping_add(17);
        }
        offset += ARC_SIZE as u32;
    }
    h
}
