// Append-only byte arena backing both frozen states and active-path scratch.

use crate::arc::{self, ARC_SIZE, ArcRecord, FLAGS_OFFSET, MAX_LABELS, TARGET_OFFSET, TARGET_SIZE};

/// Default buffer growth quantum: 5 MiB.
pub const DEFAULT_GROWTH: usize = 5 * 1024 * 1024;

/// Smallest usable growth quantum. One quantum must always cover a
/// worst-case state (a full fan-out of 256 arcs), so the headroom check can
/// run once per state allocation instead of once per arc.
pub const MIN_GROWTH: usize = ARC_SIZE * MAX_LABELS;

/// Growable byte buffer with bump allocation.
///
/// Offsets, not pointers, address the contents, so buffer reallocation never
/// invalidates a state address. Offset 0 is reserved: it serves as the
/// terminal state address and the register's empty-slot sentinel. The arena
/// never shrinks while building; [`Arena::publish`] takes a right-sized copy
/// and [`Arena::release`] drops the working buffer.
pub struct Arena {
    bytes: Vec<u8>,
    /// High-water mark of allocated bytes; starts at 1 to keep offset 0
    /// unused.
    size: usize,
    growth: usize,
    reallocations: u32,
}

impl Arena {
    /// Create an empty arena growing by `growth` bytes at a time
    /// (floored at [`MIN_GROWTH`]).
    pub fn new(growth: usize) -> Self {
        Self {
            bytes: Vec::new(),
            size: 1,
            growth: growth.max(MIN_GROWTH),
            reallocations: 0,
        }
    }

    /// Reserve space for a state with up to `labels` outgoing arcs,
    /// zero-filled. Returns the state's address (the offset of its first
    /// arc).
    pub fn allocate(&mut self, labels: usize) -> u32 {
        self.ensure_headroom();
        let state = self.size;
        self.size += labels * ARC_SIZE;
        state as u32
    }

    /// Copy the region `[start, start + len)` to a fresh allocation at the
    /// high-water mark and return the copy's address. This is the freeze
    /// step: the canonical copy lands below the mark while the source slot
    /// stays reusable scratch.
    pub fn append_copy(&mut self, start: u32, len: u32) -> u32 {
        self.ensure_headroom();
        let state = self.size;
        let src = start as usize;
        self.bytes.copy_within(src..src + len as usize, state);
        self.size += len as usize;
        state as u32
    }

    /// Grow the buffer when the tail can no longer hold a worst-case state.
    fn ensure_headroom(&mut self) {
        if self.bytes.len() < self.size + ARC_SIZE * MAX_LABELS {
            self.bytes.resize(self.bytes.len() + self.growth, 0);
            self.reallocations += 1;
        }
    }

    /// View the arc at `offset`.
    #[inline]
    pub fn arc(&self, offset: u32) -> &ArcRecord {
        arc::arc_at(&self.bytes, offset)
    }

    /// Write a complete arc record at `offset`, replacing whatever scratch
    /// bytes were there.
    #[inline]
    pub fn write_arc(&mut self, offset: u32, flags: u8, label: u8, target: u32) {
        let start = offset as usize;
        self.bytes[start..start + ARC_SIZE]
            .copy_from_slice(bytemuck::bytes_of(&ArcRecord::new(flags, label, target)));
    }

    /// Patch the target address of an existing arc, leaving flags and label
    /// untouched.
    #[inline]
    pub fn set_target(&mut self, offset: u32, state: u32) {
        let at = offset as usize + TARGET_OFFSET;
        self.bytes[at..at + TARGET_SIZE].copy_from_slice(&state.to_be_bytes());
    }

    /// Set a flag bit on an existing arc.
    #[inline]
    pub fn mark(&mut self, offset: u32, flag_bit: u8) {
        self.bytes[offset as usize + FLAGS_OFFSET] |= flag_bit;
    }

    /// Total length in bytes of a frozen state's arc run (scan to the arc
    /// carrying the last-arc flag).
    pub fn state_len(&self, state: u32) -> u32 {
        let mut offset = state;
        while !self.arc(offset).is_last() {
            offset += ARC_SIZE as u32;
        }
        offset - state + ARC_SIZE as u32
    }

    /// Bytewise equality of two regions of `len` bytes. Regions reaching
    /// past the high-water mark never compare equal.
    pub fn regions_equal(&self, a: u32, b: u32, len: u32) -> bool {
        let (a, b, len) = (a as usize, b as usize, len as usize);
        if a + len > self.size || b + len > self.size {
            return false;
        }
        self.bytes[a..a + len] == self.bytes[b..b + len]
    }

    /// Bytes currently allocated (the high-water mark).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current length of the backing buffer (allocated plus headroom).
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.bytes.len()
    }

    /// How many times the backing buffer has grown.
    #[inline]
    pub fn reallocations(&self) -> u32 {
        self.reallocations
    }

    /// Right-sized copy of the allocated contents.
    pub fn publish(&self) -> Vec<u8> {
        self.bytes[..self.size].to_vec()
    }

    /// Drop the working buffer. The arena is unusable afterwards.
    pub fn release(&mut self) {
        self.bytes = Vec::new();
    }
}
