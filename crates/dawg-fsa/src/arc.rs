// Fixed-width arc records for the packed automaton buffer.

use bytemuck::{Pod, Zeroable};

/// Number of bytes occupied by a single arc.
pub const ARC_SIZE: usize = 6;

/// Byte offset of the flags byte within an arc record.
pub const FLAGS_OFFSET: usize = 0;
/// Byte offset of the label byte within an arc record.
pub const LABEL_OFFSET: usize = 1;
/// Byte offset of the target address within an arc record.
pub const TARGET_OFFSET: usize = 2;
/// Width of the target address in bytes.
pub const TARGET_SIZE: usize = 4;

/// Flag bit: this arc terminates its owning state's arc list.
pub const BIT_ARC_LAST: u8 = 0x01;
/// Flag bit: the sequence ending at this arc belongs to the language.
pub const BIT_ARC_FINAL: u8 = 0x02;

/// Maximum out-degree of a state (one arc per possible byte label).
pub const MAX_LABELS: usize = 256;

/// Address of the terminal (sink) state: transitions to it accept and stop.
/// Never materialized in the buffer; offset 0 doubles as the "empty slot"
/// sentinel of the state register.
pub const TERMINAL: u32 = 0;

/// A single arc (6 bytes): `[flags: u8][label: u8][target: u32 big-endian]`.
///
/// The target address is stored as big-endian bytes so that bytewise
/// equality of two state regions is independent of host byte order, which
/// the register's equivalence test relies on. Alignment is 1, so a record
/// can be viewed at any byte offset of the buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ArcRecord {
    pub flags: u8,
    pub label: u8,
    pub target: [u8; 4],
}

impl ArcRecord {
    /// Build a record from its decoded fields.
    #[inline]
    pub fn new(flags: u8, label: u8, target: u32) -> Self {
        Self {
            flags,
            label,
            target: target.to_be_bytes(),
        }
    }

    /// Decode the target state address.
    #[inline]
    pub fn target(&self) -> u32 {
        u32::from_be_bytes(self.target)
    }

    /// Whether this arc is the last arc of its owning state.
    #[inline]
    pub fn is_last(&self) -> bool {
        self.flags & BIT_ARC_LAST != 0
    }

    /// Whether traversing this arc accepts the sequence spelled so far.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags & BIT_ARC_FINAL != 0
    }

    /// Whether the target is the terminal sink.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.target() == TERMINAL
    }
}

/// View the arc starting at `offset` in a packed buffer.
#[inline]
pub fn arc_at(data: &[u8], offset: u32) -> &ArcRecord {
    let start = offset as usize;
    bytemuck::from_bytes(&data[start..start + ARC_SIZE])
}

// Static assertions for the record layout.
const _: () = assert!(size_of::<ArcRecord>() == ARC_SIZE);
const _: () = assert!(align_of::<ArcRecord>() == 1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_size() {
        assert_eq!(size_of::<ArcRecord>(), ARC_SIZE);
    }

    #[test]
    fn field_extraction() {
        let arc = ArcRecord::new(BIT_ARC_LAST | BIT_ARC_FINAL, b'x', 0x0012_3456);
        assert_eq!(arc.label, b'x');
        assert_eq!(arc.target(), 0x0012_3456);
        assert!(arc.is_last());
        assert!(arc.is_final());
        assert!(!arc.is_terminal());
    }

    #[test]
    fn target_is_big_endian() {
        let arc = ArcRecord::new(0, 0, 0x0102_0304);
        assert_eq!(bytemuck::bytes_of(&arc), &[0, 0, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn zero_copy_view() {
        let raw: [u8; 12] = [
            // Arc 1: flags=FINAL, label='a', target=3
            BIT_ARC_FINAL, b'a', 0x00, 0x00, 0x00, 0x03,
            // Arc 2: flags=LAST, label='b', target=0
            BIT_ARC_LAST, b'b', 0x00, 0x00, 0x00, 0x00,
        ];
        let first = arc_at(&raw, 0);
        assert_eq!(first.label, b'a');
        assert_eq!(first.target(), 3);
        assert!(first.is_final() && !first.is_last());

        let second = arc_at(&raw, ARC_SIZE as u32);
        assert_eq!(second.label, b'b');
        assert!(second.is_last() && second.is_terminal());
    }

    #[test]
    fn view_at_odd_offset() {
        // Alignment is 1: records can start anywhere in the buffer.
        let mut raw = vec![0xEEu8];
        raw.extend_from_slice(bytemuck::bytes_of(&ArcRecord::new(0, b'q', 7)));
        let arc = arc_at(&raw, 1);
        assert_eq!(arc.label, b'q');
        assert_eq!(arc.target(), 7);
    }
}
