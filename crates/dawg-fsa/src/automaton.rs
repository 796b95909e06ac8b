// The published automaton: a right-sized copy of the arena plus the entry
// offset, with zero-copy arc accessors and traversal.

use hashbrown::HashSet;

use crate::arc::{self, ARC_SIZE, ArcRecord, TERMINAL};

/// An immutable, minimal, deterministic acyclic automaton over a packed
/// arc buffer.
///
/// The buffer layout is the construction arena truncated to its live size:
/// byte 0 unused, the entry (epsilon) state at offset 1, frozen states after
/// it, each a contiguous run of fixed-width arcs ending at one with the
/// last-arc flag. The value owns its bytes, so it is freely shareable across
/// threads for read-only traversal.
pub struct Automaton {
    data: Vec<u8>,
    entry: u32,
}

impl Automaton {
    pub(crate) fn new(data: Vec<u8>, entry: u32) -> Self {
        Self { data, entry }
    }

    /// The packed arc buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Offset of the entry (epsilon) state.
    #[inline]
    pub fn entry(&self) -> u32 {
        self.entry
    }

    /// The root state: target of the epsilon arc. [`TERMINAL`] when the
    /// language is empty (or contains only the empty sequence).
    #[inline]
    pub fn root(&self) -> u32 {
        self.arc(self.entry).target()
    }

    /// Whether the empty sequence belongs to the language (encoded as the
    /// final bit on the epsilon arc).
    #[inline]
    pub fn accepts_empty(&self) -> bool {
        self.arc(self.entry).is_final()
    }

    /// View the arc at `offset`.
    #[inline]
    pub fn arc(&self, offset: u32) -> &ArcRecord {
        arc::arc_at(&self.data, offset)
    }

    /// First arc of a state (a state's address is its first arc's offset).
    #[inline]
    pub fn first_arc(&self, node: u32) -> u32 {
        node
    }

    /// The next sibling arc, or `None` past the state's last arc.
    #[inline]
    pub fn next_arc(&self, arc: u32) -> Option<u32> {
        if self.arc(arc).is_last() {
            None
        } else {
            Some(arc + ARC_SIZE as u32)
        }
    }

    /// Whether `sequence` belongs to the language.
    pub fn contains(&self, sequence: &[u8]) -> bool {
        if sequence.is_empty() {
            return self.accepts_empty();
        }
        let mut node = self.root();
        for (i, &label) in sequence.iter().enumerate() {
            if node == TERMINAL {
                return false;
            }
            let mut offset = self.first_arc(node);
            loop {
                let record = self.arc(offset);
                if record.label == label {
                    if i + 1 == sequence.len() {
                        return record.is_final();
                    }
                    node = record.target();
                    break;
                }
                match self.next_arc(offset) {
                    Some(next) => offset = next,
                    None => return false,
                }
            }
        }
        unreachable!("loop returns on the last byte");
    }

    /// Iterate over the language in lexicographic order.
    pub fn sequences(&self) -> Sequences<'_> {
        let mut stack = Vec::new();
        let root = self.root();
        if root != TERMINAL {
            stack.push(Frame {
                arc: self.first_arc(root),
                phase: Phase::Arrive,
            });
        }
        Sequences {
            fsa: self,
            stack,
            buffer: Vec::new(),
            emit_empty: self.accepts_empty(),
        }
    }

    /// Number of distinct nodes reachable from the root, the terminal sink
    /// included. Zero for the empty language.
    pub fn node_count(&self) -> usize {
        let (states, _, saw_terminal) = self.reachable();
        states.len() + usize::from(saw_terminal)
    }

    /// Number of arcs of all materialized states reachable from the root.
    pub fn arc_count(&self) -> usize {
        self.reachable().1
    }

    /// Walk every materialized state reachable from the root: the visited
    /// set, the total arc count, and whether any arc targets the sink.
    fn reachable(&self) -> (HashSet<u32>, usize, bool) {
        let mut states = HashSet::new();
        let mut arcs = 0;
        let mut saw_terminal = false;
        let mut pending = Vec::new();

        let root = self.root();
        if root != TERMINAL {
            pending.push(root);
        }
        while let Some(node) = pending.pop() {
            if !states.insert(node) {
                continue;
            }
            let mut offset = self.first_arc(node);
            loop {
                arcs += 1;
                let target = self.arc(offset).target();
                if target == TERMINAL {
                    saw_terminal = true;
                } else if !states.contains(&target) {
                    pending.push(target);
                }
                match self.next_arc(offset) {
                    Some(next) => offset = next,
                    None => break,
                }
            }
        }
        (states, arcs, saw_terminal)
    }
}

#[derive(Clone, Copy)]
enum Phase {
    /// Push the label; emit if the arc is final.
    Arrive,
    /// Descend into the target state.
    Descend,
    /// Pop the label and step to the next sibling.
    Retreat,
}

struct Frame {
    arc: u32,
    phase: Phase,
}

/// Depth-first walk yielding each accepted sequence, lexicographically.
///
/// Arcs within a state are label-sorted by construction, so plain
/// first-to-last sibling order is lexicographic order. The walk keeps an
/// explicit frame stack; a sequence is emitted the moment its final arc is
/// reached, before descending, so prefixes precede their extensions.
pub struct Sequences<'a> {
    fsa: &'a Automaton,
    stack: Vec<Frame>,
    buffer: Vec<u8>,
    emit_empty: bool,
}

impl Iterator for Sequences<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.emit_empty {
            self.emit_empty = false;
            return Some(Vec::new());
        }
        loop {
            let frame = self.stack.last_mut()?;
            let record = *self.fsa.arc(frame.arc);
            match frame.phase {
                Phase::Arrive => {
                    frame.phase = Phase::Descend;
                    self.buffer.push(record.label);
                    if record.is_final() {
                        return Some(self.buffer.clone());
                    }
                }
                Phase::Descend => {
                    frame.phase = Phase::Retreat;
                    if !record.is_terminal() {
                        let child = self.fsa.first_arc(record.target());
                        self.stack.push(Frame {
                            arc: child,
                            phase: Phase::Arrive,
                        });
                    }
                }
                Phase::Retreat => {
                    self.buffer.pop();
                    if record.is_last() {
                        self.stack.pop();
                    } else {
                        frame.arc += ARC_SIZE as u32;
                        frame.phase = Phase::Arrive;
                    }
                }
            }
        }
    }
}
