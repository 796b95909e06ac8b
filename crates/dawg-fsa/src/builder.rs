// Incremental construction with on-the-fly minimization.

use std::fmt;

use crate::BuildError;
use crate::arc::{ARC_SIZE, BIT_ARC_FINAL, BIT_ARC_LAST, TERMINAL};
use crate::arena::{Arena, DEFAULT_GROWTH};
use crate::automaton::Automaton;
use crate::path::ActivePath;
use crate::register::Register;

/// Builds a minimal, deterministic, acyclic automaton from byte sequences
/// supplied in lexicographic order.
///
/// Each [`add`](FsaBuilder::add) trims the active path to the longest common
/// prefix with the previous input, freezes the diverged suffix right-to-left
/// through the register, and extends the path with the new suffix. Because
/// inputs are sorted, a suffix abandoned by the common-prefix cut can never
/// be extended again, so freezing it early loses nothing.
///
/// ```
/// use dawg_fsa::FsaBuilder;
///
/// let fsa = FsaBuilder::build(["ac", "bc"]).unwrap();
/// assert!(fsa.contains(b"ac") && fsa.contains(b"bc"));
/// assert!(!fsa.contains(b"ab"));
/// ```
pub struct FsaBuilder {
    arena: Arena,
    path: ActivePath,
    register: Register,
    /// Entry state: one arc whose target is patched to the root (or the
    /// terminal sink, for the empty language) on completion.
    epsilon: u32,
    /// Last added sequence, for the ordering contract.
    previous: Vec<u8>,
    accepts_empty: bool,
    completed: bool,
    info: Option<BuildInfo>,
}

impl FsaBuilder {
    pub fn new() -> Self {
        Self::with_growth(DEFAULT_GROWTH)
    }

    /// Create a builder whose serialization buffer grows by `growth` bytes
    /// at a time. The quantum is floored so one growth step always fits a
    /// worst-case state.
    pub fn with_growth(growth: usize) -> Self {
        let mut arena = Arena::new(growth);
        let epsilon = arena.allocate(1);
        arena.mark(epsilon, BIT_ARC_LAST);

        let mut path = ActivePath::new();
        path.expand_to(&mut arena, 1);

        Self {
            arena,
            path,
            register: Register::new(),
            epsilon,
            previous: Vec::new(),
            accepts_empty: false,
            completed: false,
            info: None,
        }
    }

    /// Append one sequence to the language.
    ///
    /// Inputs must arrive in nondecreasing lexicographic order (unsigned
    /// byte value, then length); duplicates are no-ops. The empty sequence
    /// is legal only before any non-empty input, where the same comparator
    /// admits it.
    pub fn add(&mut self, sequence: &[u8]) -> Result<(), BuildError> {
        if self.completed {
            return Err(BuildError::AlreadyCompleted);
        }
        if sequence < self.previous.as_slice() {
            return Err(BuildError::OutOfOrder {
                previous: self.previous.clone(),
                current: sequence.to_vec(),
            });
        }
        if sequence.is_empty() {
            self.accepts_empty = true;
        }

        self.insert(sequence);

        self.previous.clear();
        self.previous.extend_from_slice(sequence);
        Ok(())
    }

    /// Finalize the automaton. Further calls to [`add`](FsaBuilder::add) or
    /// `complete` fail with [`BuildError::AlreadyCompleted`].
    pub fn complete(&mut self) -> Result<Automaton, BuildError> {
        if self.completed {
            return Err(BuildError::AlreadyCompleted);
        }
        // Flush: freezes everything back to depth 1 and reopens the root.
        self.insert(&[]);

        if self.path.arc_count(0) == 0 {
            // Empty language.
            self.arena.set_target(self.epsilon, TERMINAL);
        } else {
            let root = self.freeze(0);
            self.arena.set_target(self.epsilon, root);
        }
        if self.accepts_empty {
            self.arena.mark(self.epsilon, BIT_ARC_FINAL);
        }

        self.completed = true;
        self.info = Some(BuildInfo {
            buffer_size: self.arena.buffer_len(),
            buffer_reallocations: self.arena.reallocations(),
            automaton_size: self.arena.size(),
            max_active_path: self.path.max_depth(),
            register_slots: self.register.slot_count(),
            register_entries: self.register.entry_count(),
            estimated_memory_mb: (self.arena.buffer_len() + 4 * self.register.slot_count())
                as f64
                / (1024.0 * 1024.0),
        });

        let automaton = Automaton::new(self.arena.publish(), self.epsilon);
        self.arena.release();
        self.register = Register::new();
        Ok(automaton)
    }

    /// Build an automaton from an ordered collection in one call.
    pub fn build<I, S>(sequences: I) -> Result<Automaton, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut builder = Self::new();
        for sequence in sequences {
            builder.add(sequence.as_ref())?;
        }
        builder.complete()
    }

    /// Construction statistics; populated by
    /// [`complete`](FsaBuilder::complete).
    pub fn info(&self) -> Option<&BuildInfo> {
        self.info.as_ref()
    }

    /// The add algorithm proper, past the ordering contract. Also used by
    /// `complete` to flush with the empty sequence.
    fn insert(&mut self, sequence: &[u8]) {
        let common = self.common_prefix(sequence);

        self.path.expand_to(&mut self.arena, sequence.len());

        // Freeze the diverged suffix, deepest first, patching each parent's
        // last-written arc to the canonical address.
        let mut depth = self.path.len();
        while depth > common + 1 {
            depth -= 1;
            let frozen = self.freeze(depth);
            self.arena.set_target(self.path.last_arc(depth - 1), frozen);
            self.path.reopen(depth);
        }

        // Extend with the new suffix. Targets of arcs into still-open slots
        // are provisional; freezing the child patches them.
        for depth in common + 1..=sequence.len() {
            let at = self.path.cursor(depth - 1);
            let deepest = depth == sequence.len();
            let flags = if deepest { BIT_ARC_FINAL } else { 0 };
            let target = if deepest { TERMINAL } else { self.path.base(depth) };
            self.arena.write_arc(at, flags, sequence[depth - 1], target);
            self.path.bump(depth - 1);
        }

        self.path.set_len(sequence.len());
    }

    /// Longest common prefix with the previous input, read back from the
    /// label of the last-written arc at each depth.
    fn common_prefix(&self, sequence: &[u8]) -> usize {
        let max = sequence.len().min(self.path.len());
        for i in 0..max {
            if self.arena.arc(self.path.last_arc(i)).label != sequence[i] {
                return i;
            }
        }
        max
    }

    /// Close the state at `depth` and hash-cons it into the register.
    fn freeze(&mut self, depth: usize) -> u32 {
        let start = self.path.base(depth);
        let end = self.path.cursor(depth);
        self.arena.mark(end - ARC_SIZE as u32, BIT_ARC_LAST);
        self.register.intern(&mut self.arena, start, end - start)
    }
}

impl Default for FsaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a finished construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    /// Length of the serialization buffer, headroom included.
    pub buffer_size: usize,
    /// How many times the serialization buffer grew.
    pub buffer_reallocations: u32,
    /// Live bytes of the published automaton.
    pub automaton_size: usize,
    /// Deepest active path reached (the longest input).
    pub max_active_path: usize,
    /// Register slot array length.
    pub register_slots: usize,
    /// Number of interned states.
    pub register_entries: usize,
    /// Rough working-set estimate: buffer plus four bytes per slot.
    pub estimated_memory_mb: f64,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Serialization buffer size: {}", self.buffer_size)?;
        writeln!(f, "Serialization buffer reallocations: {}", self.buffer_reallocations)?;
        writeln!(f, "Automaton size: {}", self.automaton_size)?;
        writeln!(f, "Max active path length: {}", self.max_active_path)?;
        writeln!(f, "Register hash slots: {}", self.register_slots)?;
        writeln!(f, "Register hash entries: {}", self.register_entries)?;
        write!(f, "Estimated memory consumption (MB): {:.3}", self.estimated_memory_mb)
    }
}
