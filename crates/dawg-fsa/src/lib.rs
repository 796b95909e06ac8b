//! Incremental construction of minimal, deterministic, acyclic finite state
//! automata over byte sequences.
//!
//! Inputs are fed to the builder in lexicographic order and minimization
//! happens on the fly: whenever the input diverges from the previous
//! sequence, the abandoned suffix is frozen right-to-left and hash-consed
//! against all previously frozen states, so equivalent sub-automata are
//! shared eagerly. Peak memory is proportional to the minimal automaton plus
//! the longest active prefix, not to the input size.
//!
//! The result is a packed byte buffer in which every arc occupies a fixed
//! number of bytes, plus the offset of the entry (epsilon) state.
//!
//! # Architecture
//!
//! - [`arc`] -- fixed-width arc records and flag bits
//! - [`arena`] -- append-only byte arena holding serialized arcs
//! - [`register`] -- hash-consed set of frozen states, keyed by arena regions
//! - [`path`] -- mutable state slots spelling the last-added prefix
//! - [`builder`] -- the incremental construction loop
//! - [`automaton`] -- the published, immutable result and its traversal

pub mod arc;
pub mod arena;
pub mod automaton;
pub mod builder;
pub mod path;
pub mod register;

pub use automaton::Automaton;
pub use builder::{BuildInfo, FsaBuilder};

/// Error type for builder contract violations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("input out of order: {current:?} sorts before {previous:?}")]
    OutOfOrder { previous: Vec<u8>, current: Vec<u8> },
    #[error("automaton already completed")]
    AlreadyCompleted,
}
