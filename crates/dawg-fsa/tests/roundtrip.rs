//! Round-trip tests: the language read back from a built automaton must be
//! exactly the (deduplicated) input, and equal inputs must produce
//! byte-identical automata.

use dawg_fsa::{Automaton, FsaBuilder};
use rand::{Rng, SeedableRng, rngs::StdRng};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sorted, deduplicated input ready for the builder.
fn prepare(mut sequences: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    sequences.sort();
    sequences.dedup();
    sequences
}

fn build(sequences: &[Vec<u8>]) -> Automaton {
    FsaBuilder::build(sequences).expect("sorted input must build")
}

fn assert_roundtrip(sequences: &[Vec<u8>]) -> Automaton {
    let fsa = build(sequences);
    let collected: Vec<Vec<u8>> = fsa.sequences().collect();
    assert_eq!(collected, sequences, "traversal must yield the input set");
    for sequence in sequences {
        assert!(fsa.contains(sequence));
    }
    fsa
}

/// A small synthetic lexicon: every onset-vowel-coda combination.
fn syllable_lexicon() -> Vec<Vec<u8>> {
    let onsets = ["b", "br", "d", "dr", "k", "kl", "m", "p", "pr", "s", "st", "t", "tr"];
    let nuclei = ["a", "ai", "e", "ei", "i", "o", "ou", "u"];
    let codas = ["", "k", "l", "m", "n", "r", "s", "st", "t"];

    let mut words = Vec::new();
    for onset in onsets {
        for nucleus in nuclei {
            for coda in codas {
                words.push(format!("{onset}{nucleus}{coda}").into_bytes());
            }
        }
    }
    prepare(words)
}

// ---------------------------------------------------------------------------
// Deterministic corpora
// ---------------------------------------------------------------------------

#[test]
fn syllable_lexicon_roundtrip() {
    let words = syllable_lexicon();
    let fsa = assert_roundtrip(&words);

    // Heavy coda sharing: far fewer states than a trie would hold.
    assert!(fsa.node_count() < words.len() / 2);

    assert!(!fsa.contains(b""));
    assert!(!fsa.contains(b"abr"));
    assert!(!fsa.contains(b"zzz"));
}

#[test]
fn zero_padded_numbers_roundtrip() {
    let numbers: Vec<Vec<u8>> = (0..5000).map(|i| format!("{i:05}").into_bytes()).collect();
    let fsa = assert_roundtrip(&numbers);
    assert_eq!(fsa.sequences().count(), 5000);
    assert!(!fsa.contains(b"05000"));
    assert!(!fsa.contains(b"0000"));
}

#[test]
fn duplicated_input_builds_identical_automaton() {
    let words = syllable_lexicon();
    let mut doubled = words.clone();
    doubled.extend(words.iter().cloned());
    doubled.sort();

    let plain = build(&words);
    let fsa = FsaBuilder::build(&doubled).expect("duplicates are legal");

    assert_eq!(fsa.as_bytes(), plain.as_bytes());
    assert_eq!(fsa.entry(), plain.entry());
    assert_eq!(fsa.node_count(), plain.node_count());
    assert_eq!(fsa.arc_count(), plain.arc_count());
}

#[test]
fn rebuild_is_deterministic() {
    let words = syllable_lexicon();
    let first = build(&words);
    let second = build(&words);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

// ---------------------------------------------------------------------------
// Randomized corpora (seeded)
// ---------------------------------------------------------------------------

fn random_sequences(seed: u64, count: usize, alphabet: u8, max_len: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sequences = Vec::with_capacity(count);
    for _ in 0..count {
        let len = rng.random_range(0..=max_len);
        let sequence: Vec<u8> = (0..len).map(|_| rng.random_range(0..alphabet)).collect();
        sequences.push(sequence);
    }
    prepare(sequences)
}

#[test]
fn random_narrow_alphabet_roundtrip() {
    // A tiny alphabet forces deep suffix sharing.
    for seed in 0..8 {
        let sequences = random_sequences(seed, 500, 3, 10);
        assert_roundtrip(&sequences);
    }
}

#[test]
fn random_full_alphabet_roundtrip() {
    for seed in 0..4 {
        let sequences = random_sequences(1000 + seed, 300, 255, 16);
        let fsa = assert_roundtrip(&sequences);

        // Mutating any member off the language must miss.
        for sequence in sequences.iter().take(32) {
            let mut probe = sequence.clone();
            probe.push(255);
            if !sequences.contains(&probe) {
                assert!(!fsa.contains(&probe));
            }
        }
    }
}

#[test]
fn random_input_with_empty_sequence() {
    let sequences = random_sequences(42, 200, 4, 6);
    // Seed 42 is chosen so at least one zero-length draw lands in the set.
    assert!(sequences.first().is_some_and(|s| s.is_empty()));
    let fsa = assert_roundtrip(&sequences);
    assert!(fsa.accepts_empty());
}
