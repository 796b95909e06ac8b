// Quick test: build an automaton from a wordlist file and report statistics.
use std::fs;

use dawg_fsa::FsaBuilder;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/usr/share/dict/words".to_string());

    let contents = fs::read_to_string(&path).expect("failed to read wordlist");
    let mut words: Vec<&[u8]> = contents
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.as_bytes())
        .collect();
    words.sort();
    words.dedup();
    println!("Loaded {}: {} unique words", path, words.len());

    let mut builder = FsaBuilder::new();
    for word in &words {
        builder.add(word).expect("input is sorted");
    }
    let fsa = builder.complete().expect("first completion");

    println!("\n{}", builder.info().expect("info after complete"));
    println!("\nNodes: {}", fsa.node_count());
    println!("Arcs:  {}", fsa.arc_count());
    println!(
        "Packed bytes per word: {:.2}",
        fsa.as_bytes().len() as f64 / words.len() as f64
    );

    println!("\nFirst entries:");
    for sequence in fsa.sequences().take(10) {
        println!("  {}", String::from_utf8_lossy(&sequence));
    }
}
