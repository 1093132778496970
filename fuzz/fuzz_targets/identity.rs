//! Fuzz target for identity hashing
//!
//! Tests that streaming and in-memory hashing agree for arbitrary input and
//! arbitrary split points.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rapidlink_files::{IncrementalIdentityHasher, compute};

#[derive(Debug, Arbitrary)]
struct IdentityInput {
    name: String,
    data: Vec<u8>,
    split: usize,
}

fuzz_target!(|input: IdentityInput| {
    let split = (input.split % (input.data.len() + 1)).max(1);

    let batch = compute(&input.name, input.data.len() as u64, &input.data);
    assert!(batch.has_canonical_hashes());

    let mut hasher = IncrementalIdentityHasher::new();
    for chunk in input.data.chunks(split) {
        hasher.update(chunk);
    }

    assert_eq!(hasher.finalize(&input.name), batch);
});
