#[allow(dead_code)]

use combtools::Tag;

/// Deterministic xorshift stream of time-ordered tags on the first 16
/// physical inputs, bursty enough to exercise window boundaries.
pub fn synthetic_tags(n: usize) -> Vec<Tag> {
    let mut state = 0x2545f4914f6cdd1du64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut tags = Vec::with_capacity(n);
    let mut t = 0u64;
    while tags.len() < n {
        t = t.wrapping_add(1 + next() % 200);
        let burst = 1 + (next() % 4) as usize;
        for _ in 0..burst.min(n - tags.len()) {
            tags.push(Tag {
                time: t,
                channel: 1 + (next() % 16) as u8,
            });
            t = t.wrapping_add(next() % 10);
        }
    }
    tags
}
