use anyhow::Result;
use combtools::{de, Tag};
use rand::Rng;
use std::path::Path;
use tracing::info;

use crate::Event;

/// Lane width of the upstream link: tags per micro-batch
pub const MAX_BATCH: usize = 4;

/// Feed tags from a tsv file as ordered micro-batches, then stop.
pub fn file(path: &Path, tx: flume::Sender<Event>) -> Result<()> {
    let f = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_reader(f);
    let tags = de::tsv(&mut rdr)?;
    info!("loaded {} tags", tags.len());
    std::thread::spawn(move || {
        for batch in tags.chunks(MAX_BATCH) {
            if tx.send(Event::Batch(batch.to_vec())).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Stop);
    });
    Ok(())
}

/// Synthetic source: clustered arrivals on the first 16 physical inputs,
/// so multi-channel combinations actually occur at the given window.
pub fn synthetic(window: u64, batches: u64, tx: flume::Sender<Event>) -> Result<()> {
    let window = window.max(4);
    std::thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let mut t = 0u64;
        for _ in 0..batches {
            // Guard gap past the previous cluster, then a burst inside it
            t = t.wrapping_add(rng.gen_range(window..4 * window));
            let n = rng.gen_range(1..=MAX_BATCH);
            let mut batch = Vec::with_capacity(n);
            for _ in 0..n {
                batch.push(Tag {
                    time: t,
                    channel: rng.gen_range(1..=16),
                });
                t = t.wrapping_add(rng.gen_range(0..window / 4));
            }
            if tx.send(Event::Batch(batch)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Stop);
    });
    Ok(())
}
