use anyhow::Result;
use combtools::engine::{Engine, Mode};
use either::Either;
use parking_lot::RwLock;
use std::sync::Arc;

#[allow(unused_imports)]
use tracing::{debug, info, warn};

use crate::{Event, Output};

/// Owns the engine, applying events in arrival order and publishing
/// results to the consumer thread.
pub fn main(
    mut engine: Engine,
    rx: flume::Receiver<Event>,
    tx: flume::Sender<Output>,
    overflow: Arc<RwLock<bool>>,
) -> Result<()> {
    std::thread::spawn(move || {
        engine.start_capture();
        loop {
            match rx.recv() {
                Ok(Event::Batch(tags)) => {
                    engine.process(&tags);
                }
                Ok(Event::Tick) => {
                    {
                        let mut o = overflow.write();
                        *o = engine.overflow();
                    }
                    // In streaming mode the consumer must drain or lose data
                    if engine.mode() == Mode::Stream {
                        let mut out = Vec::new();
                        while let Some(item) = engine.read_next() {
                            out.push(item);
                        }
                        if !out.is_empty() && tx.send(Either::Left(out)).is_err() {
                            break;
                        }
                    }
                }
                Ok(Event::Stop) => {
                    match engine.mode() {
                        Mode::Stream => {
                            let mut out = Vec::new();
                            while let Some(item) = engine.read_next() {
                                out.push(item);
                            }
                            let _ = tx.send(Either::Left(out));
                        }
                        Mode::Histogram => {
                            engine.request_readout(false);
                            let mut bins = Vec::new();
                            while let Some(bin) = engine.read_next_bin() {
                                bins.push(bin);
                            }
                            let _ = tx.send(Either::Right(bins));
                        }
                    }
                    if engine.overflow() {
                        warn!("rate fifo overflowed during the run; data was dropped");
                    }
                    let mut o = overflow.write();
                    *o = engine.overflow();
                    break;
                }
                Err(_) => break,
            }
        }
    });
    Ok(())
}
