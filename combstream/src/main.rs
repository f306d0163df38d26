use anyhow::Result;
use chrono::Local;
use combstream::{controller, source, timer, CliArgs};
use combtools::engine::{Engine, Mode};
use combtools::{bit, cfg, ser};
use either::Either;
use parking_lot::RwLock;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Parse command line arguments
    let args: CliArgs = argh::from_env();

    if args.version {
        println!(
            concat!(env!("CARGO_BIN_NAME"), " {}"),
            env!("CARGO_PKG_VERSION"),
        );
        return Ok(());
    }

    tracing_subscriber::fmt::init();

    // Load the run file
    let run: cfg::Run = match &args.config {
        Some(path) => {
            let f = File::open(path)?;
            let rdr = BufReader::new(f);
            serde_json::from_reader(rdr)?
        }
        None => cfg::Run::default(),
    };
    info!(
        "run '{}': width {}, window {}, filter [{}, {}], mode {:?}",
        run.name, run.width, run.window, run.filter_min, run.filter_max, run.mode,
    );

    let mut engine = Engine::new(run.width, run.capture_config());
    if !run.channels.is_empty() {
        engine.program_lut(run.assignments())?;
    }

    let (tx_event, rx_event) = flume::unbounded();
    let (tx_out, rx_out) = flume::unbounded();
    let overflow = Arc::new(RwLock::new(false));

    // Controller thread - owns the engine
    controller::main(engine, rx_event, tx_out, overflow.clone())?;

    // Timer thread - paces streaming-mode drains
    timer::main(Duration::from_millis(args.tick_rate), tx_event.clone())?;

    // Source thread - file tags or the synthetic generator
    match &args.input {
        Some(path) => source::file(std::path::Path::new(path), tx_event.clone())?,
        None => source::synthetic(run.window, args.batches, tx_event.clone())?,
    }
    drop(tx_event);

    // Collect results until the controller hangs up
    let mut stream_out: Vec<(u16, bool)> = Vec::new();
    let mut bins: Vec<(u16, u32)> = Vec::new();
    for out in rx_out.iter() {
        match out {
            Either::Left(mut s) => stream_out.append(&mut s),
            Either::Right(mut b) => bins.append(&mut b),
        }
    }

    if *overflow.read() {
        warn!("sticky overflow flag set: the consumer did not keep up");
    }

    // Write results as tsv
    let target: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(target);
    match run.mode {
        Mode::Stream => {
            info!("{} combinations streamed", stream_out.len());
            ser::stream_tsv(&mut wtr, &stream_out)?;
        }
        Mode::Histogram => {
            let total: u64 = bins.iter().map(|&(_, c)| c as u64).sum();
            info!("{} combinations histogrammed", total);
            if let Some(&(comb, count)) = bins.iter().max_by_key(|&&(_, c)| c) {
                info!("peak bin: channels {:?}, {} counts", bit::mask_to_chans(comb), count);
            }
            ser::bins_tsv(&mut wtr, &bins)?;
        }
    }
    wtr.flush()?;

    // Record the run to disk
    if let Some(path) = &args.record {
        let record = cfg::Run {
            timestamp: Some(Local::now()),
            ..run
        };
        let f = File::create(path)?;
        let mut wtr = BufWriter::new(f);
        wtr.write_all(serde_json::to_string_pretty(&record)?.as_bytes())?;
    }

    Ok(())
}
