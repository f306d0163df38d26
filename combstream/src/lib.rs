pub mod controller;
pub mod source;
pub mod timer;

use argh::FromArgs;
use combtools::Tag;
use either::Either;

#[derive(Debug, FromArgs, Clone)]
/// Coincidence combination engine: streams or histograms time-tag data
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// tick period in ms
    #[argh(option, default = "100")]
    pub tick_rate: u64,
    /// run file with the capture configuration (json)
    #[argh(option, short = 'c')]
    pub config: Option<String>,
    /// tag input file (tsv); synthetic source if absent
    #[argh(option, short = 'i')]
    pub input: Option<String>,
    /// output file for results (tsv); stdout if absent
    #[argh(option, short = 'o')]
    pub output: Option<String>,
    /// write a run record (json) here when done
    #[argh(option)]
    pub record: Option<String>,
    /// micro-batches to draw from the synthetic source
    #[argh(option, default = "10000")]
    pub batches: u64,
}

pub enum Event {
    Tick,
    Batch(Vec<Tag>),
    Stop,
}

/// Streamed combinations with the overflow bit, or histogram bins
pub type Output = Either<Vec<(u16, bool)>, Vec<(u16, u32)>>;
