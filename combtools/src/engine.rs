//! The combination engine: pipeline composition and control-plane API
//!
//! Tags flow remap -> window -> filter -> rate FIFO -> sink, strictly in
//! arrival order. Configuration flows the other way, through the methods
//! here, gated by the sink's state machine: anything arriving during an
//! active readout or zero sweep is latched and applied once the sweep
//! finishes. Nothing in the data path blocks, errors, or panics; the only
//! liveness signal is the sticky overflow flag.

use crate::fifo::{RateFifo, DEFAULT_DEPTH};
use crate::filter::PatternFilter;
use crate::hist::{Coalescer, Histogram, State};
use crate::lut::ChannelLut;
use crate::window::WindowAssembler;
use crate::{Tag, MAX_WIDTH};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Lookahead bound of the sink's run coalescer
const COALESCE_LOOKAHEAD: u32 = 16;

/// The two mutually exclusive sink modes; one is active per measurement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Raw combinations stream to the consumer through the rate FIFO
    Stream,
    /// Combinations accumulate into the live histogram table
    Histogram,
}

/// Engine-level configuration, passed at construction and through
/// [`Engine::reconfigure`]. An explicit object, never ambient state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Coincidence window length in tag time units
    pub window: u64,
    /// Minimum channel count for a combination to pass the filter
    pub filter_min: u8,
    /// Maximum channel count for a combination to pass the filter
    pub filter_max: u8,
    pub mode: Mode,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            window: 1000,
            filter_min: 1,
            filter_max: MAX_WIDTH,
            mode: Mode::Histogram,
        }
    }
}

/// Configuration latched during an active readout, applied when it ends
#[derive(Default)]
struct PendingConfig {
    window: Option<u64>,
    filter: Option<(u8, u8)>,
    mode: Option<Mode>,
    lut: Option<Vec<(u8, Vec<u8>)>>,
}

impl PendingConfig {
    fn is_empty(&self) -> bool {
        self.window.is_none()
            && self.filter.is_none()
            && self.mode.is_none()
            && self.lut.is_none()
    }
}

pub struct Engine {
    width: u8,
    lut: ChannelLut,
    assembler: WindowAssembler,
    filter: PatternFilter,
    fifo: RateFifo,
    coalescer: Coalescer,
    hist: Histogram,
    mode: Mode,
    capture: bool,
    pending: PendingConfig,
}

impl Engine {
    pub fn new(width: u8, config: CaptureConfig) -> Self {
        let width = width.clamp(1, MAX_WIDTH);
        Engine {
            width,
            lut: ChannelLut::identity(width),
            assembler: WindowAssembler::new(config.window),
            filter: PatternFilter::new(config.filter_min, config.filter_max),
            fifo: RateFifo::new(DEFAULT_DEPTH),
            coalescer: Coalescer::new(COALESCE_LOOKAHEAD),
            hist: Histogram::new(width),
            mode: config.mode,
            capture: false,
            pending: PendingConfig::default(),
        }
    }

    pub fn with_fifo_depth(width: u8, config: CaptureConfig, depth: usize) -> Self {
        let mut e = Engine::new(width, config);
        e.fifo = RateFifo::new(depth);
        e
    }

    // Fixed parameters, exposed like the bitfile's constant registers

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn fifo_depth(&self) -> usize {
        self.fifo.depth()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn window(&self) -> u64 {
        self.assembler.window()
    }

    pub fn filter_bounds(&self) -> (u8, u8) {
        self.filter.bounds()
    }

    pub fn capturing(&self) -> bool {
        self.capture
    }

    pub fn overflow(&self) -> bool {
        self.fifo.overflow()
    }

    pub fn sink_state(&self) -> State {
        self.hist.state()
    }

    pub fn reset_done(&self) -> bool {
        self.hist.reset_done()
    }

    pub fn lut(&self) -> &ChannelLut {
        &self.lut
    }

    /// Apply one micro-batch of time-ordered tags, strictly in order, so a
    /// window may open and close within the same batch.
    pub fn process(&mut self, tags: &[Tag]) {
        if !self.capture {
            return;
        }
        for tag in tags {
            let virt = match self.lut.remap(tag.channel) {
                Some(ch) => ch,
                None => continue,
            };
            if let Some(comb) = self.assembler.push(tag.time, virt) {
                if self.filter.accept(comb) {
                    self.fifo.push(comb);
                }
            }
        }
        if self.mode == Mode::Histogram {
            self.pump();
        }
    }

    /// Drain queued combinations into the table. A no-op while a readout
    /// scan is running; the FIFO holds deferred combinations until then.
    fn pump(&mut self) {
        if !self.hist.accumulating() {
            return;
        }
        while let Some(comb) = self.fifo.pop() {
            if let Some((c, n)) = self.coalescer.push(comb) {
                self.hist.accumulate(c, n);
            }
        }
        if let Some((c, n)) = self.coalescer.flush() {
            self.hist.accumulate(c, n);
        }
    }

    // Control plane

    /// Enable the data path and clear the sticky overflow flag.
    pub fn start_capture(&mut self) {
        self.capture = true;
        self.fifo.clear_overflow();
    }

    pub fn stop_capture(&mut self) {
        self.capture = false;
    }

    pub fn set_window(&mut self, window: u64) {
        if self.readout_active() {
            self.pending.window = Some(window);
            return;
        }
        self.assembler.set_window(window);
        self.hist.configure();
    }

    pub fn set_filter(&mut self, min: u8, max: u8) {
        if self.readout_active() {
            self.pending.filter = Some((min, max));
            return;
        }
        self.filter.set_bounds(min, max);
        self.hist.configure();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.readout_active() {
            self.pending.mode = Some(mode);
            return;
        }
        self.apply_mode(mode);
        self.hist.configure();
    }

    fn apply_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        // Queued data belongs to the old measurement
        self.mode = mode;
        self.fifo.clear();
        self.assembler.reset();
    }

    /// Replace the remap table. Validated up front so that a program
    /// latched during a readout cannot fail when it is finally applied.
    pub fn program_lut(&mut self, assignments: Vec<(u8, Vec<u8>)>) -> Result<()> {
        ChannelLut::validate(self.width, &assignments)?;
        if self.readout_active() {
            self.pending.lut = Some(assignments);
            return Ok(());
        }
        self.lut.apply(&assignments);
        self.hist.configure();
        Ok(())
    }

    /// Start a full-table readout scan; with `reset`, entries are zeroed
    /// as they are read. In-flight combinations already committed by the
    /// window assembler are drained into the table first, so the report
    /// covers everything produced up to this call. A reset requested while
    /// a scan is already running upgrades that scan.
    pub fn request_readout(&mut self, reset: bool) {
        if self.mode != Mode::Histogram {
            return;
        }
        self.pump();
        if self.readout_active() {
            if reset {
                self.hist.request_reset();
            }
            return;
        }
        self.hist.begin_readout(reset);
    }

    /// A reset outside of a readout: drain, zero sweep, then await new
    /// configuration.
    pub fn request_reset(&mut self) {
        self.pump();
        self.hist.request_reset();
        if self.hist.reset_done() {
            self.reset_datapath();
            self.maybe_apply_pending();
        }
    }

    /// Next `(combination, count)` pair of an active readout scan.
    pub fn read_next_bin(&mut self) -> Option<(u16, u32)> {
        let was_reading = self.readout_active();
        let bin = self.hist.read_next_bin();
        if was_reading && !self.readout_active() {
            // Scan just finished: a reset sweep takes the rest of the
            // datapath with it, then deferred configuration applies and
            // deferred combinations drain back into the table
            if self.hist.reset_done() {
                self.reset_datapath();
            }
            self.maybe_apply_pending();
            if self.mode == Mode::Histogram {
                self.pump();
            }
        }
        bin
    }

    /// A reset covers the whole combinations datapath, not just the
    /// table: the open, uncommitted window and anything still queued
    /// belong to the measurement that was reset.
    fn reset_datapath(&mut self) {
        self.assembler.reset();
        self.fifo.clear();
    }

    /// Streaming-mode pop: the combination and the sticky overflow bit.
    pub fn read_next(&mut self) -> Option<(u16, bool)> {
        if self.mode != Mode::Stream {
            return None;
        }
        self.fifo.pop().map(|c| (c, self.fifo.overflow()))
    }

    fn readout_active(&self) -> bool {
        self.hist.state() == State::ReadingOut
    }

    fn maybe_apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Some(w) = self.pending.window.take() {
            self.assembler.set_window(w);
        }
        if let Some((min, max)) = self.pending.filter.take() {
            self.filter.set_bounds(min, max);
        }
        if let Some(mode) = self.pending.mode.take() {
            self.apply_mode(mode);
        }
        if let Some(map) = self.pending.lut.take() {
            // Validated when latched
            self.lut.apply(&map);
        }
        self.hist.configure();
    }

    /// Apply a whole configuration object at once, e.g. between
    /// measurements. Subject to the same deferral as the single setters.
    pub fn reconfigure(&mut self, config: CaptureConfig) {
        self.set_window(config.window);
        self.set_filter(config.filter_min, config.filter_max);
        self.set_mode(config.mode);
    }
}
