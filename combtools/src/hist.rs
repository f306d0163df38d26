//! Live combination histogram with read/reset-while-accumulating semantics
//!
//! The table is the only shared resource between accumulation and readout.
//! The two are kept temporally exclusive by a single global state rather
//! than per-entry locking: while a readout scan is in progress, incoming
//! combinations stay queued upstream and are applied once the scan ends.

/// Sink state machine.
///
/// `Gathering -> ReadingOut -> Gathering`, or
/// `ReadingOut -> AwaitingConfig -> Gathering` when the readout also reset
/// the table and no deferred configuration was latched during the scan.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Gathering,
    ReadingOut,
    AwaitingConfig,
}

/// Per-combination occurrence counts, one `u32` bin per combination value.
///
/// Counters wrap at 32 bits like the hardware accumulator; a bin that
/// overflows silently starts over. This is an intentional limitation.
pub struct Histogram {
    table: Vec<u32>,
    state: State,
    cursor: usize,
    zero_on_read: bool,
    reset_done: bool,
}

impl Histogram {
    pub fn new(width: u8) -> Self {
        Histogram {
            table: vec![0; 1usize << width],
            state: State::Gathering,
            cursor: 0,
            zero_on_read: false,
            reset_done: false,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn accumulating(&self) -> bool {
        self.state == State::Gathering
    }

    /// Set once a zero sweep has run to completion; only then may new
    /// configuration be accepted.
    pub fn reset_done(&self) -> bool {
        self.reset_done
    }

    /// Add `n` occurrences of `comb`. Ignored outside of `Gathering`; the
    /// caller keeps deferred combinations queued until the scan finishes.
    pub fn accumulate(&mut self, comb: u16, n: u32) {
        if self.state != State::Gathering {
            return;
        }
        let bin = &mut self.table[comb as usize];
        *bin = bin.wrapping_add(n);
    }

    /// Start a sequential full-table scan. With `reset`, each entry is
    /// zeroed as it is read. Returns false if a scan is already running
    /// or the sink is awaiting configuration.
    pub fn begin_readout(&mut self, reset: bool) -> bool {
        if self.state != State::Gathering {
            return false;
        }
        self.state = State::ReadingOut;
        self.cursor = 0;
        self.zero_on_read = reset;
        self.reset_done = false;
        true
    }

    /// Upgrade an in-progress snapshot scan to a reset: the sweep runs to
    /// the end and the whole table is zeroed before `reset_done` fires.
    pub fn request_reset(&mut self) {
        match self.state {
            State::ReadingOut => self.zero_on_read = true,
            State::Gathering => self.reset(),
            State::AwaitingConfig => {}
        }
    }

    /// Emit the next `(combination, count)` pair of the scan.
    pub fn read_next_bin(&mut self) -> Option<(u16, u32)> {
        if self.state != State::ReadingOut {
            return None;
        }
        let i = self.cursor;
        let count = self.table[i];
        if self.zero_on_read {
            self.table[i] = 0;
        }
        self.cursor += 1;
        if self.cursor == self.table.len() {
            self.finish_readout();
        }
        Some((i as u16, count))
    }

    fn finish_readout(&mut self) {
        self.cursor = 0;
        if self.zero_on_read {
            // A mid-scan reset request leaves already-read entries behind;
            // the sweep is only done once every bin is zero.
            for bin in self.table.iter_mut() {
                *bin = 0;
            }
            self.zero_on_read = false;
            self.reset_done = true;
            self.state = State::AwaitingConfig;
        } else {
            self.state = State::Gathering;
        }
    }

    /// Immediate full zero sweep, outside of any readout.
    pub fn reset(&mut self) {
        for bin in self.table.iter_mut() {
            *bin = 0;
        }
        self.cursor = 0;
        self.zero_on_read = false;
        self.reset_done = true;
        self.state = State::AwaitingConfig;
    }

    /// Configuration has arrived; a sink waiting for it may gather again.
    pub fn configure(&mut self) {
        if self.state == State::AwaitingConfig {
            self.state = State::Gathering;
        }
    }

    pub fn counts(&self) -> &[u32] {
        &self.table
    }
}

/// Bounded-lookahead run coalescing of identical consecutive combinations
/// into `(combination, repeat)` pairs before they hit the table.
///
/// Purely a write-reduction step: applying the pairs it emits gives the
/// same final counts as applying every combination one by one.
pub struct Coalescer {
    cur: Option<(u16, u32)>,
    cap: u32,
}

impl Coalescer {
    pub fn new(cap: u32) -> Self {
        Coalescer {
            cur: None,
            cap: cap.max(1),
        }
    }

    /// Feed one combination; returns a finished run when one closes.
    pub fn push(&mut self, comb: u16) -> Option<(u16, u32)> {
        match self.cur {
            Some((c, n)) if c == comb && n < self.cap => {
                self.cur = Some((c, n + 1));
                None
            }
            Some(run) => {
                self.cur = Some((comb, 1));
                Some(run)
            }
            None => {
                self.cur = Some((comb, 1));
                None
            }
        }
    }

    /// Close and return the open run, if any.
    pub fn flush(&mut self) -> Option<(u16, u32)> {
        self.cur.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(h: &mut Histogram) -> Vec<(u16, u32)> {
        let mut out = Vec::new();
        while let Some(bin) = h.read_next_bin() {
            out.push(bin);
        }
        out
    }

    #[test]
    fn snapshot_readout_preserves_counts() {
        let mut h = Histogram::new(2);
        h.accumulate(0b01, 2);
        h.accumulate(0b11, 1);
        assert!(h.begin_readout(false));
        let bins = drain(&mut h);
        assert_eq!(bins, vec![(0, 0), (1, 2), (2, 0), (3, 1)]);
        assert_eq!(h.state(), State::Gathering);
        assert_eq!(h.counts(), &[0, 2, 0, 1]);
    }

    #[test]
    fn readout_with_reset_zeroes_table() {
        let mut h = Histogram::new(2);
        h.accumulate(0b10, 5);
        assert!(h.begin_readout(true));
        let bins = drain(&mut h);
        assert_eq!(bins[2], (2, 5));
        assert!(h.reset_done());
        assert_eq!(h.state(), State::AwaitingConfig);
        assert!(h.counts().iter().all(|&c| c == 0));
        // No accumulation until configuration arrives
        h.accumulate(0b10, 1);
        assert_eq!(h.counts()[2], 0);
        h.configure();
        assert_eq!(h.state(), State::Gathering);
        h.accumulate(0b10, 1);
        assert_eq!(h.counts()[2], 1);
    }

    #[test]
    fn reset_during_snapshot_scan_completes_sweep() {
        let mut h = Histogram::new(2);
        for comb in 1..4u16 {
            h.accumulate(comb, comb as u32);
        }
        assert!(h.begin_readout(false));
        // Two bins out, then a reset request lands mid-scan
        h.read_next_bin();
        h.read_next_bin();
        h.request_reset();
        assert!(!h.reset_done());
        h.read_next_bin();
        assert!(!h.reset_done());
        h.read_next_bin();
        // Sweep ran to the end, everything is zero, done is signaled
        assert!(h.reset_done());
        assert!(h.counts().iter().all(|&c| c == 0));
        assert_eq!(h.state(), State::AwaitingConfig);
    }

    #[test]
    fn accumulation_deferred_while_reading() {
        let mut h = Histogram::new(2);
        h.accumulate(1, 1);
        h.begin_readout(false);
        h.accumulate(1, 7);
        assert_eq!(h.read_next_bin(), Some((0, 0)));
        assert_eq!(h.read_next_bin(), Some((1, 1)));
        drain(&mut h);
        assert_eq!(h.counts()[1], 1);
    }

    #[test]
    fn no_second_readout_while_scanning() {
        let mut h = Histogram::new(2);
        assert!(h.begin_readout(false));
        assert!(!h.begin_readout(true));
    }

    #[test]
    fn counter_wraps_at_u32_max() {
        let mut h = Histogram::new(1);
        h.accumulate(1, u32::MAX);
        h.accumulate(1, 3);
        assert_eq!(h.counts()[1], 2);
    }

    #[test]
    fn coalescer_is_transparent() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let seq: Vec<u16> = (0..10_000)
            .map(|_| {
                // Runs of repeats are common at high rates
                if rng.gen_bool(0.7) {
                    1
                } else {
                    rng.gen_range(1..8)
                }
            })
            .collect();

        let mut direct = Histogram::new(3);
        for &c in &seq {
            direct.accumulate(c, 1);
        }

        for cap in [1, 2, 16, 4096] {
            let mut coalesced = Histogram::new(3);
            let mut co = Coalescer::new(cap);
            for &c in &seq {
                if let Some((comb, n)) = co.push(c) {
                    coalesced.accumulate(comb, n);
                }
            }
            if let Some((comb, n)) = co.flush() {
                coalesced.accumulate(comb, n);
            }
            assert_eq!(direct.counts(), coalesced.counts());
        }
    }

    #[test]
    fn coalescer_respects_lookahead_bound() {
        let mut co = Coalescer::new(3);
        let mut out = Vec::new();
        for _ in 0..7 {
            if let Some(run) = co.push(5) {
                out.push(run);
            }
        }
        if let Some(run) = co.flush() {
            out.push(run);
        }
        assert_eq!(out, vec![(5, 3), (5, 3), (5, 1)]);
    }
}
