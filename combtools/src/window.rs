//! Grouping of time-ordered tags into coincidence windows
//!
//! A window is the half-open interval `[start, start + win)` opened by the
//! first tag after the previous window closed. Every tag inside the interval
//! ORs its channel into the window's combination. The first tag at or past
//! the end of the interval commits the combination and opens the next window,
//! so a window only ever closes on the arrival of a later tag: an input
//! stream that goes idle leaves its final window uncommitted.

use crate::bit::BitOps;

/// Assembles one combination bitset per closed coincidence window.
///
/// Elapsed time is the wrapping difference of the two counters interpreted
/// as a signed value, which stays correct across counter wraparound as long
/// as the true elapsed time is less than half the counter domain.
pub struct WindowAssembler {
    win: u64,
    start: u64,
    cur: u16,
    open: bool,
}

impl WindowAssembler {
    pub fn new(win: u64) -> Self {
        WindowAssembler {
            win,
            start: 0,
            cur: 0,
            open: false,
        }
    }

    pub fn window(&self) -> u64 {
        self.win
    }

    /// Applies to windows opened from now on; the current window keeps
    /// filling but closes against the new length.
    pub fn set_window(&mut self, win: u64) {
        self.win = win;
    }

    /// Feed one tag in time order. Returns the committed combination when
    /// this tag closes the previous window.
    pub fn push(&mut self, time: u64, channel: u8) -> Option<u16> {
        if !self.open {
            self.open = true;
            self.start = time;
            self.cur = 0;
            self.cur.set(channel as usize);
            return None;
        }
        let elapsed = time.wrapping_sub(self.start) as i64;
        if elapsed < self.win as i64 {
            self.cur.set(channel as usize);
            None
        } else {
            // A window always holds at least its opening tag, so the
            // committed combination is never zero.
            let done = self.cur;
            self.start = time;
            self.cur = 0;
            self.cur.set(channel as usize);
            Some(done)
        }
    }

    /// The still-open, uncommitted combination, if any. Inspection only:
    /// commits happen solely through [`push`](Self::push).
    pub fn pending(&self) -> Option<u16> {
        if self.open {
            Some(self.cur)
        } else {
            None
        }
    }

    /// Discard the open window without committing it.
    pub fn reset(&mut self) {
        self.open = false;
        self.cur = 0;
    }
}
