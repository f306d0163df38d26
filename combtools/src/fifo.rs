//! Rate adaptation between bursty combination production and the consumer

use std::collections::VecDeque;

/// FIFO depth of the reference bitfile
pub const DEFAULT_DEPTH: usize = 8192;

/// Bounded FIFO with drop-new overflow semantics.
///
/// The producer is never blocked: pushing into a full queue drops the new
/// item and sets a sticky overflow flag. The flag stays set until explicitly
/// cleared at the next capture enable.
pub struct RateFifo {
    q: VecDeque<u16>,
    depth: usize,
    overflow: bool,
}

impl RateFifo {
    pub fn new(depth: usize) -> Self {
        RateFifo {
            q: VecDeque::with_capacity(depth),
            depth,
            overflow: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Returns false if the queue was full and the item was dropped.
    pub fn push(&mut self, comb: u16) -> bool {
        if self.q.len() >= self.depth {
            self.overflow = true;
            return false;
        }
        self.q.push_back(comb);
        true
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.q.pop_front()
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn clear_overflow(&mut self) {
        self.overflow = false;
    }

    /// Drop all queued items, e.g. when the sink mode changes.
    pub fn clear(&mut self) {
        self.q.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut f = RateFifo::new(4);
        for c in [3u16, 1, 2] {
            assert!(f.push(c));
        }
        assert_eq!(f.pop(), Some(3));
        assert_eq!(f.pop(), Some(1));
        assert_eq!(f.pop(), Some(2));
        assert_eq!(f.pop(), None);
        assert!(!f.overflow());
    }

    #[test]
    fn drop_new_on_full() {
        let mut f = RateFifo::new(2);
        assert!(f.push(1));
        assert!(f.push(2));
        assert!(!f.push(3));
        assert!(f.overflow());
        // The queued items survive, the new one is gone
        assert_eq!(f.pop(), Some(1));
        assert_eq!(f.pop(), Some(2));
        assert_eq!(f.pop(), None);
    }

    #[test]
    fn overflow_is_sticky() {
        let mut f = RateFifo::new(1);
        f.push(1);
        f.push(2);
        assert!(f.overflow());
        f.pop();
        f.pop();
        assert!(f.overflow());
        f.clear_overflow();
        assert!(!f.overflow());
    }
}
