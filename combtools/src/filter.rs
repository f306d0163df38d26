//! Channel-count filtering of combinations

/// Keeps combinations whose channel count lies in `[min, max]`, inclusive.
///
/// Reconfiguration has no retroactive effect: a combination is judged by the
/// bounds in force when it reaches the filter.
pub struct PatternFilter {
    min: u8,
    max: u8,
}

impl PatternFilter {
    pub fn new(min: u8, max: u8) -> Self {
        PatternFilter { min, max }
    }

    pub fn bounds(&self) -> (u8, u8) {
        (self.min, self.max)
    }

    pub fn set_bounds(&mut self, min: u8, max: u8) {
        self.min = min;
        self.max = max;
    }

    pub fn accept(&self, comb: u16) -> bool {
        let n = comb.count_ones() as u8;
        n >= self.min && n <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let f = PatternFilter::new(2, 3);
        assert!(!f.accept(0b0001));
        assert!(f.accept(0b0011));
        assert!(f.accept(0b0111));
        assert!(!f.accept(0b1111));
    }

    #[test]
    fn reconfiguration() {
        let mut f = PatternFilter::new(1, 16);
        assert!(f.accept(0b1));
        f.set_bounds(2, 2);
        assert_eq!(f.bounds(), (2, 2));
        assert!(!f.accept(0b1));
        assert!(f.accept(0b101));
    }
}
