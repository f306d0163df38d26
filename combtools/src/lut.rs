//! Raw-to-virtual channel remapping

use crate::LUT_SIZE;
use anyhow::{bail, Result};

const RAW_MASK: u8 = (LUT_SIZE - 1) as u8;

/// Writable lookup table translating raw channel indices to the compact
/// virtual indices used by the pipeline.
///
/// Tags whose raw channel has no mapping are dropped silently; an unmapped
/// channel is operating as intended, not an error. Programming mistakes,
/// on the other hand, are caller errors and reported as such.
pub struct ChannelLut {
    table: [Option<u8>; LUT_SIZE],
    width: u8,
}

impl ChannelLut {
    pub fn new(width: u8) -> Self {
        ChannelLut {
            table: [None; LUT_SIZE],
            width,
        }
    }

    /// Identity-style default: virtual channel `i` fed by raw channel `i + 1`,
    /// matching the first physical inputs of the tagger.
    pub fn identity(width: u8) -> Self {
        let mut lut = ChannelLut::new(width);
        for i in 0..width {
            lut.table[(i + 1) as usize] = Some(i);
        }
        lut
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// `remap(raw) -> Option<virtual>`; `None` drops the tag.
    #[inline]
    pub fn remap(&self, raw: u8) -> Option<u8> {
        self.table[(raw & RAW_MASK) as usize]
    }

    pub fn get(&self, raw: u8) -> Option<u8> {
        self.remap(raw)
    }

    pub fn set(&mut self, raw: u8, virt: u8) -> Result<()> {
        if virt >= self.width {
            bail!("virtual channel {} out of range [0, {})", virt, self.width);
        }
        self.table[(raw & RAW_MASK) as usize] = Some(virt);
        Ok(())
    }

    /// Sweep every entry to the invalid sentinel. Returning is the
    /// completion signal.
    pub fn clear(&mut self) {
        for entry in self.table.iter_mut() {
            *entry = None;
        }
    }

    /// Check a whole assignment batch: virtual indices in range, no raw
    /// channel claimed twice.
    pub fn validate(width: u8, assignments: &[(u8, Vec<u8>)]) -> Result<()> {
        let mut seen = [false; LUT_SIZE];
        for (virt, raws) in assignments {
            if *virt >= width {
                bail!("virtual channel {} out of range [0, {})", virt, width);
            }
            for raw in raws {
                let slot = (raw & RAW_MASK) as usize;
                if seen[slot] {
                    bail!("raw channel {} assigned more than once", raw);
                }
                seen[slot] = true;
            }
        }
        Ok(())
    }

    /// Program the full table from `virtual -> raw channels` assignments,
    /// replacing all previous entries.
    pub fn program(&mut self, assignments: &[(u8, Vec<u8>)]) -> Result<()> {
        Self::validate(self.width, assignments)?;
        self.apply(assignments);
        Ok(())
    }

    /// Infallible on pre-validated assignments.
    pub(crate) fn apply(&mut self, assignments: &[(u8, Vec<u8>)]) {
        self.clear();
        for (virt, raws) in assignments {
            for raw in raws {
                self.table[(raw & RAW_MASK) as usize] = Some(*virt);
            }
        }
    }

    /// Read back the current `virtual -> raw channels` map.
    pub fn channels(&self) -> Vec<(u8, Vec<u8>)> {
        let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
        for virt in 0..self.width {
            let raws: Vec<u8> = (0..LUT_SIZE as u8)
                .filter(|&raw| self.table[raw as usize] == Some(virt))
                .collect();
            if !raws.is_empty() {
                out.push((virt, raws));
            }
        }
        out
    }
}
