//! Bitmask tools for working with combinations of channels

use bit_iter::BitIter;

/// Convert virtual channels (0-indexed) into a combination bitmask
pub fn chans_to_mask(chs: &[u8]) -> u16 {
    let mut m = 0;
    for ch in chs {
        m |= 1 << ch;
    }
    return m;
}

/// Returns all channels in a combination, in ascending order
pub fn mask_to_chans(m: u16) -> Vec<u8> {
    let mut chs = Vec::new();
    for b in BitIter::from(m) {
        chs.push(b as u8);
    }
    return chs;
}

// Bitwise set/clear/toggle/check/change operations for unsigned integers

use num_traits::{FromPrimitive, PrimInt, Unsigned};
use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign};

pub trait BitOps:
    PrimInt
    + BitAndAssign
    + BitOrAssign
    + BitXorAssign
    + FromPrimitive
    + Unsigned
{
    fn set(&mut self, b: usize);
    fn clear(&mut self, b: usize);
    fn toggle(&mut self, b: usize);
    fn change(&mut self, b: usize, x: bool);
    fn check(self, b: usize) -> bool;
}

macro_rules! impl_bit_ops {
    ($($t:ty),*) => {
        $(
            impl BitOps for $t {
                #[inline]
                fn set(&mut self, b: usize) {
                    *self |= 1 << b;
                }

                #[inline]
                fn clear(&mut self, b: usize) {
                    *self &= !(1 << b);
                }

                #[inline]
                fn toggle(&mut self, b: usize) {
                    *self ^= 1 << b;
                }

                #[inline]
                fn change(&mut self, b: usize, x: bool) {
                    *self = (*self & !(1 << b)) | ((x as $t) << b);
                }

                #[inline]
                fn check(self, b: usize) -> bool {
                    return self >> b & 1 == 1;
                }
            }
        )*
    };
}

impl_bit_ops!(u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_masks() {
        assert_eq!(0b01, chans_to_mask(&[0]));
        assert_eq!(0b10, chans_to_mask(&[1]));
        assert_eq!(0b11, chans_to_mask(&[0, 1]));
        assert_eq!(0x8000, chans_to_mask(&[15]));
    }

    #[test]
    fn bijective_channel_masks() {
        // Exhaustively check all u16s
        for pat in u16::MIN..=u16::MAX {
            let chs = mask_to_chans(pat);
            assert_eq!(chs.len(), pat.count_ones() as usize);
            let pat2 = chans_to_mask(&chs);
            assert_eq!(pat, pat2);
        }
    }

    #[test]
    fn bit_ops() {
        // Exhaustively check all u16's
        for i in u16::MIN..=u16::MAX {
            for b in BitIter::from(u16::MAX) {
                let mut x = i;
                let i_set = i | 1 << b;
                let i_clr = i & !(1 << b);

                assert_eq!(i.check(b), i >> b & 1 == 1);
                x.set(b);
                assert_eq!(x, i_set);
                x.clear(b);
                assert_eq!(x, i_clr);
                x.toggle(b);
                assert_eq!(x, i_set);
                x.toggle(b);
                assert_eq!(x, i_clr);
                x.change(b, true);
                assert_eq!(x, i_set);
                x.change(b, false);
                assert_eq!(x, i_clr);
            }
        }
        // Check some interesting u32's and u64's
        for &i in [0u64, 1, 1337, u32::MAX as u64, u64::MAX].iter() {
            for b in BitIter::from(u64::MAX) {
                let mut x = i;
                let i_set = i | 1 << b;
                let i_clr = i & !(1 << b);

                assert_eq!(i.check(b), i >> b & 1 == 1);
                x.set(b);
                assert_eq!(x, i_set);
                x.clear(b);
                assert_eq!(x, i_clr);
            }
        }
    }
}
