pub mod bit;
pub mod cfg;
pub mod de;
pub mod engine;
pub mod fifo;
pub mod filter;
pub mod hist;
pub mod lut;
pub mod ser;
pub mod window;

/// The basic representation of a tagged event
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct Tag {
    /// Wrapping counter in time units from arbitrary offset
    pub time: u64,
    /// Channel of the event: raw index before remap, virtual index after
    pub channel: u8,
}

/// Representation for two-dimensional data like histograms, etc.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Bin<T, U>
where
    T: std::str::FromStr,
    U: std::str::FromStr,
{
    pub x: T,
    pub y: U,
}

/// Maximum number of virtual channels in a combination
pub const MAX_WIDTH: u8 = 16;

/// Raw channel space addressed by the remap table (6-bit indices)
pub const LUT_SIZE: usize = 64;
