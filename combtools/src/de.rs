//! Deserialization of tags and combination data from `.tsv`

use crate::{Bin, Tag};
use anyhow::Result;
use std::io::Read;

/// Deserialize tags from tab-separated values (channel, time).
pub fn tsv(rdr: &mut csv::Reader<impl Read>) -> Result<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        tags.push(Tag {
            time: record[1].parse::<u64>()?,
            channel: record[0].parse::<u8>()?,
        });
    }
    Ok(tags)
}

/// Deserialize a tab-separated histogram file of (x,y) records.
pub fn histogram_tsv<R, T, U>(rdr: &mut csv::Reader<R>) -> Result<Vec<Bin<T, U>>>
where
    R: Read,
    T: std::str::FromStr,
    U: std::str::FromStr,
{
    let mut bins: Vec<Bin<T, U>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let (Ok(x), Ok(y)) = (record[0].parse::<T>(), record[1].parse::<U>()) {
            bins.push(Bin { x, y });
        }
    }
    Ok(bins)
}
