//! Serialization of tags and combination data as `.tsv`

use crate::Tag;
use anyhow::Result;
use std::io::Write;

/// Serialize tags to tab-separated values (channel, time).
pub fn tsv(wtr: &mut csv::Writer<impl Write>, tags: &[Tag]) -> Result<()> {
    for tag in tags.iter() {
        wtr.write_record(&[tag.channel.to_string(), tag.time.to_string()])?;
    }
    Ok(())
}

/// Serialize histogram bins to tab-separated (combination, count) records.
pub fn bins_tsv(wtr: &mut csv::Writer<impl Write>, bins: &[(u16, u32)]) -> Result<()> {
    for (comb, count) in bins.iter() {
        wtr.write_record(&[comb.to_string(), count.to_string()])?;
    }
    Ok(())
}

/// Serialize streamed combinations to tab-separated (combination, overflow)
/// records, with the sticky overflow bit as 0/1.
pub fn stream_tsv(wtr: &mut csv::Writer<impl Write>, combs: &[(u16, bool)]) -> Result<()> {
    for (comb, overflow) in combs.iter() {
        wtr.write_record(&[comb.to_string(), (*overflow as u8).to_string()])?;
    }
    Ok(())
}
