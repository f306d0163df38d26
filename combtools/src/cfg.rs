//! Configuration tools: formats for declaring and recording measurement runs

use crate::engine::{CaptureConfig, Mode};
use crate::MAX_WIDTH;
use chrono::{offset::Local, DateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Measurement run specification for both declaring and recording runs in
/// text files. For concreteness, we use JSON as the text file format.
///
/// ## Declaring a run
///
/// A run file sets the capture parameters: coincidence window, filter
/// bounds, sink mode, and the channel remap. The `name` field is free; set
/// it to a useful value to help keep track of what was done. A `limit`
/// (parsed as in [humantime](https://docs.rs/humantime/), e.g. `10s` or
/// `2min 30s`) bounds how long the synthetic source runs.
///
/// ## Recording a run
///
/// The same struct is written back with the timestamp filled in, recording
/// what was actually captured alongside the declared settings.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Run {
    pub name: String,
    pub timestamp: Option<DateTime<Local>>,
    #[serde(with = "humantime_serde", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Duration>,
    /// Number of virtual channels in a combination
    pub width: u8,
    pub window: u64,
    pub filter_min: u8,
    pub filter_max: u8,
    pub mode: Mode,
    /// Channel remap: virtual index to the raw channels feeding it.
    /// Empty means the identity-style default mapping.
    #[serde(default = "emptyvec", skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelAssignment>,
}

/// One entry of the channel remap table declaration
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ChannelAssignment {
    pub virt: u8,
    pub raw: Vec<u8>,
}

fn emptyvec<T>() -> Vec<T> {
    Vec::new()
}

impl Run {
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            window: self.window,
            filter_min: self.filter_min,
            filter_max: self.filter_max,
            mode: self.mode,
        }
    }

    pub fn assignments(&self) -> Vec<(u8, Vec<u8>)> {
        self.channels
            .iter()
            .map(|a| (a.virt, a.raw.clone()))
            .collect()
    }
}

/// Creates an empty Run. Specific defaults should be implementation-dependent.
impl Default for Run {
    fn default() -> Self {
        Run {
            name: String::new(),
            timestamp: None,
            limit: None,
            width: MAX_WIDTH,
            window: 1000,
            filter_min: 1,
            filter_max: MAX_WIDTH,
            mode: Mode::Histogram,
            channels: Vec::new(),
        }
    }
}
