use crate::error::LiveError;
use crate::{HOUR_MINUTES, TIME_FORMAT};
use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Start, end and granularity of the synthetic time axis.
/// Only constructed through validation, so every TimeSpec is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpec {
    start: NaiveTime,
    end: NaiveTime,
    interval: u32,
}

impl TimeSpec {
    pub fn new(start: NaiveTime, end: NaiveTime, interval: u32) -> Result<TimeSpec, LiveError> {
        if interval == 0 || HOUR_MINUTES % interval != 0 {
            return Err(LiveError::InvalidTimeSpec(format!(
                "interval of {} minutes does not evenly divide {} minutes",
                interval, HOUR_MINUTES
            )));
        }
        if end <= start {
            return Err(LiveError::InvalidTimeSpec(format!(
                "end {} must be after start {}",
                end.format(TIME_FORMAT),
                start.format(TIME_FORMAT)
            )));
        }
        Ok(TimeSpec {
            start,
            end,
            interval,
        })
    }

    /// Parses `HH:MM` start and end times.
    pub fn parse(start: &str, end: &str, interval: u32) -> Result<TimeSpec, LiveError> {
        TimeSpec::new(parse_time(start)?, parse_time(end)?, interval)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// whole hours and remainder minutes between start and end
    pub fn span(&self) -> (u32, u32) {
        let minutes = self.end.signed_duration_since(self.start).num_minutes() as u32;
        (minutes / HOUR_MINUTES, minutes % HOUR_MINUTES)
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, LiveError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|e| {
        LiveError::InvalidTimeSpec(format!("`{}` is not a HH:MM time of day ({})", s, e))
    })
}

/// One tick of the axis, shown as `H:MM` with an unpadded hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeSlot {
    type Err = LiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LiveError::InvalidTimeSpec(format!("`{}` is not a H:MM time slot", s));
        let mut parts = s.split(':');
        let (h, m) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), None) => (h, m),
            _ => return Err(invalid()),
        };
        if m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u32>().map_err(|_| invalid())?;
        let minute = m.parse::<u32>().map_err(|_| invalid())?;
        if minute >= HOUR_MINUTES {
            return Err(invalid());
        }
        Ok(TimeSlot { hour, minute })
    }
}

/// The minute offsets within one hour, ascending and starting at zero.
pub fn hour_pattern(interval: u32) -> Vec<u32> {
    (0..HOUR_MINUTES / interval).map(|i| i * interval).collect()
}

/// The ordered slots of one session; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAxis {
    slots: Vec<TimeSlot>,
    pattern: Vec<u32>,
    anchor_index: usize,
    interval: u32,
}

impl TimeAxis {
    /// Builds the axis for a validated TimeSpec.
    ///
    /// The hour pattern is reversed unless the start minute is zero, and the
    /// anchor is the first position of the oriented pattern closest to the start
    /// minute; the orientation therefore settles ties between two offsets.
    /// Slots then run forward in time from the anchor offset, one hour pattern
    /// per hour, for `hours * len(pattern) + minutes / interval + 1` slots.
    pub fn build(spec: &TimeSpec) -> TimeAxis {
        let interval = spec.interval();
        let natural = hour_pattern(interval);
        let start_minute = spec.start().minute();

        let mut pattern = natural.clone();
        if start_minute != 0 {
            pattern.reverse();
        }
        let diffs: Vec<u32> = pattern
            .iter()
            .map(|&m| if m > start_minute { m - start_minute } else { start_minute - m })
            .collect();
        let anchor_index = diffs
            .iter()
            .enumerate()
            .min_by_key(|&(_, d)| *d)
            .map(|(i, _)| i)
            .unwrap_or(0);
        debug!(?pattern, ?diffs, anchor_index, "hour pattern");

        let (hours, minutes) = spec.span();
        let slot_count = (hours * pattern.len() as u32 + minutes / interval + 1) as usize;
        debug!(hours, minutes, slot_count, "time span");

        let anchor_minute = pattern[anchor_index];
        let first = natural
            .iter()
            .position(|&m| m == anchor_minute)
            .unwrap_or(0);
        // the walk bumps the hour on every zero offset, the first slot included
        let mut hour = i64::from(spec.start().hour()) - if first == 0 { 1 } else { 0 };
        let mut slots = Vec::with_capacity(slot_count);
        for i in 0..slot_count {
            let pos = (first + i) % natural.len();
            if pos == 0 {
                hour += 1;
            }
            slots.push(TimeSlot {
                hour: hour as u32,
                minute: natural[pos],
            });
        }

        TimeAxis {
            slots,
            pattern,
            anchor_index,
            interval,
        }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// the slots as `H:MM` strings, in order
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// position within the oriented hour pattern closest to the start minute
    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    /// the hour pattern in the orientation used to pick the anchor
    pub fn pattern(&self) -> &[u32] {
        &self.pattern
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }
}

/// Validates the `HH:MM` inputs and builds the axis, returning it with its anchor index.
pub fn build(start: &str, end: &str, interval: u32) -> Result<(TimeAxis, usize), LiveError> {
    let spec = TimeSpec::parse(start, end, interval)?;
    let axis = TimeAxis::build(&spec);
    let anchor = axis.anchor_index();
    Ok((axis, anchor))
}
