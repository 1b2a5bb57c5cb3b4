// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Result, TimingError};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};


const CLOCK_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M:%S"];


/// Converts a lap or sector time of the form `M:SS.mmm` or `SS.mmm` into
/// seconds.
///
/// The millisecond part is right-padded to three digits before conversion,
/// i.e. `"12.5"` is 12.500 s and not 12.005 s. Anything that doesn't fit
/// the format yields `None`, which callers must treat as "no time" and never
/// as zero.
pub fn parse_time(text: &str) -> Option<f64> {
  let text = text.trim();
  let (minutes, rest) = match text.find(':') {
    Some(idx) => (parse_digits(&text[..idx])?, &text[idx + 1..]),
    None => (0, text),
  };

  let mut parts = rest.split('.');
  let seconds = parse_digits(parts.next()?)?;
  let fraction = parts.next()?;
  if parts.next().is_some() || fraction.contains(':') {
    return None;
  }

  // pad the fraction on the right, "5" -> "500", "05" -> "050"; anything
  // below the millisecond is cut off
  parse_digits(fraction)?;
  let padded = format!("{:0<3}", fraction);
  let millis = parse_digits(&padded[..3])?;

  let total = minutes.checked_mul(60_000)?
                     .checked_add(seconds.checked_mul(1000)?)?
                     .checked_add(millis)?;
  Some(total as f64 / 1000.0)
}

fn parse_digits(text: &str) -> Option<u64> {
  if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  text.parse().ok()
}

/// Formats seconds as `M:SS.mmm`, rounded to the millisecond.
pub fn format_time(seconds: f64) -> String {
  if !seconds.is_finite() || seconds < 0.0 {
    return String::new();
  }
  let millis = (seconds * 1000.0).round() as u64;
  format!("{}:{:02}.{:03}",
          millis / 60_000,
          (millis % 60_000) / 1000,
          millis % 1000)
}

/// Converts a speed trap reading to km/h. Accepts both `,` and `.` as the
/// decimal separator; empty or malformed readings yield `None`.
pub fn parse_speed(text: &str) -> Option<f64> {
  let speed = text.trim().replace(',', ".").parse::<f64>().ok()?;
  if speed.is_finite() {
    Some(speed)
  } else {
    None
  }
}


/// Time of day at which a timing line was taken, e.g. `14:03:25.123`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
  pub fn new(time: NaiveTime) -> Self {
    Self(time)
  }

  pub fn time(&self) -> NaiveTime {
    self.0
  }

  /// Seconds elapsed from `earlier` to `self`, negative if `earlier` is in
  /// fact later.
  pub fn seconds_since(&self, earlier: &ClockTime) -> f64 {
    let delta = self.0.signed_duration_since(earlier.0);
    match delta.num_microseconds() {
      Some(micros) => micros as f64 / 1_000_000.0,
      None => delta.num_milliseconds() as f64 / 1000.0,
    }
  }
}

impl FromStr for ClockTime {
  type Err = TimingError;

  fn from_str(text: &str) -> Result<Self> {
    let text = text.trim();
    CLOCK_FORMATS.iter()
                 .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
                 .map(ClockTime)
                 .ok_or_else(|| TimingError::Parse { field:
                                                       "clock time".to_string(),
                                                     value: text.to_string() })
  }
}

impl fmt::Display for ClockTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f,
           "{:02}:{:02}:{:02}.{:03}",
           self.0.hour(),
           self.0.minute(),
           self.0.second(),
           self.0.nanosecond() / 1_000_000)
  }
}

impl From<ClockTime> for String {
  fn from(clock: ClockTime) -> Self {
    clock.to_string()
  }
}

impl TryFrom<String> for ClockTime {
  type Error = TimingError;

  fn try_from(text: String) -> Result<Self> {
    text.parse()
  }
}
