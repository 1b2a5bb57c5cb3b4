// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Column, ColumnMap, Result};
use csv::{ReaderBuilder, StringRecord};
use getset::{CopyGetters, Getters};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io;


/// One line of a timing export in the canonical schema, fields kept as they
/// were written.
#[derive(Clone, Debug, Default, PartialEq, CopyGetters, Getters)]
#[derive(Serialize, Deserialize)]
pub struct RawTimingRow {
  #[getset(get = "pub")]
  time_of_day:  String,
  #[getset(get_copy = "pub")]
  lap:          Option<u32>,
  #[getset(get = "pub")]
  lap_time:     String,
  #[getset(get = "pub")]
  sector1_time: String,
  #[getset(get = "pub")]
  sector2_time: String,
  #[getset(get = "pub")]
  sector3_time: String,
  #[getset(get = "pub")]
  speed_trap:   String,
}

impl RawTimingRow {
  pub fn new(time_of_day: &str,
             lap: Option<u32>,
             lap_time: &str,
             sectors: [&str; 3],
             speed_trap: &str)
             -> Self {
    Self { time_of_day:  time_of_day.to_string(),
           lap,
           lap_time:     lap_time.to_string(),
           sector1_time: sectors[0].to_string(),
           sector2_time: sectors[1].to_string(),
           sector3_time: sectors[2].to_string(),
           speed_trap:   speed_trap.to_string() }
  }

  pub fn from_record(record: &StringRecord, columns: &ColumnMap) -> Self {
    let field = |column| columns.field(record, column).trim().to_string();
    Self { time_of_day:  field(Column::TimeOfDay),
           lap:          parse_lap(columns.field(record, Column::Lap)),
           lap_time:     field(Column::LapTime),
           sector1_time: field(Column::Sector1Time),
           sector2_time: field(Column::Sector2Time),
           sector3_time: field(Column::Sector3Time),
           speed_trap:   field(Column::SpeedTrap) }
  }
}

/// Lap numbers are integers, but exports that went through a spreadsheet
/// tend to carry them as `3.0`.
fn parse_lap(text: &str) -> Option<u32> {
  let text = text.trim();
  if let Ok(lap) = text.parse::<u32>() {
    return Some(lap);
  }
  match text.parse::<f64>() {
    Ok(lap) if lap >= 0.0 && lap.fract() == 0.0 && lap <= u32::MAX as f64 => {
      Some(lap as u32)
    }
    _ => None,
  }
}


/// Reads a whole timing export, normalizing its header first.
///
/// Fails with `TimingError::Schema` before any row is read if the header
/// lacks a required column. Records may be shorter than the header, missing
/// fields read as empty.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<RawTimingRow>> {
  let mut reader = ReaderBuilder::new().has_headers(true)
                                       .flexible(true)
                                       .from_reader(reader);
  let columns = ColumnMap::normalize(reader.headers()?)?;

  let mut rows = Vec::new();
  for record in reader.records() {
    rows.push(RawTimingRow::from_record(&record?, &columns));
  }
  debug!("read {} rows from timing export", rows.len());
  Ok(rows)
}
