// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{speed::SpeedMatrix, Result};
use csv::Writer;
use serde::Serialize;
use std::io;


/// Writes a derived table as CSV, one line per row with a header taken from
/// the field names. Empty cells stand for missing values. An empty table
/// writes nothing, not even the header.
pub fn write_csv<T: Serialize, W: io::Write>(rows: &[T], writer: W) -> Result<()> {
  let mut writer = Writer::from_writer(writer);
  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}

/// Writes the speed matrix with the driver labels as header and readings
/// with three decimals.
pub fn write_matrix<W: io::Write>(matrix: &SpeedMatrix, writer: W) -> Result<()> {
  let mut writer = Writer::from_writer(writer);
  writer.write_record(matrix.columns())?;
  for row in matrix.rows() {
    writer.write_record(row.iter().map(|cell| match cell {
                                    Some(speed) => format!("{:.3}", speed),
                                    None => String::new(),
                                  }))?;
  }
  writer.flush()?;
  Ok(())
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{best_lap_results, speed_matrix, DriverInfo, DriverLapTable, LapRecord};
  use pretty_assertions::assert_eq;

  fn info() -> DriverInfo {
    let lap = |n: u32, time: &str, speed: Option<f64>| {
      LapRecord::new(Some(n), time, ["30.000", "30.100", "29.900"], speed)
    };
    let mut info = DriverInfo::default();
    info.insert("44 - John Doe".into(),
                DriverLapTable::new(vec![lap(1, "1:30.000", Some(205.5)),
                                         lap(2, "1:29.500", Some(210.0))]));
    info.insert("7 - Jane Roe".into(),
                DriverLapTable::new(vec![lap(1, "1:31.000", None)]));
    info
  }

  fn to_string<F: FnOnce(&mut Vec<u8>) -> Result<()>>(write: F) -> String {
    let mut buf = Vec::new();
    write(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
  }

  #[test]
  fn write_csv_test() {
    let results = best_lap_results(&info());
    let csv = to_string(|buf| write_csv(&results, buf));
    assert_eq!("position,numeral,driver,best_lap,sector1_time,sector2_time,\
                sector3_time,lap_seconds\n\
                1,44,44 - John Doe,1:29.500,30.000,30.100,29.900,89.5\n\
                2,7,7 - Jane Roe,1:31.000,30.000,30.100,29.900,91.0\n",
               csv);
  }

  #[test]
  fn write_matrix_test() {
    let csv = to_string(|buf| write_matrix(&speed_matrix(&info()), buf));
    assert_eq!("7 - Jane Roe,44 - John Doe\n,210.000\n,205.500\n", csv);
  }

  #[test]
  fn empty_test() {
    let csv = to_string(|buf| write_csv::<crate::BestLapResult, _>(&[], buf));
    assert_eq!("", csv);
  }
}
