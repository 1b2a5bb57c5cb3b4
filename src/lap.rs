// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Jonas Reitemeyer <jonas@bmc-labs.com>
//   Florian Eich <florian@bmc-labs.com>

use super::{time, RawTimingRow};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;


/// Timing of a single lap of one driver. Times are kept as written in the
/// export, the speed trap reading is already numeric.
#[derive(Clone, Debug, Default, PartialEq, CopyGetters, Getters)]
#[derive(Serialize, Deserialize)]
pub struct LapRecord {
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
  #[getset(get_copy = "pub")]
  speed_trap:   Option<f64>,
}

impl LapRecord {
  pub fn new(lap: Option<u32>,
             lap_time: &str,
             sectors: [&str; 3],
             speed_trap: Option<f64>)
             -> Self {
    Self { lap,
           lap_time: lap_time.to_string(),
           sector1_time: sectors[0].to_string(),
           sector2_time: sectors[1].to_string(),
           sector3_time: sectors[2].to_string(),
           speed_trap }
  }

  pub fn from_row(row: &RawTimingRow) -> Self {
    Self { lap:          row.lap(),
           lap_time:     row.lap_time().clone(),
           sector1_time: row.sector1_time().clone(),
           sector2_time: row.sector2_time().clone(),
           sector3_time: row.sector3_time().clone(),
           speed_trap:   time::parse_speed(row.speed_trap()) }
  }

  pub fn lap_seconds(&self) -> Option<f64> {
    time::parse_time(&self.lap_time)
  }

  /// Parsed time of sector `sector` (1, 2 or 3).
  pub fn sector_seconds(&self, sector: usize) -> Option<f64> {
    match sector {
      1 => time::parse_time(&self.sector1_time),
      2 => time::parse_time(&self.sector2_time),
      3 => time::parse_time(&self.sector3_time),
      _ => None,
    }
  }
}


/// All laps of one driver in the order they appear in the export.
#[derive(Clone, Debug, Default, PartialEq, Getters)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverLapTable {
  #[getset(get = "pub")]
  laps: Vec<LapRecord>,
}

impl DriverLapTable {
  pub fn new(laps: Vec<LapRecord>) -> Self {
    Self { laps }
  }

  pub fn len(&self) -> usize {
    self.laps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.laps.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, LapRecord> {
    self.laps.iter()
  }

  /// Every valid speed trap reading, in lap order.
  pub fn speeds(&self) -> Vec<f64> {
    self.laps.iter().filter_map(|lap| lap.speed_trap()).collect()
  }

  /// Valid speed trap readings, fastest first.
  pub fn speeds_descending(&self) -> Vec<f64> {
    let mut speeds = self.speeds();
    speeds.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    speeds
  }

  pub fn max_speed(&self) -> Option<f64> {
    self.speeds().into_iter().fold(None, |max, speed| match max {
                                 Some(max) if max >= speed => Some(max),
                                 _ => Some(speed),
                               })
  }

  /// Highest lap number of the table.
  pub fn max_lap(&self) -> Option<u32> {
    self.laps.iter().filter_map(|lap| lap.lap()).max()
  }

  /// The lap with the lowest parseable lap time together with that time.
  /// The first of several equally fast laps wins.
  pub fn best_lap(&self) -> Option<(&LapRecord, f64)> {
    let mut best: Option<(&LapRecord, f64)> = None;
    for lap in &self.laps {
      let seconds = match lap.lap_seconds() {
        Some(seconds) => seconds,
        None => continue,
      };
      match best {
        Some((_, fastest)) if fastest <= seconds => {}
        _ => best = Some((lap, seconds)),
      }
    }
    best
  }

  /// Copy of this table holding only the laps whose number is in `valid`.
  pub fn retain_laps(&self, valid: &HashSet<u32>) -> Self {
    Self { laps: self.laps
                     .iter()
                     .filter(|lap| lap.lap().map_or(false, |n| valid.contains(&n)))
                     .cloned()
                     .collect() }
  }
}

impl<'a> IntoIterator for &'a DriverLapTable {
  type IntoIter = std::slice::Iter<'a, LapRecord>;
  type Item = &'a LapRecord;

  fn into_iter(self) -> Self::IntoIter {
    self.laps.iter()
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn table() -> DriverLapTable {
    DriverLapTable::new(vec![LapRecord::new(Some(1),
                                            "1:40.000",
                                            ["35.000", "35.000", "30.000"],
                                            Some(205.0)),
                             LapRecord::new(Some(2),
                                            "1:35.500",
                                            ["32.000", "33.500", "30.000"],
                                            Some(212.4)),
                             LapRecord::new(Some(3), "", ["", "", ""], None),
                             LapRecord::new(Some(4),
                                            "1:35.500",
                                            ["32.100", "33.400", "30.000"],
                                            Some(209.9))])
  }

  #[test]
  fn lap_record_test() {
    let row = RawTimingRow::new("14:00:00.000",
                                Some(7),
                                "1:02.500",
                                ["20.5", "21.000", "1:01.000"],
                                "198,7");
    let lap = LapRecord::from_row(&row);
    assert_eq!(Some(7), lap.lap());
    assert_eq!(Some(198.7), lap.speed_trap());
    assert_eq!(Some(62.5), lap.lap_seconds());
    assert_eq!(Some(20.5), lap.sector_seconds(1));
    assert_eq!(Some(61.0), lap.sector_seconds(3));
    assert_eq!(None, lap.sector_seconds(4));
  }

  #[test]
  fn driver_lap_table_test() {
    let table = table();
    assert_eq!(4, table.len());
    assert_eq!(vec![205.0, 212.4, 209.9], table.speeds());
    assert_eq!(vec![212.4, 209.9, 205.0], table.speeds_descending());
    assert_eq!(Some(212.4), table.max_speed());
    assert_eq!(Some(4), table.max_lap());

    let (best, seconds) = table.best_lap().unwrap();
    assert_eq!(Some(2), best.lap());
    assert_eq!(95.5, seconds);
  }

  #[test]
  fn empty_table_test() {
    let table = DriverLapTable::default();
    assert!(table.is_empty());
    assert_eq!(None, table.max_speed());
    assert_eq!(None, table.max_lap());
    assert_eq!(None, table.best_lap());
    assert!(table.speeds().is_empty());
  }

  #[test]
  fn retain_laps_test() {
    let table = table();
    let valid = vec![2, 4, 9].into_iter().collect::<HashSet<u32>>();
    let retained = table.retain_laps(&valid);
    assert_eq!(vec![Some(2), Some(4)],
               retained.iter().map(|lap| lap.lap()).collect::<Vec<_>>());
    assert_eq!(4, table.len());
  }
}
