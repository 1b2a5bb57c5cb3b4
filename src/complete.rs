// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{outlier::{filter_outliers, Grouping, TimeColumn},
            DriverInfo,
            DriverKey,
            LapRecord,
            Roster};
use serde::{Deserialize, Serialize};


/// A lap of the flattened session table: the lap as recorded plus the
/// driver, the parsed times and the car it was driven in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompleteLap {
  pub driver:          DriverKey,
  pub lap:             Option<u32>,
  pub lap_time:        String,
  pub sector1_time:    String,
  pub sector2_time:    String,
  pub sector3_time:    String,
  pub speed_trap:      Option<f64>,
  pub lap_seconds:     Option<f64>,
  pub sector1_seconds: Option<f64>,
  pub sector2_seconds: Option<f64>,
  pub sector3_seconds: Option<f64>,
  pub manufacturer:    String,
  pub team:            Option<String>,
}

impl CompleteLap {
  pub fn new(driver: &DriverKey, lap: &LapRecord, roster: &Roster) -> Self {
    Self { driver:          driver.clone(),
           lap:             lap.lap(),
           lap_time:        lap.lap_time().clone(),
           sector1_time:    lap.sector1_time().clone(),
           sector2_time:    lap.sector2_time().clone(),
           sector3_time:    lap.sector3_time().clone(),
           speed_trap:      lap.speed_trap(),
           lap_seconds:     lap.lap_seconds(),
           sector1_seconds: lap.sector_seconds(1),
           sector2_seconds: lap.sector_seconds(2),
           sector3_seconds: lap.sector_seconds(3),
           manufacturer:    roster.manufacturer(driver).to_string(),
           team:            roster.team(driver).map(str::to_string) }
  }

  pub fn seconds(&self, column: TimeColumn) -> Option<f64> {
    match column {
      TimeColumn::Lap => self.lap_seconds,
      TimeColumn::Sector1 => self.sector1_seconds,
      TimeColumn::Sector2 => self.sector2_seconds,
      TimeColumn::Sector3 => self.sector3_seconds,
    }
  }
}


/// Every lap of every driver of a session in one table, driver by driver in
/// `DriverInfo` order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompleteLapTable {
  rows: Vec<CompleteLap>,
}

impl CompleteLapTable {
  pub fn build(info: &DriverInfo, roster: &Roster) -> Self {
    let rows = info.iter()
                   .flat_map(|(driver, laps)| {
                     laps.iter().map(move |lap| CompleteLap::new(driver, lap, roster))
                   })
                   .collect();
    Self { rows }
  }

  pub fn from_rows(rows: Vec<CompleteLap>) -> Self {
    Self { rows }
  }

  pub fn rows(&self) -> &[CompleteLap] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Distinct drivers in order of appearance.
  pub fn drivers(&self) -> Vec<DriverKey> {
    let mut drivers: Vec<DriverKey> = Vec::new();
    for row in &self.rows {
      if drivers.last() != Some(&row.driver) && !drivers.contains(&row.driver) {
        drivers.push(row.driver.clone());
      }
    }
    drivers
  }

  /// Rows of `driver`, in lap order as recorded.
  pub fn driver_rows<'a>(&'a self, driver: &'a DriverKey)
                         -> impl Iterator<Item = &'a CompleteLap> + 'a {
    self.rows.iter().filter(move |row| &row.driver == driver)
  }

  /// Drops laps slower than `multiplier` times the best `column` time of
  /// their group.
  ///
  /// Grouping by team first drops the laps of drivers without a team, they
  /// can't be compared against anyone.
  pub fn filter_outliers(&self,
                         column: TimeColumn,
                         grouping: Grouping,
                         multiplier: f64)
                         -> Self {
    let time = |row: &CompleteLap| row.seconds(column);
    let rows = match grouping {
      Grouping::Manufacturer => {
        filter_outliers(&self.rows,
                        time,
                        |row| Some(row.manufacturer.clone()),
                        multiplier)
      }
      Grouping::Team => {
        let with_team = self.rows
                            .iter()
                            .filter(|row| row.team.is_some())
                            .cloned()
                            .collect::<Vec<_>>();
        filter_outliers(&with_team, time, |row| row.team.clone(), multiplier)
      }
      Grouping::Ungrouped => filter_outliers(&self.rows, time, |_| Some(()), multiplier),
    };
    Self { rows }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{DriverLapTable, LapRecord};
  use pretty_assertions::assert_eq;

  fn lap(n: u32, lap_time: &str, s1: &str) -> LapRecord {
    LapRecord::new(Some(n), lap_time, [s1, "30.000", "30.000"], Some(200.0))
  }

  fn info() -> DriverInfo {
    let mut info = DriverInfo::default();
    info.insert("44 - John Doe".into(),
                DriverLapTable::new(vec![lap(1, "1:30.000", "30.000"),
                                         lap(2, "1:35.000", "31.000")]));
    info.insert("7 - Jane Roe".into(),
                DriverLapTable::new(vec![lap(1, "1:31.000", "29.500"),
                                         lap(2, "", "")]));
    info.insert("3 - Solo Driver".into(),
                DriverLapTable::new(vec![lap(1, "1:40.000", "33.000")]));
    info
  }

  fn roster() -> Roster {
    Roster::default().with("44 - John Doe", "Chevrolet", Some("Blue"))
                     .with("7 - Jane Roe", "Chevrolet", Some("Red"))
  }

  #[test]
  fn build_test() {
    let table = CompleteLapTable::build(&info(), &roster());
    assert_eq!(5, table.len());

    let first = &table.rows()[0];
    assert_eq!("44 - John Doe", first.driver.as_str());
    assert_eq!(Some(90.0), first.lap_seconds);
    assert_eq!(Some(30.0), first.sector1_seconds);
    assert_eq!("Chevrolet", first.manufacturer);
    assert_eq!(Some("Blue".to_string()), first.team);

    let unknown = &table.rows()[4];
    assert_eq!("Unknown", unknown.manufacturer);
    assert_eq!(None, unknown.team);
    assert_eq!(None, table.rows()[3].lap_seconds);

    assert_eq!(vec!["44 - John Doe", "7 - Jane Roe", "3 - Solo Driver"],
               table.drivers().iter().map(|d| d.as_str()).collect::<Vec<_>>());
    assert_eq!(2, table.driver_rows(&"7 - Jane Roe".into()).count());
  }

  #[test]
  fn filter_by_manufacturer_test() {
    let table = CompleteLapTable::build(&info(), &roster());
    let filtered = table.filter_outliers(TimeColumn::Lap, Grouping::Manufacturer, 1.02);
    // chevrolet best is 90s, 91s is in, 95s and the missing time are out;
    // the unknown car is alone in its group
    let kept = filtered.rows()
                       .iter()
                       .map(|row| (row.driver.as_str(), row.lap))
                       .collect::<Vec<_>>();
    assert_eq!(vec![("44 - John Doe", Some(1)),
                    ("7 - Jane Roe", Some(1)),
                    ("3 - Solo Driver", Some(1))],
               kept);
  }

  #[test]
  fn filter_by_team_test() {
    let table = CompleteLapTable::build(&info(), &roster());
    let filtered = table.filter_outliers(TimeColumn::Sector1, Grouping::Team, 1.05);
    assert_eq!(3, filtered.len());
    assert!(filtered.rows().iter().all(|row| row.team.is_some()));
  }

  #[test]
  fn filter_ungrouped_test() {
    let table = CompleteLapTable::build(&info(), &roster());
    let filtered = table.filter_outliers(TimeColumn::Lap, Grouping::Ungrouped, 1.0);
    assert_eq!(1, filtered.len());
    assert_eq!(Some(90.0), filtered.rows()[0].lap_seconds);
  }

  #[test]
  fn empty_test() {
    let table = CompleteLapTable::build(&DriverInfo::default(), &Roster::default());
    assert!(table.is_empty());
    assert!(table.filter_outliers(TimeColumn::Lap, Grouping::Team, 1.02).is_empty());
  }
}
