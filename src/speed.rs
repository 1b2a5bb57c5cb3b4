// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{DriverInfo, DriverKey, Roster, TimingError};
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, convert::TryFrom};


/// Number of readings averaged for `SpeedSummary::top5_average`.
const TOP_AVERAGE_COUNT: usize = 5;


fn descending(a: &f64, b: &f64) -> Ordering {
  b.partial_cmp(a).unwrap_or(Ordering::Equal)
}


/// One reading of the speed trap ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedRank {
  pub rank:         usize,
  pub driver:       DriverKey,
  pub manufacturer: String,
  pub speed:        f64,
}

/// Ranks every speed trap reading of the session, fastest first, and keeps
/// the first `top_n`.
///
/// Equal readings share a rank and the next distinct reading is ranked by
/// the number of readings strictly faster plus one (210, 210, 205 rank 1,
/// 1, 3). Ranks are computed before truncating.
pub fn speed_ranking(info: &DriverInfo, roster: &Roster, top_n: usize)
                     -> Vec<SpeedRank> {
  let mut readings = info.iter()
                         .flat_map(|(driver, laps)| {
                           laps.speeds().into_iter().map(move |speed| (driver, speed))
                         })
                         .collect::<Vec<_>>();
  readings.sort_by(|(_, a), (_, b)| descending(a, b));

  let mut ranking: Vec<SpeedRank> = Vec::with_capacity(readings.len());
  for (idx, (driver, speed)) in readings.into_iter().enumerate() {
    let rank = match ranking.last() {
      Some(previous) if previous.speed == speed => previous.rank,
      _ => idx + 1,
    };
    ranking.push(SpeedRank { rank,
                             driver: driver.clone(),
                             manufacturer: roster.manufacturer(driver).to_string(),
                             speed });
  }
  ranking.truncate(top_n);
  ranking
}


/// Speed trap readings of each driver sorted fastest first, one column per
/// driver. Rows are ranks, not laps, so shorter columns end in empty cells.
///
/// Every row holds exactly one cell per column; a stored matrix breaking
/// that is rejected when read back.
#[derive(Clone, Debug, Default, PartialEq, Getters, Serialize, Deserialize)]
#[serde(try_from = "RawSpeedMatrix")]
#[getset(get = "pub")]
pub struct SpeedMatrix {
  columns: Vec<String>,
  rows:    Vec<Vec<Option<f64>>>,
}

impl SpeedMatrix {
  /// Column of `label`, top to bottom, empty cells included.
  pub fn column(&self, label: &str) -> Option<Vec<Option<f64>>> {
    let idx = self.columns.iter().position(|column| column == label)?;
    Some(self.rows.iter().map(|row| row.get(idx).copied().flatten()).collect())
  }
}

#[derive(Deserialize)]
struct RawSpeedMatrix {
  columns: Vec<String>,
  rows:    Vec<Vec<Option<f64>>>,
}

impl TryFrom<RawSpeedMatrix> for SpeedMatrix {
  type Error = TimingError;

  fn try_from(raw: RawSpeedMatrix) -> Result<Self, Self::Error> {
    let width = raw.columns.len();
    if let Some((idx, row)) = raw.rows.iter().enumerate().find(|(_, row)| row.len() != width) {
      timing_err!(TimingError::Parse { field: "speed matrix".to_string(),
                                       value: format!("row {} has {} cells for {} columns",
                                                      idx + 1,
                                                      row.len(),
                                                      width) });
    }
    Ok(Self { columns: raw.columns,
              rows:    raw.rows })
  }
}

/// Builds the speed matrix with driver keys as column labels, columns
/// ordered by car number.
pub fn speed_matrix(info: &DriverInfo) -> SpeedMatrix {
  build_matrix(info, |driver| driver.to_string())
}

/// Same as `speed_matrix` with only the car number as column label.
pub fn speed_matrix_numeral(info: &DriverInfo) -> SpeedMatrix {
  build_matrix(info, |driver| driver.numeral().to_string())
}

fn build_matrix<F>(info: &DriverInfo, label: F) -> SpeedMatrix
  where F: Fn(&DriverKey) -> String
{
  let mut drivers = info.iter().collect::<Vec<_>>();
  drivers.sort_by(|(a, _), (b, _)| a.cmp_by_car_number(b));

  let columns = drivers.iter()
                       .map(|&(driver, _)| label(driver))
                       .collect::<Vec<_>>();
  let speeds = drivers.iter()
                      .map(|(_, laps)| laps.speeds_descending())
                      .collect::<Vec<_>>();

  let depth = speeds.iter().map(Vec::len).max().unwrap_or(0);
  let rows = (0..depth).map(|rank| {
                         speeds.iter()
                               .map(|column| column.get(rank).copied())
                               .collect()
                       })
                       .collect();

  SpeedMatrix { columns, rows }
}


/// Running mean over a driver's readings, fastest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaisingAverage {
  pub driver:  DriverKey,
  /// Number of readings averaged, starting at 1.
  pub count:   usize,
  pub average: f64,
}

/// For each driver, the mean of its fastest 1, 2, ..., all readings. The
/// sequence never increases and ends at the driver's overall mean.
pub fn raising_average(info: &DriverInfo) -> Vec<RaisingAverage> {
  let mut averages = Vec::new();
  for (driver, laps) in info.iter() {
    let mut sum = 0.0;
    for (idx, speed) in laps.speeds_descending().into_iter().enumerate() {
      sum += speed;
      averages.push(RaisingAverage { driver: driver.clone(),
                                     count: idx + 1,
                                     average: sum / (idx + 1) as f64 });
    }
  }
  averages
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSummary {
  pub driver:       DriverKey,
  pub manufacturer: String,
  pub max_speed:    f64,
  /// Mean of the five fastest readings, or of all if there are fewer.
  pub top5_average: f64,
}

/// Top speed and top-five average of every driver with at least one valid
/// reading.
pub fn speed_summary(info: &DriverInfo, roster: &Roster) -> Vec<SpeedSummary> {
  info.iter()
      .filter_map(|(driver, laps)| {
        let speeds = laps.speeds_descending();
        let max_speed = *speeds.first()?;
        let top = &speeds[..speeds.len().min(TOP_AVERAGE_COUNT)];
        Some(SpeedSummary { driver: driver.clone(),
                            manufacturer: roster.manufacturer(driver).to_string(),
                            max_speed,
                            top5_average: top.iter().sum::<f64>() / top.len() as f64 })
      })
      .collect()
}


/// How `top_speed` orders its drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedOrder {
  /// Driver order of the session.
  Session,
  /// Fastest first.
  Fastest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopSpeed {
  pub driver: DriverKey,
  pub speed:  f64,
}

/// Highest reading per driver; drivers without readings are left out.
pub fn top_speed(info: &DriverInfo, order: SpeedOrder) -> Vec<TopSpeed> {
  let mut speeds = info.iter()
                       .filter_map(|(driver, laps)| {
                         laps.max_speed()
                             .map(|speed| TopSpeed { driver: driver.clone(), speed })
                       })
                       .collect::<Vec<_>>();
  if order == SpeedOrder::Fastest {
    speeds.sort_by(|a, b| descending(&a.speed, &b.speed));
  }
  speeds
}


/// A single reading with the car it was taken from, for distributions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
  pub driver:       DriverKey,
  pub manufacturer: String,
  pub speed:        f64,
}

pub fn speed_distribution(info: &DriverInfo, roster: &Roster) -> Vec<SpeedSample> {
  info.iter()
      .flat_map(|(driver, laps)| {
        let manufacturer = roster.manufacturer(driver).to_string();
        laps.speeds().into_iter().map(move |speed| SpeedSample {
                                   driver: driver.clone(),
                                   manufacturer: manufacturer.clone(),
                                   speed,
                                 })
      })
      .collect()
}
