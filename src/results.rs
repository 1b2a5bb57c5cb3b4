// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{time::format_time, DriverInfo, DriverKey, Roster};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;


/// Classification line of a practice or qualifying session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestLapResult {
  pub position:     usize,
  pub numeral:      String,
  pub driver:       DriverKey,
  pub best_lap:     String,
  pub sector1_time: String,
  pub sector2_time: String,
  pub sector3_time: String,
  pub lap_seconds:  f64,
}

/// Each driver's fastest lap, fastest driver first.
///
/// Drivers without a single parseable lap time are not classified. Equal
/// times keep the order of the drivers in `info`.
pub fn best_lap_results(info: &DriverInfo) -> Vec<BestLapResult> {
  let mut results = info.iter()
                        .filter_map(|(driver, laps)| {
                          laps.best_lap().map(|(lap, seconds)| {
                                           BestLapResult {
                                             position: 0,
                                             numeral: driver.numeral().to_string(),
                                             driver: driver.clone(),
                                             best_lap: format_time(seconds),
                                             sector1_time: lap.sector1_time().clone(),
                                             sector2_time: lap.sector2_time().clone(),
                                             sector3_time: lap.sector3_time().clone(),
                                             lap_seconds: seconds,
                                           }
                                         })
                        })
                        .collect::<Vec<_>>();

  results.sort_by(|a, b| {
           a.lap_seconds
            .partial_cmp(&b.lap_seconds)
            .unwrap_or(Ordering::Equal)
         });
  for (idx, result) in results.iter_mut().enumerate() {
    result.position = idx + 1;
  }
  results
}


/// Classification line of a race.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
  pub position:       usize,
  pub numeral:        String,
  pub driver:         DriverKey,
  pub team:           Option<String>,
  pub laps_completed: u32,
}

/// Race order by number of laps completed, i.e. the highest lap number of
/// each driver. Drivers without laps are not classified, equal lap counts
/// keep the order of the drivers in `info`.
pub fn race_results(info: &DriverInfo, roster: &Roster) -> Vec<RaceResult> {
  let mut results = info.iter()
                        .filter_map(|(driver, laps)| {
                          laps.max_lap().map(|laps_completed| RaceResult {
                                           position: 0,
                                           numeral: driver.numeral().to_string(),
                                           driver: driver.clone(),
                                           team: roster.team(driver)
                                                       .map(str::to_string),
                                           laps_completed,
                                         })
                        })
                        .collect::<Vec<_>>();

  results.sort_by(|a, b| b.laps_completed.cmp(&a.laps_completed));
  for (idx, result) in results.iter_mut().enumerate() {
    result.position = idx + 1;
  }
  results
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{DriverLapTable, LapRecord};
  use pretty_assertions::assert_eq;

  fn table(times: &[&str]) -> DriverLapTable {
    DriverLapTable::new(times.iter()
                             .enumerate()
                             .map(|(idx, time)| {
                               LapRecord::new(Some(idx as u32 + 1),
                                              time,
                                              ["30.1", "30.2", "30.3"],
                                              Some(200.0))
                             })
                             .collect())
  }

  #[test]
  fn best_lap_results_test() {
    let mut info = DriverInfo::default();
    info.insert("44 - John Doe".into(), table(&["1:31.000", "1:30.500", "1:32.000"]));
    info.insert("7 - Jane Roe".into(), table(&["1:30.400", "garbage", "1:31.000"]));
    info.insert("9 - No Time".into(), table(&["", "--"]));
    info.insert("12 - Empty".into(), DriverLapTable::default());

    let results = best_lap_results(&info);
    assert_eq!(2, results.len());

    assert_eq!(1, results[0].position);
    assert_eq!("7 - Jane Roe", results[0].driver.as_str());
    assert_eq!("7", results[0].numeral);
    assert_eq!("1:30.400", results[0].best_lap);
    assert_eq!("30.1", results[0].sector1_time);

    assert_eq!(2, results[1].position);
    assert_eq!("44 - John Doe", results[1].driver.as_str());
    assert_eq!(90.5, results[1].lap_seconds);
  }

  #[test]
  fn best_lap_ties_test() {
    let mut info = DriverInfo::default();
    info.insert("2 - Second".into(), table(&["1:30.000"]));
    info.insert("1 - First".into(), table(&["1:30.000"]));
    let results = best_lap_results(&info);
    assert_eq!(vec!["2 - Second", "1 - First"],
               results.iter().map(|r| r.driver.as_str()).collect::<Vec<_>>());
  }

  #[test]
  fn race_results_test() {
    let mut info = DriverInfo::default();
    info.insert("44 - John Doe".into(), table(&["1:31.000", "1:30.500"]));
    info.insert("7 - Jane Roe".into(), table(&["1:30.400", "1:30.000", "1:31.000"]));
    info.insert("5 - Also Two".into(), table(&["1:35.000", "1:36.000"]));
    info.insert("12 - Empty".into(), DriverLapTable::default());
    let roster = Roster::default().with("7 - Jane Roe", "Toyota", Some("Red"));

    let results = race_results(&info, &roster);
    assert_eq!(vec![(1, "7 - Jane Roe", 3),
                    (2, "44 - John Doe", 2),
                    (3, "5 - Also Two", 2)],
               results.iter()
                      .map(|r| (r.position, r.driver.as_str(), r.laps_completed))
                      .collect::<Vec<_>>());
    assert_eq!(Some("Red".to_string()), results[0].team);
    assert_eq!(None, results[1].team);

    for pair in results.windows(2) {
      assert!(pair[0].position < pair[1].position);
      assert!(pair[0].laps_completed >= pair[1].laps_completed);
    }
  }

  #[test]
  fn empty_test() {
    assert!(best_lap_results(&DriverInfo::default()).is_empty());
    assert!(race_results(&DriverInfo::default(), &Roster::default()).is_empty());
  }
}
