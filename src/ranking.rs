// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{CompleteLap, CompleteLapTable, DriverKey};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap};


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapRanking {
  pub driver:      DriverKey,
  pub lap:         u32,
  pub lap_seconds: f64,
  pub rank:        usize,
}

/// Ranks the drivers by lap time on every lap, laps in ascending order.
///
/// Ranks run 1, 2, 3, ... without shared places, equal times keep table
/// order. Rows without a lap number or without a lap time are not ranked.
pub fn ranking_by_lap(table: &CompleteLapTable) -> Vec<LapRanking> {
  let mut laps: BTreeMap<u32, Vec<(&CompleteLap, f64)>> = BTreeMap::new();
  for row in table.rows() {
    if let (Some(lap), Some(seconds)) = (row.lap, row.lap_seconds) {
      laps.entry(lap).or_default().push((row, seconds));
    }
  }

  let mut ranking = Vec::with_capacity(table.len());
  for (lap, mut rows) in laps {
    rows.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    ranking.extend(rows.into_iter()
                       .enumerate()
                       .map(|(idx, (row, lap_seconds))| LapRanking {
                         driver: row.driver.clone(),
                         lap,
                         lap_seconds,
                         rank: idx + 1,
                       }));
  }
  ranking
}

/// Ranks of `driver` from lap to lap, i.e. one line of a position chart.
pub fn driver_positions(ranking: &[LapRanking], driver: &DriverKey) -> Vec<(u32, usize)> {
  ranking.iter()
         .filter(|entry| &entry.driver == driver)
         .map(|entry| (entry.lap, entry.rank))
         .collect()
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{DriverInfo, DriverLapTable, LapRecord, Roster};
  use pretty_assertions::assert_eq;

  fn table() -> CompleteLapTable {
    let lap = |n: Option<u32>, time: &str| LapRecord::new(n, time, ["", "", ""], None);
    let mut info = DriverInfo::default();
    info.insert("44 - John Doe".into(),
                DriverLapTable::new(vec![lap(Some(1), "1:30.000"),
                                         lap(Some(2), "1:29.000"),
                                         lap(None, "1:20.000")]));
    info.insert("7 - Jane Roe".into(),
                DriverLapTable::new(vec![lap(Some(1), "1:31.000"),
                                         lap(Some(2), "1:29.000"),
                                         lap(Some(3), "")]));
    info.insert("3 - Third".into(),
                DriverLapTable::new(vec![lap(Some(2), "1:28.500")]));
    CompleteLapTable::build(&info, &Roster::default())
  }

  #[test]
  fn ranking_by_lap_test() {
    let ranking = ranking_by_lap(&table());
    assert_eq!(vec![(1, "44 - John Doe", 1),
                    (1, "7 - Jane Roe", 2),
                    (2, "3 - Third", 1),
                    (2, "44 - John Doe", 2),
                    (2, "7 - Jane Roe", 3)],
               ranking.iter()
                      .map(|r| (r.lap, r.driver.as_str(), r.rank))
                      .collect::<Vec<_>>());
  }

  #[test]
  fn ranks_are_sequential_test() {
    let ranking = ranking_by_lap(&table());
    for lap in &[1, 2] {
      let ranks = ranking.iter()
                         .filter(|r| r.lap == *lap)
                         .map(|r| r.rank)
                         .collect::<Vec<_>>();
      assert_eq!((1..=ranks.len()).collect::<Vec<_>>(), ranks);
    }
  }

  #[test]
  fn driver_positions_test() {
    let ranking = ranking_by_lap(&table());
    assert_eq!(vec![(1, 2), (2, 3)],
               driver_positions(&ranking, &"7 - Jane Roe".into()));
    assert!(driver_positions(&ranking, &"99 - Nobody".into()).is_empty());
  }

  #[test]
  fn empty_test() {
    assert!(ranking_by_lap(&CompleteLapTable::default()).is_empty());
  }
}
