// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{segment::accumulate_by_driver,
            time::{parse_speed, ClockTime},
            CompleteLapTable,
            DriverKey,
            MarkerPolicy,
            RawTimingRow,
            Result,
            TimingError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};


/// A lap row that made it through clock parsing, input to the gap and next
/// lap speed derivations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedLap {
  pub driver:     DriverKey,
  pub lap:        u32,
  pub clock_time: ClockTime,
  pub speed_trap: Option<f64>,
}

/// Collects every lap row whose time of day is a clock time and whose lap
/// number could be read, tagged with the driver of the enclosing block.
/// Marker handling is the same as for segmentation.
pub fn timed_laps(rows: &[RawTimingRow], policy: &MarkerPolicy) -> Vec<TimedLap> {
  let (blocks, _) = accumulate_by_driver(rows, policy, |row| {
    let lap = row.lap()?;
    match row.time_of_day().parse::<ClockTime>() {
      Ok(clock_time) => Some((lap, clock_time, parse_speed(row.speed_trap()))),
      Err(e) => {
        debug!("skipping row of lap {}: {}", lap, e);
        None
      }
    }
  });

  blocks.into_iter()
        .flat_map(|(driver, laps)| {
          laps.into_iter().map(move |(lap, clock_time, speed_trap)| TimedLap {
                            driver: driver.clone(),
                            lap,
                            clock_time,
                            speed_trap,
                          })
        })
        .collect()
}


/// Time between a car and the car that crossed the line right before it on
/// the same lap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapGap {
  pub driver:     DriverKey,
  pub lap:        u32,
  pub clock_time: ClockTime,
  pub speed_trap: Option<f64>,
  pub gap:        f64,
}

/// Groups the laps by lap number and orders each group by clock time. The
/// gap of a car is the clock delta to the car before it, the first car of a
/// lap has a gap of 0. Output is lap by lap, each lap in crossing order.
pub fn same_lap_gaps(laps: &[TimedLap]) -> Vec<LapGap> {
  let mut groups: BTreeMap<u32, Vec<&TimedLap>> = BTreeMap::new();
  for lap in laps {
    groups.entry(lap.lap).or_default().push(lap);
  }

  let mut gaps = Vec::with_capacity(laps.len());
  for (_, mut group) in groups {
    group.sort_by(|a, b| a.clock_time.cmp(&b.clock_time));
    let mut previous: Option<&ClockTime> = None;
    for lap in group {
      let gap = previous.map_or(0.0, |earlier| lap.clock_time.seconds_since(earlier));
      gaps.push(LapGap { driver: lap.driver.clone(),
                         lap: lap.lap,
                         clock_time: lap.clock_time,
                         speed_trap: lap.speed_trap,
                         gap });
      previous = Some(&lap.clock_time);
    }
  }
  gaps
}

/// Speed trap reading of each driver's next lap, keyed by driver and lap.
///
/// "Next" is the next lap in ascending lap order of that driver, so with laps
/// 1, 2, 4 the next lap of 2 is 4. A driver's last lap, and laps whose next
/// lap has no reading, get no entry.
pub fn next_lap_speeds(laps: &[TimedLap]) -> HashMap<(DriverKey, u32), f64> {
  let mut by_driver: HashMap<&DriverKey, Vec<&TimedLap>> = HashMap::new();
  for lap in laps {
    by_driver.entry(&lap.driver).or_default().push(lap);
  }

  let mut next = HashMap::new();
  for (driver, mut driver_laps) in by_driver {
    driver_laps.sort_by_key(|lap| lap.lap);
    for pair in driver_laps.windows(2) {
      if let Some(speed) = pair[1].speed_trap {
        next.insert((driver.clone(), pair[0].lap), speed);
      }
    }
  }
  next
}


/// Same-lap gap of a car together with its speed trap reading on the next
/// lap, the pair looked at when asking how much a tow is worth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
  pub driver:          DriverKey,
  pub lap:             u32,
  pub clock_time:      ClockTime,
  pub speed_trap:      Option<f64>,
  pub gap:             f64,
  pub speed_trap_next: f64,
}

/// Joins `same_lap_gaps` and `next_lap_speeds` on driver and lap. Laps
/// without a next lap speed are dropped. Records are ordered driver by driver
/// in order of appearance, each driver by lap.
pub fn gap_records(rows: &[RawTimingRow], policy: &MarkerPolicy) -> Vec<GapRecord> {
  let laps = timed_laps(rows, policy);
  let next = next_lap_speeds(&laps);

  let mut order: HashMap<&DriverKey, usize> = HashMap::new();
  for lap in &laps {
    let position = order.len();
    order.entry(&lap.driver).or_insert(position);
  }

  let mut records = same_lap_gaps(&laps).into_iter()
                                        .filter_map(|gap| {
                                          let key = (gap.driver.clone(), gap.lap);
                                          next.get(&key).map(|&speed_trap_next| {
                                            GapRecord { driver: gap.driver,
                                                        lap: gap.lap,
                                                        clock_time: gap.clock_time,
                                                        speed_trap: gap.speed_trap,
                                                        gap: gap.gap,
                                                        speed_trap_next }
                                          })
                                        })
                                        .collect::<Vec<_>>();
  records.sort_by(|a, b| {
           let rank = |driver: &DriverKey| order.get(driver).copied().unwrap_or(usize::MAX);
           rank(&a.driver).cmp(&rank(&b.driver))
                          .then(a.lap.cmp(&b.lap))
                          .then(a.clock_time.cmp(&b.clock_time))
         });

  info!("derived {} gap records from {} timed laps", records.len(), laps.len());
  records
}

/// Keeps the records with a gap strictly larger than `limit`, i.e. drops the
/// laps run in someone's slipstream.
pub fn filter_gap(records: &[GapRecord], limit: f64) -> Vec<GapRecord> {
  records.iter().filter(|record| record.gap > limit).cloned().collect()
}

/// Keeps the records whose next-lap speed trap reading is strictly above
/// `min`, dropping laps followed by a lift or a pit lap.
pub fn filter_speed_next(records: &[GapRecord], min: f64) -> Vec<GapRecord> {
  records.iter().filter(|record| record.speed_trap_next > min).cloned().collect()
}

/// Lap numbers per driver present in `records`, for `DriverInfo::retain_laps`.
pub fn valid_laps_from_gaps(records: &[GapRecord]) -> HashMap<DriverKey, HashSet<u32>> {
  let mut valid: HashMap<DriverKey, HashSet<u32>> = HashMap::new();
  for record in records {
    valid.entry(record.driver.clone()).or_default().insert(record.lap);
  }
  valid
}


/// Lap time of a driver compared to the reference driver on the same lap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGap {
  pub driver:            DriverKey,
  pub lap:               Option<u32>,
  pub lap_seconds:       Option<f64>,
  pub reference_seconds: Option<f64>,
  /// Positive if slower than the reference.
  pub gap:               Option<f64>,
}

/// Lap by lap difference of every lap in `table` to the lap of `reference`
/// with the same number. Laps the reference didn't run, or didn't get a time
/// on, have no gap.
///
/// Fails with `TimingError::UnknownDriver` if `table` has laps but none of
/// `reference`.
pub fn gap_to_reference(table: &CompleteLapTable, reference: &DriverKey)
                        -> Result<Vec<ReferenceGap>> {
  if table.is_empty() {
    return Ok(Vec::new());
  }
  if table.driver_rows(reference).next().is_none() {
    timing_err!(TimingError::UnknownDriver(reference.to_string()));
  }

  let mut reference_laps: HashMap<u32, Option<f64>> = HashMap::new();
  for row in table.driver_rows(reference) {
    if let Some(lap) = row.lap {
      reference_laps.entry(lap).or_insert(row.lap_seconds);
    }
  }

  Ok(table.rows()
          .iter()
          .map(|row| {
            let reference_seconds = row.lap
                                       .and_then(|lap| reference_laps.get(&lap).copied())
                                       .flatten();
            let gap = match (row.lap_seconds, reference_seconds) {
              (Some(own), Some(theirs)) => Some(own - theirs),
              _ => None,
            };
            ReferenceGap { driver: row.driver.clone(),
                           lap: row.lap,
                           lap_seconds: row.lap_seconds,
                           reference_seconds,
                           gap }
          })
          .collect())
}

/// Largest absolute gap of each driver to the reference, handy for scaling
/// a per-driver chart. Drivers without a single gap are left out.
pub fn max_abs_gap(gaps: &[ReferenceGap]) -> Vec<(DriverKey, f64)> {
  let mut max: Vec<(DriverKey, f64)> = Vec::new();
  for gap in gaps {
    if let Some(value) = gap.gap.map(f64::abs) {
      match max.iter_mut().find(|(driver, _)| driver == &gap.driver) {
        Some((_, current)) => {
          if value > *current {
            *current = value;
          }
        }
        None => max.push((gap.driver.clone(), value)),
      }
    }
  }
  max
}
