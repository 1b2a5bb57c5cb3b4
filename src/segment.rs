// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{DriverKey, DriverLapTable, LapRecord, RawTimingRow, Result,
            TimingError};
use getset::Getters;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};


/// Substring of the time-of-day field that marks a row as the start of a new
/// driver's block of laps. It is the series name the timing system writes
/// next to each driver.
pub const MARKER_SENTINEL: &str = "Stock";

/// Series suffixes removed from marker text to get the driver key, most
/// specific first.
pub const DRIVER_SUFFIXES: [&str; 3] = [" - Stock Car PRO 2024",
                                        " - Stock Car Pro Rookie",
                                        " - Stock Car Pro"];


/// What a row of the export is.
#[derive(Clone, Debug, PartialEq)]
pub enum RowKind<'a> {
  Marker(DriverKey),
  LapRow(&'a RawTimingRow),
}


/// Decides which rows are driver markers and how their text becomes a key.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerPolicy {
  sentinel: String,
  suffixes: Vec<String>,
}

impl Default for MarkerPolicy {
  fn default() -> Self {
    Self::new(MARKER_SENTINEL,
              DRIVER_SUFFIXES.iter().map(|s| s.to_string()).collect())
  }
}

impl MarkerPolicy {
  pub fn new(sentinel: &str, suffixes: Vec<String>) -> Self {
    Self { sentinel: sentinel.to_string(),
           suffixes }
  }

  pub fn classify<'a>(&self, row: &'a RawTimingRow) -> RowKind<'a> {
    if row.time_of_day().contains(self.sentinel.as_str()) {
      RowKind::Marker(DriverKey::from_marker(row.time_of_day(), &self.suffixes))
    } else {
      RowKind::LapRow(row)
    }
  }
}


/// One driver with its laps, the serialized form of a `DriverInfo` entry.
#[derive(Clone, Debug, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct DriverEntry {
  driver: DriverKey,
  laps:   DriverLapTable,
}


/// Lap tables of all drivers of a session, in the order their markers first
/// appear in the export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DriverEntry>", into = "Vec<DriverEntry>")]
pub struct DriverInfo {
  entries: Vec<DriverEntry>,
  index:   HashMap<DriverKey, usize>,
}

impl From<Vec<DriverEntry>> for DriverInfo {
  fn from(entries: Vec<DriverEntry>) -> Self {
    let mut info = DriverInfo::default();
    for entry in entries {
      info.insert(entry.driver, entry.laps);
    }
    info
  }
}

impl From<DriverInfo> for Vec<DriverEntry> {
  fn from(info: DriverInfo) -> Self {
    info.entries
  }
}

impl DriverInfo {
  /// Inserts or replaces the table of `driver`. A replaced driver keeps its
  /// original position.
  pub fn insert(&mut self, driver: DriverKey, laps: DriverLapTable) {
    match self.index.get(&driver).copied() {
      Some(idx) => self.entries[idx].laps = laps,
      None => {
        self.index.insert(driver.clone(), self.entries.len());
        self.entries.push(DriverEntry { driver, laps });
      }
    }
  }

  pub fn get(&self, driver: &DriverKey) -> Option<&DriverLapTable> {
    self.index.get(driver).map(|&idx| &self.entries[idx].laps)
  }

  pub fn contains(&self, driver: &DriverKey) -> bool {
    self.index.contains_key(driver)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn drivers(&self) -> impl Iterator<Item = &DriverKey> {
    self.entries.iter().map(|entry| &entry.driver)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&DriverKey, &DriverLapTable)> {
    self.entries.iter().map(|entry| (&entry.driver, &entry.laps))
  }

  /// Number of laps over all drivers.
  pub fn total_laps(&self) -> usize {
    self.entries.iter().map(|entry| entry.laps.len()).sum()
  }

  /// New `DriverInfo` holding only the laps listed in `valid` per driver.
  /// Drivers without an entry in `valid` are left out entirely.
  pub fn retain_laps(&self, valid: &HashMap<DriverKey, HashSet<u32>>) -> Self {
    let mut retained = DriverInfo::default();
    for (driver, laps) in self.iter() {
      if let Some(valid_laps) = valid.get(driver) {
        retained.insert(driver.clone(), laps.retain_laps(valid_laps));
      }
    }
    retained
  }
}


/// Splits the rows of an export into per-driver lap tables.
///
/// Rows before the first marker are discarded. A marker for a driver that
/// was already seen starts that driver's table over, the laps of the earlier
/// block are dropped. Fails with `TimingError::EmptySegmentation` if there is
/// no marker at all.
pub fn segment(rows: &[RawTimingRow], policy: &MarkerPolicy)
               -> Result<DriverInfo> {
  segment_counted(rows, policy).map(|(info, _)| info)
}

/// Same as `segment`, also returning how many lap rows were discarded, be it
/// for preceding every marker or for being replaced by a repeated marker.
pub fn segment_counted(rows: &[RawTimingRow],
                       policy: &MarkerPolicy)
                       -> Result<(DriverInfo, usize)> {
  let (blocks, discarded) =
    accumulate_by_driver(rows, policy, |row| Some(LapRecord::from_row(row)));

  if blocks.is_empty() {
    timing_err!(TimingError::EmptySegmentation);
  }

  let mut info = DriverInfo::default();
  for (driver, laps) in blocks {
    info.insert(driver, DriverLapTable::new(laps));
  }
  info!("segmented {} drivers with {} laps, {} rows discarded",
        info.len(),
        info.total_laps(),
        discarded);
  Ok((info, discarded))
}

/// Walks the rows once, collecting what `extract` makes of every lap row
/// into the block of the driver whose marker came last. Rows `extract`
/// rejects are skipped silently; rows before the first marker and rows of a
/// block restarted by a repeated marker are counted as discarded.
pub(crate) fn accumulate_by_driver<T, F>(rows: &[RawTimingRow],
                                         policy: &MarkerPolicy,
                                         extract: F)
                                         -> (Vec<(DriverKey, Vec<T>)>, usize)
  where F: Fn(&RawTimingRow) -> Option<T>
{
  let mut blocks: Vec<(DriverKey, Vec<T>)> = Vec::new();
  let mut positions: HashMap<DriverKey, usize> = HashMap::new();
  let mut current: Option<usize> = None;
  let mut discarded = 0;

  for row in rows {
    match policy.classify(row) {
      RowKind::Marker(driver) => {
        let seen = positions.get(&driver).copied();
        let idx = match seen {
          Some(idx) => {
            let dropped = blocks[idx].1.len();
            debug!("repeated marker for '{}', dropping {} rows",
                   driver,
                   dropped);
            discarded += dropped;
            blocks[idx].1.clear();
            idx
          }
          None => {
            positions.insert(driver.clone(), blocks.len());
            blocks.push((driver, Vec::new()));
            blocks.len() - 1
          }
        };
        current = Some(idx);
      }
      RowKind::LapRow(row) => match current {
        Some(idx) => {
          if let Some(item) = extract(row) {
            blocks[idx].1.push(item);
          }
        }
        None => discarded += 1,
      },
    }
  }

  (blocks, discarded)
}
