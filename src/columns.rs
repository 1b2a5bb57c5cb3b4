// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Result, TimingError};
use csv::StringRecord;
use lazy_static::lazy_static;
use log::debug;
use std::{collections::HashMap, fmt};


/// Canonical columns of a timing export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
  TimeOfDay,
  Lap,
  LapTime,
  Sector1Time,
  Sector2Time,
  Sector3Time,
  SpeedTrap,
}

impl Column {
  pub const ALL: [Column; 7] = [Column::TimeOfDay,
                                Column::Lap,
                                Column::LapTime,
                                Column::Sector1Time,
                                Column::Sector2Time,
                                Column::Sector3Time,
                                Column::SpeedTrap];

  pub fn name(self) -> &'static str {
    match self {
      Column::TimeOfDay => "TimeOfDay",
      Column::Lap => "Lap",
      Column::LapTime => "LapTime",
      Column::Sector1Time => "Sector1Time",
      Column::Sector2Time => "Sector2Time",
      Column::Sector3Time => "Sector3Time",
      Column::SpeedTrap => "SpeedTrap",
    }
  }

  fn position(self) -> usize {
    Column::ALL.iter()
               .position(|&column| column == self)
               .unwrap_or_default()
  }
}

impl fmt::Display for Column {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}


lazy_static! {
  /// Accepted header spellings, lower-cased, with their priority. Lower
  /// priority wins when a file carries more than one spelling, i.e. `ST`
  /// beats `SPT`.
  static ref HEADER_ALIASES: HashMap<&'static str, (Column, u8)> = {
    let mut aliases = HashMap::new();
    aliases.insert("timeofday", (Column::TimeOfDay, 0));
    aliases.insert("time of day", (Column::TimeOfDay, 0));
    aliases.insert("lap", (Column::Lap, 0));
    aliases.insert("laptime", (Column::LapTime, 0));
    aliases.insert("lap tm", (Column::LapTime, 0));
    aliases.insert("sector1time", (Column::Sector1Time, 0));
    aliases.insert("s1 tm", (Column::Sector1Time, 0));
    aliases.insert("sector2time", (Column::Sector2Time, 0));
    aliases.insert("s2 tm", (Column::Sector2Time, 0));
    aliases.insert("sector3time", (Column::Sector3Time, 0));
    aliases.insert("s3 tm", (Column::Sector3Time, 0));
    aliases.insert("speedtrap", (Column::SpeedTrap, 0));
    aliases.insert("st", (Column::SpeedTrap, 0));
    aliases.insert("spt", (Column::SpeedTrap, 1));
    aliases
  };
}


/// Position of every canonical column within the header of an export.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMap {
  indices: [usize; 7],
}

impl ColumnMap {
  /// Resolves the header record of an export to the canonical schema.
  ///
  /// Matching ignores case and surrounding whitespace. Fails with
  /// `TimingError::Schema` listing every canonical column that could not be
  /// found, including `SpeedTrap` when neither `ST` nor `SPT` is present.
  pub fn normalize(headers: &StringRecord) -> Result<Self> {
    let mut found: [Option<(usize, u8)>; 7] = [None; 7];

    for (idx, header) in headers.iter().enumerate() {
      let header = header.trim().to_lowercase();
      let (column, priority) = match HEADER_ALIASES.get(header.as_str()) {
        Some(&entry) => entry,
        None => continue,
      };
      let slot = &mut found[column.position()];
      match *slot {
        Some((_, existing)) if existing <= priority => {}
        _ => {
          if priority > 0 {
            debug!("using '{}' as {} column", header, column);
          }
          *slot = Some((idx, priority));
        }
      }
    }

    let missing = Column::ALL.iter()
                             .zip(found.iter())
                             .filter(|(_, slot)| slot.is_none())
                             .map(|(column, _)| column.name().to_string())
                             .collect::<Vec<_>>();
    if !missing.is_empty() {
      timing_err!(TimingError::Schema { missing });
    }

    let mut indices = [0; 7];
    for (index, slot) in indices.iter_mut().zip(found.iter()) {
      if let Some((idx, _)) = slot {
        *index = *idx;
      }
    }
    Ok(Self { indices })
  }

  pub fn index(&self, column: Column) -> usize {
    self.indices[column.position()]
  }

  /// Field of `record` in `column`, empty if the record is too short (which
  /// marker rows commonly are).
  pub fn field<'r>(&self, record: &'r StringRecord, column: Column) -> &'r str {
    record.get(self.index(column)).unwrap_or("")
  }
}
