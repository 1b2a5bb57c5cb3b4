// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{gap, ranking, read_rows, results, segment_counted, speed,
            CompleteLapTable, Config, DriverInfo, DriverKey, GapRecord, Grouping,
            RawTimingRow, ReferenceGap, Result, StoredTable, TimeColumn};
use getset::{CopyGetters, Getters};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fmt, fs::File, io, path::Path};


/// Practice (incl. qualifying) or race. Decides which tables are derived and
/// which outlier margin applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
  #[serde(rename = "Treino")]
  Practice,
  #[serde(rename = "Corrida")]
  Race,
}

impl fmt::Display for SessionKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      SessionKind::Practice => write!(f, "Treino"),
      SessionKind::Race => write!(f, "Corrida"),
    }
  }
}


/// A timing export read, normalized and segmented, ready for deriving
/// tables.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct Session {
  #[getset(get = "pub")]
  config:    Config,
  #[getset(get = "pub")]
  rows:      Vec<RawTimingRow>,
  #[getset(get = "pub")]
  info:      DriverInfo,
  #[getset(get = "pub")]
  complete:  CompleteLapTable,
  /// Lap rows that did not end up in any driver's table.
  #[getset(get_copy = "pub")]
  discarded: usize,
}

impl Session {
  /// Reads a timing export and segments it. Stops at the first schema or
  /// segmentation error, nothing of a broken export is kept.
  pub fn from_reader<R: io::Read>(reader: R, config: &Config) -> Result<Self> {
    Self::from_rows(read_rows(reader)?, config)
  }

  pub fn from_path(path: &Path, config: &Config) -> Result<Self> {
    info!("loading session from {}", path.display());
    Self::from_reader(File::open(path)?, config)
  }

  pub fn from_rows(rows: Vec<RawTimingRow>, config: &Config) -> Result<Self> {
    let (info, discarded) = segment_counted(&rows, &config.marker_policy())?;
    let complete = CompleteLapTable::build(&info, config.roster());
    Ok(Self { config: config.clone(),
              rows,
              info,
              complete,
              discarded })
  }

  pub fn best_lap_results(&self) -> Vec<results::BestLapResult> {
    results::best_lap_results(&self.info)
  }

  pub fn race_results(&self) -> Vec<results::RaceResult> {
    results::race_results(&self.info, self.config.roster())
  }

  /// Speed trap ranking cut to the configured length.
  pub fn speed_ranking(&self) -> Vec<speed::SpeedRank> {
    speed::speed_ranking(&self.info,
                         self.config.roster(),
                         self.config.speed_ranking_top_n())
  }

  pub fn speed_matrix(&self) -> speed::SpeedMatrix {
    speed::speed_matrix(&self.info)
  }

  pub fn speed_matrix_numeral(&self) -> speed::SpeedMatrix {
    speed::speed_matrix_numeral(&self.info)
  }

  pub fn raising_average(&self) -> Vec<speed::RaisingAverage> {
    speed::raising_average(&self.info)
  }

  pub fn speed_summary(&self) -> Vec<speed::SpeedSummary> {
    speed::speed_summary(&self.info, self.config.roster())
  }

  pub fn top_speed(&self, order: speed::SpeedOrder) -> Vec<speed::TopSpeed> {
    speed::top_speed(&self.info, order)
  }

  pub fn speed_distribution(&self) -> Vec<speed::SpeedSample> {
    speed::speed_distribution(&self.info, self.config.roster())
  }

  pub fn gap_records(&self) -> Vec<GapRecord> {
    gap::gap_records(&self.rows, &self.config.marker_policy())
  }

  pub fn gap_to_reference(&self, reference: &DriverKey) -> Result<Vec<ReferenceGap>> {
    gap::gap_to_reference(&self.complete, reference)
  }

  pub fn ranking_by_lap(&self) -> Vec<ranking::LapRanking> {
    ranking::ranking_by_lap(&self.complete)
  }

  /// Laps of the session with outliers removed, using the practice or race
  /// margin from the config depending on `kind`.
  pub fn filtered_laps(&self,
                       kind: SessionKind,
                       column: TimeColumn,
                       grouping: Grouping)
                       -> CompleteLapTable {
    let multiplier = match kind {
      SessionKind::Practice => self.config.outlier_multiplier(),
      SessionKind::Race => self.config.race_outlier_multiplier(),
    };
    self.complete.filter_outliers(column, grouping, multiplier)
  }

  /// Driver tables holding only the laps whose same-lap gap exceeds
  /// `limit`, i.e. the speed trap readings taken in clean air.
  pub fn clean_air(&self, limit: f64) -> DriverInfo {
    let records = gap::filter_gap(&self.gap_records(), limit);
    info!("{} laps with a gap over {:.1}s", records.len(), limit);
    self.info.retain_laps(&gap::valid_laps_from_gaps(&records))
  }

  /// Everything that is stored for a session of `kind`. Race sessions get
  /// their reference gaps measured against the winner.
  pub fn tables(&self, kind: SessionKind) -> Vec<StoredTable> {
    let mut tables = vec![StoredTable::DriverInfo(self.info.clone())];
    match kind {
      SessionKind::Practice => {
        tables.push(StoredTable::BestLaps(self.best_lap_results()));
      }
      SessionKind::Race => {
        let race = self.race_results();
        if let Some(winner) = race.first() {
          if let Ok(gaps) = self.gap_to_reference(&winner.driver) {
            tables.push(StoredTable::ReferenceGaps(gaps));
          }
        }
        tables.push(StoredTable::RaceResult(race));
        tables.push(StoredTable::SameLapGaps(self.gap_records()));
        tables.push(StoredTable::LapRanking(self.ranking_by_lap()));
      }
    }
    tables.push(StoredTable::SpeedRanking(self.speed_ranking()));
    tables.push(StoredTable::SpeedMatrix(self.speed_matrix()));
    tables.push(StoredTable::SpeedSummary(self.speed_summary()));
    tables.push(StoredTable::RaisingAverage(self.raising_average()));
    tables.push(StoredTable::CompleteLaps(self.complete.clone()));
    tables
  }
}
