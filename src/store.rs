// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{gap::{GapRecord, ReferenceGap},
            ranking::LapRanking,
            results::{BestLapResult, RaceResult},
            speed::{RaisingAverage, SpeedMatrix, SpeedRank, SpeedSummary},
            CompleteLapTable,
            DriverInfo,
            SessionKind};
use chrono::{Local, NaiveDateTime};
use eyre::{ensure, eyre, Result, WrapErr};
use getset::{CopyGetters, Getters};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet,
          fs,
          path::{Path, PathBuf}};
use uuid::Uuid;


const META_FILE: &str = "meta.json";


/// The shapes of table a session is stored as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
  DriverInfo,
  BestLaps,
  RaceResult,
  SpeedRanking,
  SpeedMatrix,
  SpeedSummary,
  RaisingAverage,
  SameLapGaps,
  ReferenceGaps,
  LapRanking,
  CompleteLaps,
}

impl TableKind {
  pub fn name(self) -> &'static str {
    match self {
      TableKind::DriverInfo => "driver_info",
      TableKind::BestLaps => "best_laps",
      TableKind::RaceResult => "race_result",
      TableKind::SpeedRanking => "speed_ranking",
      TableKind::SpeedMatrix => "speed_matrix",
      TableKind::SpeedSummary => "speed_summary",
      TableKind::RaisingAverage => "raising_average",
      TableKind::SameLapGaps => "same_lap_gaps",
      TableKind::ReferenceGaps => "reference_gaps",
      TableKind::LapRanking => "lap_ranking",
      TableKind::CompleteLaps => "complete_laps",
    }
  }

  fn file_name(self) -> String {
    format!("{}.json", self.name())
  }
}


/// A derived table together with its kind. Serialized with an explicit
/// `kind` tag next to the `rows`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum StoredTable {
  DriverInfo(DriverInfo),
  BestLaps(Vec<BestLapResult>),
  RaceResult(Vec<RaceResult>),
  SpeedRanking(Vec<SpeedRank>),
  SpeedMatrix(SpeedMatrix),
  SpeedSummary(Vec<SpeedSummary>),
  RaisingAverage(Vec<RaisingAverage>),
  SameLapGaps(Vec<GapRecord>),
  ReferenceGaps(Vec<ReferenceGap>),
  LapRanking(Vec<LapRanking>),
  CompleteLaps(CompleteLapTable),
}

impl StoredTable {
  pub fn kind(&self) -> TableKind {
    match self {
      StoredTable::DriverInfo(_) => TableKind::DriverInfo,
      StoredTable::BestLaps(_) => TableKind::BestLaps,
      StoredTable::RaceResult(_) => TableKind::RaceResult,
      StoredTable::SpeedRanking(_) => TableKind::SpeedRanking,
      StoredTable::SpeedMatrix(_) => TableKind::SpeedMatrix,
      StoredTable::SpeedSummary(_) => TableKind::SpeedSummary,
      StoredTable::RaisingAverage(_) => TableKind::RaisingAverage,
      StoredTable::SameLapGaps(_) => TableKind::SameLapGaps,
      StoredTable::ReferenceGaps(_) => TableKind::ReferenceGaps,
      StoredTable::LapRanking(_) => TableKind::LapRanking,
      StoredTable::CompleteLaps(_) => TableKind::CompleteLaps,
    }
  }
}


/// What the caller knows about a session before it is stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
  pub event:        String,
  /// ISO date, e.g. `2024-08-11`.
  pub date:         String,
  pub circuit:      String,
  /// Free text, e.g. `Q1` or `Race 2`.
  pub session_type: String,
  pub notes:        String,
  pub kind:         SessionKind,
  /// Name of the timing export the tables were derived from.
  pub filename:     String,
}

/// A stored session as listed by a `SessionStore`.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize, Deserialize)]
pub struct SessionMeta {
  #[getset(get = "pub")]
  id:           String,
  #[getset(get = "pub")]
  event:        String,
  #[getset(get = "pub")]
  date:         String,
  #[getset(get = "pub")]
  circuit:      String,
  #[getset(get = "pub")]
  session_type: String,
  #[getset(get = "pub")]
  notes:        String,
  #[getset(get_copy = "pub")]
  kind:         SessionKind,
  #[getset(get = "pub")]
  filename:     String,
  #[getset(get_copy = "pub")]
  created_at:   NaiveDateTime,
  #[getset(get = "pub")]
  tables:       Vec<TableKind>,
}

impl SessionMeta {
  fn new(id: String, session: NewSession, tables: Vec<TableKind>) -> Self {
    Self { id,
           event: session.event,
           date: session.date,
           circuit: session.circuit,
           session_type: session.session_type,
           notes: session.notes,
           kind: session.kind,
           filename: session.filename,
           created_at: Local::now().naive_local(),
           tables }
  }
}


/// Narrows down `SessionStore::list`. Text fields match as substrings,
/// case-insensitive; `None` matches everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionFilter {
  pub event:   Option<String>,
  pub year:    Option<String>,
  pub circuit: Option<String>,
  pub kind:    Option<SessionKind>,
}

impl SessionFilter {
  pub fn matches(&self, meta: &SessionMeta) -> bool {
    let contains = |haystack: &str, needle: &Option<String>| match needle {
      Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
      None => true,
    };
    contains(&meta.event, &self.event)
    && contains(&meta.date, &self.year)
    && contains(&meta.circuit, &self.circuit)
    && self.kind.map_or(true, |kind| kind == meta.kind)
  }
}


#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
  pub sessions: usize,
  pub practice: usize,
  pub race:     usize,
  pub events:   usize,
  pub circuits: usize,
}


/// Persistence of analysed sessions.
pub trait SessionStore {
  /// Stores `tables` under a new session and returns its id.
  fn save(&self, session: NewSession, tables: &[StoredTable]) -> Result<String>;
  /// Sessions passing `filter`, newest first.
  fn list(&self, filter: &SessionFilter) -> Result<Vec<SessionMeta>>;
  fn load(&self, id: &str) -> Result<(SessionMeta, Vec<StoredTable>)>;
  fn delete(&self, id: &str) -> Result<()>;
  fn stats(&self) -> Result<StoreStats>;
}


/// Stores each session in a directory of its own below `root`, holding a
/// `meta.json` and one JSON file per table.
#[derive(Clone, Debug, PartialEq, Getters)]
pub struct JsonDirStore {
  #[getset(get = "pub")]
  root: PathBuf,
}

impl JsonDirStore {
  /// Opens the store at `root`, creating the directory if needed.
  pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    fs::create_dir_all(&root).wrap_err_with(|| {
                               format!("could not create store at {}", root.display())
                             })?;
    Ok(Self { root })
  }

  fn session_dir(&self, id: &str) -> Result<PathBuf> {
    ensure!(Uuid::parse_str(id).is_ok(), "invalid session id '{}'", id);
    Ok(self.root.join(id))
  }

  fn read_meta(dir: &Path) -> Result<SessionMeta> {
    let path = dir.join(META_FILE);
    let json = fs::read_to_string(&path).wrap_err_with(|| {
                                          format!("could not read {}", path.display())
                                        })?;
    serde_json::from_str(&json).wrap_err_with(|| format!("corrupt {}", path.display()))
  }

  fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).wrap_err_with(|| format!("could not write {}", path.display()))
  }

  /// Writes the tables and then `meta.json` into `dir`. On failure `dir` is
  /// removed again.
  fn write_session(dir: &Path, meta: &SessionMeta, tables: &[StoredTable]) -> Result<()> {
    // meta goes last, a session without it is never listed
    let written = tables.iter()
                        .try_for_each(|table| {
                          Self::write_json(&dir.join(table.kind().file_name()), table)
                        })
                        .and_then(|_| Self::write_json(&dir.join(META_FILE), meta));
    if written.is_err() {
      if let Err(e) = fs::remove_dir_all(dir) {
        warn!("could not remove {}: {}", dir.display(), e);
      }
    }
    written
  }

  fn all(&self) -> Result<Vec<SessionMeta>> {
    let mut sessions = Vec::new();
    for entry in fs::read_dir(&self.root)? {
      let path = entry?.path();
      if !path.is_dir() {
        continue;
      }
      match Self::read_meta(&path) {
        Ok(meta) => sessions.push(meta),
        Err(e) => warn!("skipping {}: {:#}", path.display(), e),
      }
    }
    Ok(sessions)
  }
}

impl SessionStore for JsonDirStore {
  fn save(&self, session: NewSession, tables: &[StoredTable]) -> Result<String> {
    let mut kinds = Vec::with_capacity(tables.len());
    for table in tables {
      let kind = table.kind();
      ensure!(!kinds.contains(&kind),
              "table '{}' given twice for one session",
              kind.name());
      kinds.push(kind);
    }

    let id = Uuid::new_v4().to_string();
    let dir = self.session_dir(&id)?;
    fs::create_dir_all(&dir).wrap_err_with(|| {
                              format!("could not create {}", dir.display())
                            })?;
    let meta = SessionMeta::new(id.clone(), session, kinds);
    Self::write_session(&dir, &meta, tables)?;
    info!("stored session {} ({} tables) for '{}'",
          id,
          meta.tables.len(),
          meta.event);
    Ok(id)
  }

  fn list(&self, filter: &SessionFilter) -> Result<Vec<SessionMeta>> {
    let mut sessions = self.all()?
                           .into_iter()
                           .filter(|meta| filter.matches(meta))
                           .collect::<Vec<_>>();
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sessions)
  }

  fn load(&self, id: &str) -> Result<(SessionMeta, Vec<StoredTable>)> {
    let dir = self.session_dir(id)?;
    ensure!(dir.is_dir(), "no session with id '{}'", id);
    let meta = Self::read_meta(&dir)?;

    let mut tables = Vec::with_capacity(meta.tables.len());
    for kind in &meta.tables {
      let path = dir.join(kind.file_name());
      let json = fs::read_to_string(&path).wrap_err_with(|| {
                                            format!("could not read {}", path.display())
                                          })?;
      let table: StoredTable = serde_json::from_str(&json).wrap_err_with(|| {
                                 format!("corrupt {}", path.display())
                               })?;
      if table.kind() != *kind {
        return Err(eyre!("{} holds a {} table", path.display(), table.kind().name()));
      }
      tables.push(table);
    }
    Ok((meta, tables))
  }

  fn delete(&self, id: &str) -> Result<()> {
    let dir = self.session_dir(id)?;
    ensure!(dir.is_dir(), "no session with id '{}'", id);
    fs::remove_dir_all(&dir).wrap_err_with(|| {
                              format!("could not delete {}", dir.display())
                            })?;
    info!("deleted session {}", id);
    Ok(())
  }

  fn stats(&self) -> Result<StoreStats> {
    let sessions = self.all()?;
    let count = |kind: SessionKind| sessions.iter().filter(|meta| meta.kind == kind).count();
    Ok(StoreStats { sessions: sessions.len(),
                    practice: count(SessionKind::Practice),
                    race:     count(SessionKind::Race),
                    events:   distinct(sessions.iter().map(|meta| meta.event.as_str())),
                    circuits: distinct(sessions.iter().map(|meta| meta.circuit.as_str())) })
  }
}


/// Number of distinct non-empty values.
fn distinct<'a, I: Iterator<Item = &'a str>>(values: I) -> usize {
  values.map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<HashSet<_>>()
        .len()
}
