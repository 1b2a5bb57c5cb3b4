// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

#[macro_use]
mod error;

mod columns;
mod complete;
mod config;
mod driver;
mod export;
mod gap;
mod lap;
mod outlier;
mod ranking;
mod results;
mod roster;
mod row;
mod segment;
mod session;
mod speed;
mod store;
mod time;

pub use columns::{Column, ColumnMap};
pub use complete::{CompleteLap, CompleteLapTable};
pub use config::Config;
pub use driver::{DriverKey, KEY_SEPARATOR};
pub use error::{Result, TimingError};
pub use export::{write_csv, write_matrix};
pub use gap::{filter_gap, filter_speed_next, gap_records, gap_to_reference, max_abs_gap,
              next_lap_speeds, same_lap_gaps, timed_laps, valid_laps_from_gaps,
              GapRecord, LapGap, ReferenceGap, TimedLap};
pub use lap::{DriverLapTable, LapRecord};
pub use outlier::{filter_outliers, Grouping, TimeColumn};
pub use ranking::{driver_positions, ranking_by_lap, LapRanking};
pub use results::{best_lap_results, race_results, BestLapResult, RaceResult};
pub use roster::{Roster, RosterEntry, UNKNOWN_MANUFACTURER};
pub use row::{read_rows, RawTimingRow};
pub use segment::{segment, segment_counted, DriverEntry, DriverInfo, MarkerPolicy,
                  RowKind, DRIVER_SUFFIXES, MARKER_SENTINEL};
pub use session::{Session, SessionKind};
pub use speed::{raising_average, speed_distribution, speed_matrix,
                speed_matrix_numeral, speed_ranking, speed_summary, top_speed,
                RaisingAverage, SpeedMatrix, SpeedOrder, SpeedRank, SpeedSample,
                SpeedSummary, TopSpeed};
pub use store::{JsonDirStore, NewSession, SessionFilter, SessionMeta, SessionStore,
                StoreStats, StoredTable, TableKind};
pub use time::{format_time, parse_speed, parse_time, ClockTime};
