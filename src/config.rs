// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{segment::{DRIVER_SUFFIXES, MARKER_SENTINEL},
            MarkerPolicy,
            Result,
            Roster};
use getset::{CopyGetters, Getters};
use serde::Deserialize;
use std::{fs, path::Path};


/// Knobs of the derivation pipeline. Every field has a default, so a config
/// file only needs to carry what differs.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Deserialize)]
#[serde(default)]
pub struct Config {
  #[getset(get = "pub")]
  marker_sentinel:         String,
  #[getset(get = "pub")]
  driver_suffixes:         Vec<String>,
  #[getset(get_copy = "pub")]
  speed_ranking_top_n:     usize,
  /// Margin above the best time, e.g. `0.02` for 2%.
  #[getset(get_copy = "pub")]
  outlier_margin:          f64,
  #[getset(get_copy = "pub")]
  race_outlier_multiplier: f64,
  #[getset(get = "pub")]
  roster:                  Roster,
}

impl Default for Config {
  fn default() -> Self {
    Self { marker_sentinel:         MARKER_SENTINEL.to_string(),
           driver_suffixes:         DRIVER_SUFFIXES.iter()
                                                   .map(|s| s.to_string())
                                                   .collect(),
           speed_ranking_top_n:     30,
           outlier_margin:          0.02,
           race_outlier_multiplier: 1.05,
           roster:                  Roster::default() }
  }
}

impl Config {
  pub fn load(path: &Path) -> Result<Self> {
    Self::from_json(&fs::read_to_string(path)?)
  }

  pub fn from_json(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn with_roster(mut self, roster: Roster) -> Self {
    self.roster = roster;
    self
  }

  /// Multiplier for the practice outlier filter, `1 + outlier_margin`.
  pub fn outlier_multiplier(&self) -> f64 {
    1.0 + self.outlier_margin
  }

  pub fn marker_policy(&self) -> MarkerPolicy {
    MarkerPolicy::new(&self.marker_sentinel, self.driver_suffixes.clone())
  }
}
