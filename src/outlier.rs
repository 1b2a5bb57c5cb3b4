// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, hash::Hash};


/// Which time of a lap an outlier filter looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeColumn {
  Lap,
  Sector1,
  Sector2,
  Sector3,
}

/// What the best time of a row is compared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grouping {
  Manufacturer,
  Team,
  Ungrouped,
}


/// Keeps the rows whose time is within `multiplier` times the best time of
/// their group.
///
/// Missing times count as `+inf`: they never set a group's best time and
/// fail any finite threshold. A row without a group is measured against
/// `+inf` and therefore always kept. `multiplier` is taken as is, usually it
/// is `1 + margin`.
pub fn filter_outliers<T, K, FT, FG>(rows: &[T],
                                     time: FT,
                                     group: FG,
                                     multiplier: f64)
                                     -> Vec<T>
  where T: Clone,
        K: Eq + Hash,
        FT: Fn(&T) -> Option<f64>,
        FG: Fn(&T) -> Option<K>
{
  let value = |row: &T| time(row).unwrap_or(f64::INFINITY);

  let mut best: HashMap<K, f64> = HashMap::new();
  for row in rows {
    if let Some(key) = group(row) {
      let candidate = value(row);
      let min = best.entry(key).or_insert(f64::INFINITY);
      if candidate < *min {
        *min = candidate;
      }
    }
  }

  rows.iter()
      .filter(|&row| {
        let threshold = group(row).and_then(|key| best.get(&key))
                                  .map_or(f64::INFINITY, |min| min * multiplier);
        value(row) <= threshold
      })
      .cloned()
      .collect()
}
