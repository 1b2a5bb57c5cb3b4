// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::DriverKey;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;


/// Manufacturer label of drivers missing from the roster.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";


#[derive(Clone, Debug, Default, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct RosterEntry {
  manufacturer: String,
  #[serde(default)]
  team:         Option<String>,
}

impl RosterEntry {
  pub fn new(manufacturer: &str, team: Option<&str>) -> Self {
    Self { manufacturer: manufacturer.to_string(),
           team:         team.map(str::to_string) }
  }
}


/// Which car and team every driver of the grid belongs to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
  entries: HashMap<DriverKey, RosterEntry>,
}

impl Roster {
  pub fn insert(&mut self, driver: DriverKey, entry: RosterEntry) {
    self.entries.insert(driver, entry);
  }

  pub fn with(mut self, driver: &str, manufacturer: &str, team: Option<&str>)
              -> Self {
    self.insert(DriverKey::new(driver), RosterEntry::new(manufacturer, team));
    self
  }

  pub fn manufacturer(&self, driver: &DriverKey) -> &str {
    self.entries
        .get(driver)
        .map(|entry| entry.manufacturer.as_str())
        .unwrap_or(UNKNOWN_MANUFACTURER)
  }

  pub fn team(&self, driver: &DriverKey) -> Option<&str> {
    self.entries.get(driver).and_then(|entry| entry.team.as_deref())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn roster_test() {
    let roster = Roster::default().with("44 - John Doe", "Chevrolet", Some("Blue"))
                                  .with("7 - Jane Roe", "Toyota", None);

    assert_eq!("Chevrolet", roster.manufacturer(&"44 - John Doe".into()));
    assert_eq!(Some("Blue"), roster.team(&"44 - John Doe".into()));
    assert_eq!(None, roster.team(&"7 - Jane Roe".into()));
    assert_eq!(UNKNOWN_MANUFACTURER, roster.manufacturer(&"1 - Nobody".into()));
    assert_eq!(None, roster.team(&"1 - Nobody".into()));
  }

  #[test]
  fn roster_json_test() {
    let json = r#"{
      "44 - John Doe": { "manufacturer": "Chevrolet", "team": "Blue" },
      "7 - Jane Roe": { "manufacturer": "Toyota" }
    }"#;
    let roster: Roster = serde_json::from_str(json).unwrap();
    assert_eq!(2, roster.len());
    assert_eq!("Toyota", roster.manufacturer(&"7 - Jane Roe".into()));
    assert_eq!(None, roster.team(&"7 - Jane Roe".into()));
  }
}
