// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};


/// Separator between car number and driver name in a key.
pub const KEY_SEPARATOR: &str = " - ";


/// Normalized driver identity, `"<car number> - <driver name>"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverKey(String);

impl DriverKey {
  pub fn new<S: Into<String>>(key: S) -> Self {
    Self(key.into())
  }

  /// Builds the key from the text of a marker row: every occurrence of each
  /// suffix is removed in the given order (so the most specific suffix must
  /// come first), the rest is trimmed and title-cased.
  pub fn from_marker<S: AsRef<str>>(text: &str, suffixes: &[S]) -> Self {
    let stripped = suffixes.iter()
                           .fold(text.to_string(), |acc, suffix| {
                             acc.replace(suffix.as_ref(), "")
                           });
    Self(title_case(stripped.trim()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Integer prefix of the key, if there is one.
  pub fn car_number(&self) -> Option<u32> {
    self.numeral().parse().ok()
  }

  /// Everything in front of the first separator, verbatim.
  pub fn numeral(&self) -> &str {
    self.0.split(KEY_SEPARATOR).next().unwrap_or("").trim()
  }

  pub fn driver_name(&self) -> &str {
    match self.0.find(KEY_SEPARATOR) {
      Some(idx) => self.0[idx + KEY_SEPARATOR.len()..].trim(),
      None => &self.0,
    }
  }

  /// Orders keys by car number, keys without a numeric prefix last.
  pub fn cmp_by_car_number(&self, other: &Self) -> Ordering {
    match (self.car_number(), other.car_number()) {
      (Some(a), Some(b)) => a.cmp(&b),
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => Ordering::Equal,
    }
  }
}

impl fmt::Display for DriverKey {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for DriverKey {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl From<&str> for DriverKey {
  fn from(key: &str) -> Self {
    Self::new(key)
  }
}


/// Upper-cases the first letter of every run of letters and lower-cases the
/// rest, `"44 - JOHN o'neil"` becomes `"44 - John O'Neil"`.
fn title_case(text: &str) -> String {
  let mut result = String::with_capacity(text.len());
  let mut in_word = false;
  for c in text.chars() {
    if c.is_alphabetic() {
      if in_word {
        result.extend(c.to_lowercase());
      } else {
        result.extend(c.to_uppercase());
      }
      in_word = true;
    } else {
      result.push(c);
      in_word = false;
    }
  }
  result
}
