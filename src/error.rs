// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use serde::{Deserialize, Serialize};
use std::{error, fmt, io, result};


/// lapsheet's result type `Result` carries a `TimingError` on failure.
pub type Result<T> = result::Result<T, TimingError>;


/// Everything that can go wrong between reading a timing export and handing
/// the derived tables on.
///
/// `Schema` and `EmptySegmentation` are fatal for a session: the pipeline
/// stops and no table of that session is published. `Parse` is only ever
/// returned by the strict parsers (e.g. `ClockTime::from_str`), the lenient
/// ones used by the derivations map bad fields to `None` instead.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum TimingError {
  /// Required columns missing after aliasing, listed by canonical name.
  Schema { missing: Vec<String> },
  /// A single field could not be parsed.
  Parse { field: String, value: String },
  /// The export was readable but did not contain a single driver marker.
  EmptySegmentation,
  /// Reference to a driver that is not part of the session.
  UnknownDriver(String),
  Csv(String),
  Io(String),
  Json(String),
}

impl fmt::Display for TimingError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      TimingError::Schema { missing } => {
        write!(f, "missing required columns: {}", missing.join(", "))
      }
      TimingError::Parse { field, value } => {
        write!(f, "could not parse {} from '{}'", field, value)
      }
      TimingError::EmptySegmentation => {
        write!(f, "no driver marker rows found in timing export")
      }
      TimingError::UnknownDriver(key) => write!(f, "unknown driver '{}'", key),
      TimingError::Csv(msg) => write!(f, "csv error: {}", msg),
      TimingError::Io(msg) => write!(f, "io error: {}", msg),
      TimingError::Json(msg) => write!(f, "json error: {}", msg),
    }
  }
}

impl error::Error for TimingError {}


/// This macro - internal use only - generates the implementation of the
/// `From` trait for `TimingError` for a given list of types and the variant
/// they end up in.
macro_rules! implement_from {
  ($($ErrType:ty => $Variant:ident),*) => {$(
    impl From<$ErrType> for TimingError {
      fn from(error: $ErrType) -> Self {
        TimingError::$Variant(error.to_string())
      }
    }
  )*}
}

// here the macro is called with the foreign error types used in our codebase
implement_from!(csv::Error => Csv,
                io::Error => Io,
                serde_json::Error => Json);


/// The `timing_err!` macro returns early with an `Err(TimingError)` built
/// from the given variant expression. Use it like so:
///
/// ```ignore
/// if missing.is_empty() { return Ok(map) }
/// timing_err!(TimingError::Schema { missing })
/// ```
#[macro_export]
macro_rules! timing_err {
  ($err:expr) => {
    return Err($err)
  };
}
