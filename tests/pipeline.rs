// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use lapsheet::{filter_gap, write_csv, Config, DriverKey, Grouping, JsonDirStore,
               NewSession, Session, SessionFilter, SessionKind, SessionStore,
               SpeedOrder, StoredTable, TimeColumn, TimingError};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};


fn testdata(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn config() -> Config {
  Config::from_json(r#"{
    "speed_ranking_top_n": 4,
    "roster": {
      "44 - John Doe": { "manufacturer": "Chevrolet", "team": "Blue Racing" },
      "7 - Jane Roe": { "manufacturer": "Toyota" },
      "10 - Ricardo Zonta": { "manufacturer": "Toyota", "team": "Red Racing" }
    }
  }"#).unwrap()
}

fn close_to(expected: f64, actual: f64) -> bool {
  (expected - actual).abs() < 1e-9
}


#[test]
fn practice_session() {
  let session = Session::from_path(&testdata("practice.csv"), &config()).unwrap();

  assert_eq!(vec!["44 - John Doe", "7 - Jane Roe"],
             session.info().drivers().map(|d| d.as_str()).collect::<Vec<_>>());
  for (_, laps) in session.info().iter() {
    assert_eq!(3, laps.len());
  }
  // 2 rows before the first marker, 6 laps
  assert_eq!(2, session.discarded());
  assert_eq!(8, session.info().total_laps() + session.discarded());

  let best = session.best_lap_results();
  assert_eq!(2, best.len());
  assert_eq!((1, "44 - John Doe", "1:31.120"),
             (best[0].position, best[0].driver.as_str(), best[0].best_lap.as_str()));
  assert_eq!((2, "7 - Jane Roe", "1:31.500"),
             (best[1].position, best[1].driver.as_str(), best[1].best_lap.as_str()));

  let ranking = session.speed_ranking();
  assert_eq!(vec![(1, 210.4), (1, 210.4), (3, 208.9), (4, 205.3)],
             ranking.iter().map(|r| (r.rank, r.speed)).collect::<Vec<_>>());
  assert_eq!("Chevrolet", ranking[0].manufacturer);
  assert_eq!("Toyota", ranking[1].manufacturer);

  let top = session.top_speed(SpeedOrder::Session);
  assert_eq!(2, top.len());
  assert!(top.iter().all(|t| t.speed == 210.4));

  let matrix = session.speed_matrix_numeral();
  assert_eq!(&vec!["7".to_string(), "44".to_string()], matrix.columns());
  assert_eq!(Some(vec![Some(210.4), Some(204.8), None]), matrix.column("7"));

  let by_team = session.filtered_laps(SessionKind::Practice,
                                      TimeColumn::Lap,
                                      Grouping::Team);
  assert!(by_team.rows()
                 .iter()
                 .all(|row| row.driver.as_str() == "44 - John Doe"));
  assert_eq!(3, by_team.len());

  let mut csv = Vec::new();
  write_csv(&best, &mut csv).unwrap();
  let csv = String::from_utf8(csv).unwrap();
  assert_eq!(3, csv.lines().count());
  assert!(csv.starts_with("position,numeral,driver,best_lap"));
}

#[test]
fn race_session() {
  let session = Session::from_path(&testdata("race.csv"), &config()).unwrap();

  let race = session.race_results();
  assert_eq!(vec![(1, "10 - Ricardo Zonta", 4),
                  (2, "44 - John Doe", 3),
                  (3, "7 - Jane Roe", 2)],
             race.iter()
                 .map(|r| (r.position, r.driver.as_str(), r.laps_completed))
                 .collect::<Vec<_>>());
  assert_eq!(Some("Red Racing".to_string()), race[0].team);

  let gaps = session.gap_records();
  assert_eq!(6, gaps.len());
  assert!(gaps.iter().all(|g| g.gap >= 0.0));
  let john = gaps.iter()
                 .filter(|g| g.driver.as_str() == "44 - John Doe")
                 .map(|g| (g.lap, g.speed_trap_next))
                 .collect::<Vec<_>>();
  assert_eq!(vec![(1, 212.3), (2, 208.0)], john);
  assert!(close_to(0.8, gaps[3].gap));

  let clean = filter_gap(&gaps, 1.0);
  assert_eq!(1, clean.len());
  assert_eq!("7 - Jane Roe", clean[0].driver.as_str());

  let reference = DriverKey::from("10 - Ricardo Zonta");
  let to_leader = session.gap_to_reference(&reference).unwrap();
  assert_eq!(9, to_leader.len());
  let jane_lap2 = to_leader.iter()
                           .find(|g| g.driver.as_str() == "7 - Jane Roe" && g.lap == Some(2))
                           .unwrap();
  assert!(close_to(1.5, jane_lap2.gap.unwrap()));
  assert!(to_leader.iter()
                   .filter(|g| g.driver == reference)
                   .all(|g| g.gap == Some(0.0)));

  let by_lap = session.ranking_by_lap();
  assert_eq!(vec![("44 - John Doe", 1), ("10 - Ricardo Zonta", 2), ("7 - Jane Roe", 3)],
             by_lap.iter()
                   .filter(|r| r.lap == 2)
                   .map(|r| (r.driver.as_str(), r.rank))
                   .collect::<Vec<_>>());
  assert_eq!(1, by_lap.iter().filter(|r| r.lap == 4).count());

  assert_eq!(Err(TimingError::UnknownDriver("99 - Nobody".to_string())),
             session.gap_to_reference(&"99 - Nobody".into()));
}

#[test]
fn schema_and_segmentation_errors() {
  let missing_speed = "Time of Day,Lap,Lap Tm,S1 Tm,S2 Tm,S3 Tm\n\
                       44 - John Doe - Stock Car Pro,,,,,\n";
  assert_eq!(Err(TimingError::Schema { missing: vec!["SpeedTrap".to_string()] }),
             Session::from_reader(missing_speed.as_bytes(), &Config::default()));

  let no_markers = "Time of Day,Lap,Lap Tm,S1 Tm,S2 Tm,S3 Tm,ST\n\
                    14:00:00.000,1,1:30.000,30.000,30.000,30.000,200.0\n";
  assert_eq!(Err(TimingError::EmptySegmentation),
             Session::from_reader(no_markers.as_bytes(), &Config::default()));

  assert!(matches!(Session::from_path(&testdata("missing.csv"), &Config::default()),
                   Err(TimingError::Io(_))));
}

#[test]
fn store_round_trip() {
  let session = Session::from_path(&testdata("race.csv"), &config()).unwrap();
  let tables = session.tables(SessionKind::Race);

  let dir = tempfile::tempdir().unwrap();
  let store = JsonDirStore::open(dir.path().join("sessions")).unwrap();
  let id = store.save(NewSession { event:        "Round 5".to_string(),
                                   date:         "2024-08-11".to_string(),
                                   circuit:      "Interlagos".to_string(),
                                   session_type: "Race 1".to_string(),
                                   notes:        String::new(),
                                   kind:         SessionKind::Race,
                                   filename:     "race.csv".to_string() },
                      &tables)
                .unwrap();

  let listed = store.list(&SessionFilter { kind: Some(SessionKind::Race),
                                           ..SessionFilter::default() })
                    .unwrap();
  assert_eq!(1, listed.len());
  assert_eq!(&id, listed[0].id());

  let (meta, loaded) = store.load(&id).unwrap();
  assert_eq!("Race 1", meta.session_type());
  assert_eq!(tables, loaded);
  assert!(loaded.iter()
                .any(|table| matches!(table, StoredTable::SameLapGaps(gaps) if gaps.len() == 6)));

  store.delete(&id).unwrap();
  assert_eq!(0, store.stats().unwrap().sessions);
}
