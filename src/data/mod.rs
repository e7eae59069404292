mod geography;

pub use geography::{generate_simple_world, load_all_geojson};

use crate::airports::{parse_airport_directory, AirportDirectory};
use crate::visits::{parse_visit_log, settle, Summary, UserVisitLog};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub const AIRPORTS_FILE: &str = "airports.csv";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const LOG_EXTENSION: &str = "alist";

/// Where per-user visit logs come from.
/// Shared across the loader's worker threads, hence `Sync`.
pub trait VisitSource: Sync {
    /// Raw log text for one user
    fn read_log(&self, user: &str) -> Result<String>;
}

/// Logs stored as `<dir>/<user>.alist`
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn log_path(&self, user: &str) -> Result<PathBuf> {
        if user.is_empty() || user == "." || user == ".." || user.contains(['/', '\\']) {
            bail!("invalid user name {user:?}");
        }
        Ok(self.dir.join(format!("{user}.{LOG_EXTENSION}")))
    }
}

impl VisitSource for DirSource {
    fn read_log(&self, user: &str) -> Result<String> {
        let path = self.log_path(user)?;
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Airport directory and manifest, loaded once at startup
pub struct Dataset {
    pub airports: AirportDirectory,
    /// User names in display order
    pub users: Vec<String>,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self> {
        let airports = load_airports(&dir.join(AIRPORTS_FILE))?;
        let users = load_manifest(&dir.join(MANIFEST_FILE))?;
        tracing::info!(
            airports = airports.len(),
            users = users.len(),
            dir = %dir.display(),
            "dataset loaded"
        );
        Ok(Self { airports, users })
    }
}

pub fn load_airports(path: &Path) -> Result<AirportDirectory> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading airport directory {}", path.display()))?;
    Ok(parse_airport_directory(&text))
}

pub fn load_manifest(path: &Path) -> Result<Vec<String>> {
    let mut bytes =
        fs::read(path).with_context(|| format!("reading manifest {}", path.display()))?;
    parse_manifest(&mut bytes).with_context(|| format!("parsing manifest {}", path.display()))
}

/// The manifest is a JSON array of user names
pub fn parse_manifest(bytes: &mut [u8]) -> Result<Vec<String>> {
    let users: Vec<String> = simd_json::serde::from_slice(bytes)?;
    Ok(users)
}

/// Read and parse one user's log
pub fn load_user(source: &dyn VisitSource, user: &str) -> Result<UserVisitLog> {
    let text = source.read_log(user)?;
    let log = parse_visit_log(&text);
    tracing::debug!(user, airports = log.len(), "visit log parsed");
    Ok(log)
}

/// Load every user's log concurrently and fold the results.
/// Each load settles independently; failures become zero rows.
pub fn load_summary(source: &dyn VisitSource, users: &[String]) -> Summary {
    let results: Vec<(String, Result<UserVisitLog>)> = users
        .par_iter()
        .map(|user| (user.clone(), load_user(source, user)))
        .collect();

    let summary = settle(results);
    tracing::info!(
        users = summary.users.len(),
        unavailable = summary.unavailable_count(),
        airports = summary.airports.len(),
        "summary built"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashMap;

    /// In-memory logs keyed by user
    struct MemorySource(HashMap<&'static str, &'static str>);

    impl VisitSource for MemorySource {
        fn read_log(&self, user: &str) -> Result<String> {
            self.0
                .get(user)
                .map(|text| text.to_string())
                .ok_or_else(|| anyhow!("no log for {user}"))
        }
    }

    fn users(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("airlog-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_manifest() {
        let mut bytes = br#"["zoe", "adam", "mia"]"#.to_vec();
        assert_eq!(parse_manifest(&mut bytes).unwrap(), users(&["zoe", "adam", "mia"]));

        let mut bad = br#"{"users": ["zoe"]}"#.to_vec();
        assert!(parse_manifest(&mut bad).is_err());

        let mut mixed = br#"["zoe", 3]"#.to_vec();
        assert!(parse_manifest(&mut mixed).is_err());
    }

    #[test]
    fn test_summary_tolerates_missing_user() {
        let source = MemorySource(HashMap::from([
            ("zoe", "JFK A\nLAX D\n"),
            ("mia", "JFK A\n"),
        ]));
        let summary = load_summary(&source, &users(&["zoe", "ghost", "mia"]));

        let names: Vec<&str> = summary.users.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(names, vec!["zoe", "ghost", "mia"]);
        assert!(summary.users[1].unavailable);
        assert_eq!(summary.users[1].totals.total_visits, 0);
        assert_eq!(summary.airports.get("JFK").map(|t| t.arrivals), Some(2));
    }

    #[test]
    fn test_summary_preserves_order_for_many_users() {
        let source = MemorySource(HashMap::from([("a", "AMS A\n"), ("b", "BOS D\n")]));
        let names: Vec<String> = (0..64)
            .map(|i| if i % 2 == 0 { "a".to_string() } else { "b".to_string() })
            .collect();
        let summary = load_summary(&source, &names);
        assert!(summary
            .users
            .iter()
            .zip(&names)
            .all(|(row, name)| &row.user == name));
        assert_eq!(summary.airports.get("AMS").map(|t| t.total_visits), Some(32));
    }

    #[test]
    fn test_dir_source_rejects_paths() {
        let source = DirSource::new("data");
        assert!(source.log_path("../etc/passwd").is_err());
        assert!(source.log_path("").is_err());
        assert_eq!(
            source.log_path("zoe").unwrap(),
            Path::new("data").join("zoe.alist")
        );
    }

    #[test]
    fn test_dataset_and_logs_from_disk() {
        let dir = scratch_dir("dataset");
        fs::write(
            dir.join(AIRPORTS_FILE),
            "country;iata;name;lat;lon\nUSA;JFK;Kennedy;40.64;-73.78\n",
        )
        .unwrap();
        fs::write(dir.join(MANIFEST_FILE), r#"["zoe","adam"]"#).unwrap();
        fs::write(dir.join("zoe.alist"), "# trips\njfk AD\n").unwrap();

        let dataset = Dataset::load(&dir).unwrap();
        assert_eq!(dataset.users, users(&["zoe", "adam"]));
        assert!(dataset.airports.get("JFK").is_some());

        let source = DirSource::new(&dir);
        let log = load_user(&source, "zoe").unwrap();
        assert!(log["JFK"].arrived && log["JFK"].departed);
        assert!(load_user(&source, "adam").is_err());

        let summary = load_summary(&source, &dataset.users);
        assert!(summary.users[1].unavailable);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_dataset_is_error() {
        let dir = scratch_dir("empty");
        assert!(Dataset::load(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
