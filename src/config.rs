use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "Usage: airlog [--data <dir>] [--maps <dir>] [--user <name>] \
[--log-file <path>] [--plain]

  --data <dir>       visit data: airports.csv, manifest.json, <user>.alist (env AIRLOG_DATA, default: data)
  --maps <dir>       Natural Earth GeoJSON files (env AIRLOG_MAPS, default: maps)
  --user <name>      open a single user's map instead of the summary (env AIRLOG_USER)
  --log-file <path>  write logs to a file (env AIRLOG_LOG; RUST_LOG sets the level)
  --plain            print tables to stdout instead of starting the terminal UI";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub maps_dir: PathBuf,
    /// Selected user; `None` shows the all-users summary
    pub user: Option<String>,
    pub log_file: Option<PathBuf>,
    pub plain: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = std::env::var("AIRLOG_DATA").unwrap_or_else(|_| "data".to_string());
        let maps_dir = std::env::var("AIRLOG_MAPS").unwrap_or_else(|_| "maps".to_string());
        let user = std::env::var("AIRLOG_USER").ok().filter(|u| !u.is_empty());
        let log_file = std::env::var("AIRLOG_LOG").ok().filter(|p| !p.is_empty());

        Self {
            data_dir: data_dir.into(),
            maps_dir: maps_dir.into(),
            user,
            log_file: log_file.map(PathBuf::from),
            plain: false,
        }
    }
}

/// Outcome of argument parsing
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Parse arguments (without the program name) over the environment defaults
    pub fn from_args(args: &[String]) -> Result<Command> {
        Self::from_args_with(Self::default(), args)
    }

    fn from_args_with(mut config: Config, args: &[String]) -> Result<Command> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("{flag} requires a value\n\n{USAGE}"))
            };

            match arg.as_str() {
                "--data" => config.data_dir = value("--data")?.into(),
                "--maps" => config.maps_dir = value("--maps")?.into(),
                "--user" => {
                    let user = value("--user")?;
                    config.user = (!user.is_empty()).then_some(user);
                }
                "--log-file" => config.log_file = Some(value("--log-file")?.into()),
                "--plain" => config.plain = true,
                "-h" | "--help" => return Ok(Command::Help),
                other => bail!("unknown argument {other:?}\n\n{USAGE}"),
            }
        }
        Ok(Command::Run(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            data_dir: "data".into(),
            maps_dir: "maps".into(),
            user: None,
            log_file: None,
            plain: false,
        }
    }

    fn parse(args: &[&str]) -> Result<Command> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Config::from_args_with(base(), &args)
    }

    #[test]
    fn test_no_args_keeps_defaults() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(base()));
    }

    #[test]
    fn test_all_flags() {
        let cmd = parse(&[
            "--data", "/srv/air", "--maps", "ne", "--user", "zoe", "--log-file", "air.log", "--plain",
        ])
        .unwrap();
        let Command::Run(config) = cmd else {
            panic!("expected run");
        };
        assert_eq!(config.data_dir, PathBuf::from("/srv/air"));
        assert_eq!(config.maps_dir, PathBuf::from("ne"));
        assert_eq!(config.user.as_deref(), Some("zoe"));
        assert_eq!(config.log_file, Some(PathBuf::from("air.log")));
        assert!(config.plain);
    }

    #[test]
    fn test_empty_user_means_summary() {
        let Command::Run(config) = parse(&["--user", ""]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(config.user, None);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--user"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert_eq!(parse(&["--plain", "--help"]).unwrap(), Command::Help);
    }
}
