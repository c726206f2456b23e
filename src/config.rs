//! Command-line flags and the paths derived from them.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".department-admin";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "departments.sqlite";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "department-admin.log";

/// Terminal admin screen for departments.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// SQLite database file (defaults to ~/.department-admin/departments.sqlite)
    #[arg(long, env = "DEPARTMENT_ADMIN_DB")]
    pub db: Option<PathBuf>,

    /// Log more detail to the log file (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Insert sample departments and students when the store is empty
    #[arg(long)]
    pub seed_demo: bool,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub verbosity: u8,
    pub seed_demo: bool,
}

impl Config {
    /// Fill in default locations for anything the flags left out.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let db_path = match cli.db {
            Some(path) => path,
            None => default_db_path()?,
        };
        let log_path = db_path.with_file_name(LOG_FILE_NAME);

        Ok(Self {
            db_path,
            log_path,
            verbosity: cli.verbose,
            seed_demo: cli.seed_demo,
        })
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_db_places_log_alongside() {
        let cli = Cli::parse_from(["department-admin", "--db", "/tmp/school/terms.sqlite", "-vv"]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/school/terms.sqlite"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/school/department-admin.log"));
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
        assert!(!config.seed_demo);
    }

    #[test]
    fn verbosity_saturates_at_trace() {
        let cli = Cli::parse_from(["department-admin", "--db", "x.sqlite", "-vvvvv", "--seed-demo"]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.log_level(), tracing::Level::TRACE);
        assert!(config.seed_demo);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
