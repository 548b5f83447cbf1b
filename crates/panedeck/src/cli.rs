//! Command line flags and log setup.

use clap::Parser;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Configurable terminal dashboard
#[derive(Parser, Debug)]
#[command(name = "panedeck", version, about, long_about = None)]
pub struct Cli {
    /// Dashboard configuration file
    #[arg(short, long, default_value = panedeck_core::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs here instead of the cache directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Validate the configuration, print the resolved layout and exit
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "panedeck=debug"
        } else {
            "panedeck=info"
        }
    }

    /// Log file location, if one can be determined.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("panedeck").join("panedeck.log")))
    }
}

/// Opens `path` for appending, creating parent directories.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber.
///
/// The terminal belongs to the dashboard, so logs only ever go to a file.
/// Without a usable log path logging stays off.
pub fn init_logging(cli: &Cli) -> io::Result<Option<PathBuf>> {
    let Some(path) = cli.log_path() else {
        return Ok(None);
    };
    let file = open_log_file(&path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["panedeck"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("panedeck.toml"));
        assert!(!cli.verbose);
        assert!(!cli.check);
        assert!(cli.log_file.is_none());
        assert_eq!(cli.default_filter(), "panedeck=info");
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "panedeck",
            "-c",
            "dash/board.toml",
            "-v",
            "--log-file",
            "/tmp/pd.log",
            "--check",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("dash/board.toml"));
        assert!(cli.verbose);
        assert!(cli.check);
        assert_eq!(cli.log_path(), Some(PathBuf::from("/tmp/pd.log")));
        assert_eq!(cli.default_filter(), "panedeck=debug");
    }

    #[test]
    fn test_long_config_flag() {
        let cli = Cli::try_parse_from(["panedeck", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["panedeck", "--bogus"]).is_err());
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["panedeck", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("panedeck.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
