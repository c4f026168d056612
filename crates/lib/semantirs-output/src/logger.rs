use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;

use crate::error::OutputError;

#[derive(Deserialize, Debug, Clone)]
pub struct LogSettings {
    pub log_path: String,
    pub log_level: String,
    pub log_file_name: String,
    pub log_overwrite: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_path: "output".to_string(),
            log_level: "info".to_string(),
            log_file_name: "semantirs.log".to_string(),
            log_overwrite: true,
        }
    }
}

pub fn setup_logging(log_level: &str, log_file_path: PathBuf) -> Result<Config, OutputError> {
    let log_level = get_logging_level(log_level);
    let log_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y.%m.%d %H:%M:%S)} | {({l}):5.5} | {({f}:{L}):>40.40} | {m}{n}",
        )))
        .build(log_file_path)?;

    Config::builder()
        .appender(Appender::builder().build("x", Box::new(log_file)))
        .build(Root::builder().appender("x").build(log_level))
        .map_err(|e| OutputError::Logger(e.to_string()))
}

fn get_logging_level(log_level: &str) -> LevelFilter {
    match log_level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Resolves the log file for this run. An existing file is removed when overwriting is
/// enabled, otherwise the new file name gets a timestamp suffix.
pub fn log_file_path(
    config_path: &Path,
    log_settings: &LogSettings,
    scenario_id: Option<u32>,
) -> Result<PathBuf, OutputError> {
    let mut log_path = config_path.join(&log_settings.log_path);
    log_path = match scenario_id {
        Some(val) => log_path.join(val.to_string()).join("logs"),
        None => log_path.join("logs"),
    };
    if !log_path.exists() {
        fs::create_dir_all(&log_path)?;
    }

    let log_file_path = log_path.join(&log_settings.log_file_name);
    if !log_file_path.exists() {
        return Ok(log_file_path);
    }
    if log_settings.log_overwrite {
        fs::remove_file(&log_file_path)?;
        return Ok(log_file_path);
    }

    let stamp = Utc::now().format("_%d%m%Y_%H%M%S").to_string();
    let stem = log_settings
        .log_file_name
        .split('.')
        .next()
        .unwrap_or("semantirs");
    Ok(log_path.join(format!("{}{}.log", stem, stamp)))
}

pub fn initiate_logger(
    config_path: &Path,
    log_settings: &LogSettings,
    scenario_id: Option<u32>,
) -> Result<(), OutputError> {
    let log_file_path = log_file_path(config_path, log_settings, scenario_id)?;
    let logger_config = setup_logging(&log_settings.log_level, log_file_path)?;
    log4rs::init_config(logger_config).map_err(|e| OutputError::Logger(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let run = std::process::id();
        let dir = std::env::temp_dir().join(format!("semantirs-logger-{}-{}", run, name));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_scratch_dirs_are_per_process() {
        let dir = scratch_dir("owner");
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, format!("semantirs-logger-{}-owner", std::process::id()));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_levels() {
        assert_eq!(get_logging_level("trace"), LevelFilter::Trace);
        assert_eq!(get_logging_level("warn"), LevelFilter::Warn);
        assert_eq!(get_logging_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn test_existing_log_kept_without_overwrite() {
        let dir = scratch_dir("keep");
        let settings = LogSettings {
            log_overwrite: false,
            ..Default::default()
        };
        let first = log_file_path(&dir, &settings, Some(4)).unwrap();
        assert!(first.ends_with("output/4/logs/semantirs.log"));
        fs::write(&first, "old run").unwrap();

        let second = log_file_path(&dir, &settings, Some(4)).unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        let name = second.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("semantirs_") && name.ends_with(".log"));
    }

    #[test]
    fn test_existing_log_removed_with_overwrite() {
        let dir = scratch_dir("overwrite");
        let settings = LogSettings::default();
        let first = log_file_path(&dir, &settings, None).unwrap();
        fs::write(&first, "old run").unwrap();
        let second = log_file_path(&dir, &settings, None).unwrap();
        assert_eq!(first, second);
        assert!(!second.exists());
    }
}
