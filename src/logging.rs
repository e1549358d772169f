use std::{
    fs::{self, DirEntry},
    path::Path,
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, RollingFileAppender},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation};

pub const LOG_FILE_PREFIX: &str = "stylist.log";
const DEBUG_DIRECTIVES: &str = "stylist=debug,ai_gateway=debug";

/// Keeps the non-blocking file writer alive. Dropping it flushes the log.
pub struct LoggingGuard {
    _worker_guard: WorkerGuard,
}

/// `verbose` adds debug directives for the stylist and ai_gateway targets.
pub fn init_tracing(logging_config: &LoggingConfig, verbose: bool) -> Result<LoggingGuard> {
    if logging_config.dir.as_os_str().is_empty() {
        return Err(anyhow!("logging.dir cannot be empty"));
    }

    let log_dir = logging_config.dir.as_path();
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create logging directory {}", log_dir.display()))?;

    let file_filter = build_env_filter(&logging_config.filter, verbose)?;
    let stderr_level = parse_stderr_level(&logging_config.stderr_level)?;
    let retention_warnings = purge_expired_logs(
        log_dir,
        LOG_FILE_PREFIX,
        logging_config.retention_days,
        SystemTime::now(),
    );

    let (file_writer, worker_guard) =
        tracing_appender::non_blocking(rolling_appender(log_dir, &logging_config.rotation));

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_ansi(false)
        .with_writer(file_writer)
        .with_filter(file_filter);

    let stderr_layer = (stderr_level != LevelFilter::OFF).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(stderr_level)
    });

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = %log_dir.display(),
        filter = %logging_config.filter,
        verbose = verbose,
        rotation = ?logging_config.rotation,
        retention_days = logging_config.retention_days,
        stderr_level = %stderr_level,
        "logging_initialized"
    );
    for warning in retention_warnings {
        tracing::warn!(target: "logging", warning = %warning, "logging_retention_warning");
    }

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
    })
}

fn build_env_filter(filter: &str, verbose: bool) -> Result<EnvFilter> {
    if filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }
    let directives = if verbose {
        format!("{filter},{DEBUG_DIRECTIVES}")
    } else {
        filter.to_string()
    };
    EnvFilter::try_new(&directives)
        .with_context(|| format!("failed to parse logging.filter '{}'", filter))
}

fn parse_stderr_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("invalid logging.stderr_level '{}'", level))
}

fn rolling_appender(log_dir: &Path, rotation: &LoggingRotation) -> RollingFileAppender {
    match rotation {
        LoggingRotation::Daily => rolling::daily(log_dir, LOG_FILE_PREFIX),
        LoggingRotation::Hourly => rolling::hourly(log_dir, LOG_FILE_PREFIX),
    }
}

/// Deletes `prefix*` files last modified at or before `now - retention_days`.
/// Failures are collected as warnings; they never abort startup.
fn purge_expired_logs(
    log_dir: &Path,
    prefix: &str,
    retention_days: usize,
    now: SystemTime,
) -> Vec<String> {
    let retention = Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60) as u64);
    let cutoff = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(err) => {
            return vec![format!(
                "failed to scan logging directory {}: {}",
                log_dir.display(),
                err
            )];
        }
    };

    let mut warnings = Vec::new();
    for entry in entries {
        let outcome = entry
            .map_err(|err| format!("failed to iterate logging directory entries: {err}"))
            .and_then(|entry| {
                if !is_expired_log(&entry, prefix, cutoff)? {
                    return Ok(());
                }
                fs::remove_file(entry.path()).map_err(|err| {
                    format!(
                        "failed to remove expired log file {}: {}",
                        entry.path().display(),
                        err
                    )
                })
            });
        if let Err(warning) = outcome {
            warnings.push(warning);
        }
    }
    warnings
}

fn is_expired_log(entry: &DirEntry, prefix: &str, cutoff: SystemTime) -> Result<bool, String> {
    if !entry.file_name().to_string_lossy().starts_with(prefix) {
        return Ok(false);
    }

    let metadata = entry
        .metadata()
        .map_err(|err| format!("failed to stat {}: {}", entry.path().display(), err))?;
    if !metadata.is_file() {
        return Ok(false);
    }

    let modified = metadata.modified().map_err(|err| {
        format!(
            "failed to read mtime for {}: {}",
            entry.path().display(),
            err
        )
    })?;
    Ok(modified <= cutoff)
}
