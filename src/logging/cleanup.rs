//! Retention housekeeping for rolled log files
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::config::LogConfig;

const DAY: Duration = Duration::from_secs(86_400);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3_600);

/// Prefixes of files written by the rolling appenders
const LOG_PREFIXES: &[&str] = &["access.log", "application.log"];

/// Background task running a cleanup cycle every hour
pub async fn cleanup_task(log_dir: PathBuf, config: LogConfig) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
    loop {
        interval.tick().await;

        let dir = log_dir.clone();
        let cfg = config.clone();
        let result = tokio::task::spawn_blocking(move || perform_cleanup(&dir, &cfg)).await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, log_dir = ?log_dir, "Log cleanup failed"),
            Err(e) => tracing::error!(error = %e, "Log cleanup task panicked"),
        }
    }
}

/// Compress, expire, then enforce the size cap
pub fn perform_cleanup(log_dir: &Path, config: &LogConfig) -> io::Result<()> {
    tracing::debug!("Starting log cleanup cycle");

    if config.compression_enabled {
        compress_old_logs(log_dir)?;
    }
    delete_old_logs(log_dir, config.retention_days)?;
    enforce_disk_limit(log_dir, config.max_total_size_mb)?;

    tracing::debug!("Log cleanup cycle completed");
    Ok(())
}

struct LogFile {
    path: PathBuf,
    modified: SystemTime,
    size: u64,
}

fn is_managed(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| LOG_PREFIXES.iter().any(|prefix| name.starts_with(prefix)))
        .unwrap_or(false)
}

fn list_log_files(log_dir: &Path) -> io::Result<Vec<LogFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if !metadata.is_file() || !is_managed(&path) {
            continue;
        }
        files.push(LogFile {
            path,
            modified: metadata.modified()?,
            size: metadata.len(),
        });
    }
    Ok(files)
}

/// Gzip rolled files untouched for a day; the live file is never old enough
fn compress_old_logs(log_dir: &Path) -> io::Result<()> {
    let cutoff = SystemTime::now() - DAY;

    for file in list_log_files(log_dir)? {
        let is_gz = file.path.extension().and_then(|e| e.to_str()) == Some("gz");
        if is_gz || file.modified >= cutoff {
            continue;
        }

        match compress_file(&file.path) {
            Ok(compressed) => {
                tracing::info!(original = ?file.path, compressed = ?compressed, "Log file compressed");
                if let Err(e) = fs::remove_file(&file.path) {
                    tracing::warn!(path = ?file.path, error = %e, "Failed to delete original log");
                }
            }
            Err(e) => tracing::warn!(path = ?file.path, error = %e, "Failed to compress log file"),
        }
    }

    Ok(())
}

/// Write `<name>.gz` next to `path`, keeping the original's mtime
fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    let compressed_path = PathBuf::from(name);

    let mut input = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(File::create(&compressed_path)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    let output = encoder.finish()?;

    let modified = fs::metadata(path)?.modified()?;
    output.set_modified(modified)?;

    Ok(compressed_path)
}

/// Delete log files older than the retention period
fn delete_old_logs(log_dir: &Path, retention_days: u32) -> io::Result<usize> {
    let cutoff = SystemTime::now() - DAY * retention_days;
    let mut deleted = 0;
    let mut freed_bytes = 0u64;

    for file in list_log_files(log_dir)? {
        if file.modified >= cutoff {
            continue;
        }
        match fs::remove_file(&file.path) {
            Ok(()) => {
                deleted += 1;
                freed_bytes += file.size;
                tracing::info!(path = ?file.path, size_bytes = file.size, "Deleted old log file");
            }
            Err(e) => tracing::warn!(path = ?file.path, error = %e, "Failed to delete old log file"),
        }
    }

    if deleted > 0 {
        tracing::info!(deleted_files = deleted, freed_bytes, "Log retention applied");
    }
    Ok(deleted)
}

/// Delete oldest files until the directory fits in `max_size_mb`
fn enforce_disk_limit(log_dir: &Path, max_size_mb: u64) -> io::Result<usize> {
    let mut files = list_log_files(log_dir)?;
    let mut total: u64 = files.iter().map(|f| f.size).sum();
    let max_bytes = max_size_mb * 1024 * 1024;

    if total <= max_bytes {
        return Ok(0);
    }

    tracing::warn!(
        total_size_mb = total / (1024 * 1024),
        max_size_mb,
        "Log directory exceeds size limit, deleting oldest files"
    );

    files.sort_by_key(|f| f.modified);

    let mut deleted = 0;
    for file in files {
        if total <= max_bytes {
            break;
        }
        match fs::remove_file(&file.path) {
            Ok(()) => {
                total -= file.size;
                deleted += 1;
            }
            Err(e) => tracing::warn!(path = ?file.path, error = %e, "Failed to delete log file"),
        }
    }

    Ok(deleted)
}
