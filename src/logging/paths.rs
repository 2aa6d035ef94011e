use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve and create the log directory
///
/// Uses `custom_dir` when given, otherwise the first writable of the user's
/// local data directory and the home directory, falling back to the temp
/// directory.
pub fn get_log_directory(custom_dir: Option<&Path>) -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = custom_dir {
        return ensure_directory_exists(dir.to_path_buf());
    }

    let candidates = [
        dirs::data_local_dir().map(|d| d.join("fintext").join("logs")),
        dirs::home_dir().map(|d| d.join(".fintext").join("logs")),
    ];

    let log_dir = candidates
        .into_iter()
        .flatten()
        .find(|path| can_create(path))
        .unwrap_or_else(|| env::temp_dir().join("fintext_logs"));

    ensure_directory_exists(log_dir)
}

/// Check if a directory is writable
fn is_writable(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let test_file = path.join(".write_test");
    let ok = fs::write(&test_file, b"test").is_ok();
    let _ = fs::remove_file(&test_file);
    ok
}

/// Existing and writable, or creatable under the nearest existing ancestor
fn can_create(path: &Path) -> bool {
    if path.exists() {
        return is_writable(path);
    }
    path.ancestors()
        .skip(1)
        .find(|ancestor| ancestor.exists())
        .map(is_writable)
        .unwrap_or(false)
}

fn ensure_directory_exists(path: PathBuf) -> Result<PathBuf, std::io::Error> {
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}
