use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::FintextError;
use crate::utils::header_utils::extract_api_key;

/// Set of accepted API keys; empty means authentication is off
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: HashSet<String>,
}

impl ApiKeys {
    /// No keys, no authentication
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// One key per line; blank lines and `#` comments are skipped
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let reader = BufReader::new(File::open(path)?);
        let mut keys = HashSet::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            keys.insert(trimmed.to_string());
        }

        Ok(Self { keys })
    }

    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn validate(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }
}

/// Locations searched when no explicit key file is configured
pub fn default_key_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from("./api_keys.txt")];
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".fintext/api_keys.txt"));
    }
    locations.push(PathBuf::from("/etc/fintext/api_keys.txt"));
    locations
}

/// Load keys from `key_file` if given, otherwise from the default locations
///
/// The first file yielding at least one key wins. Unreadable or empty files
/// are logged and skipped; with no keys found authentication stays disabled.
pub fn load_api_keys(key_file: Option<&Path>) -> ApiKeys {
    if let Some(path) = key_file {
        match ApiKeys::from_file(path) {
            Ok(keys) if keys.is_enabled() => {
                tracing::info!(count = keys.count(), path = %path.display(), "Loaded API keys");
                return keys;
            }
            Ok(_) => tracing::warn!(path = %path.display(), "API key file is empty"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read API key file")
            }
        }
    }

    for location in default_key_locations() {
        if !location.exists() {
            continue;
        }
        match ApiKeys::from_file(&location) {
            Ok(keys) if keys.is_enabled() => {
                tracing::info!(count = keys.count(), path = %location.display(), "Loaded API keys");
                return keys;
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("Could not read key file {:?}: {}", location, e),
        }
    }

    tracing::info!("No API key file found - authentication disabled");
    ApiKeys::empty()
}

/// Middleware to check API key authentication
pub async fn auth_middleware(
    State(keys): State<ApiKeys>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if !keys.is_enabled() {
        return next.run(request).await;
    }

    match extract_api_key(&headers) {
        Some(key) if keys.validate(&key) => next.run(request).await,
        Some(_) => FintextError::InvalidApiKey.into_response(),
        None => FintextError::Unauthorized.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_keys() {
        let keys = ApiKeys::empty();
        assert!(!keys.is_enabled());
        assert_eq!(keys.count(), 0);
        assert!(!keys.validate("any-key"));
    }

    #[test]
    fn test_validate_key() {
        let keys = ApiKeys::from_keys(["valid-key-1", "valid-key-2"]);

        assert!(keys.is_enabled());
        assert_eq!(keys.count(), 2);
        assert!(keys.validate("valid-key-1"));
        assert!(keys.validate("valid-key-2"));
        assert!(!keys.validate("invalid-key"));
    }

    #[test]
    fn test_api_keys_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "key-1").unwrap();
        writeln!(temp_file, "key-2").unwrap();
        writeln!(temp_file, "# comment line").unwrap();
        writeln!(temp_file).unwrap();
        writeln!(temp_file, "key-3").unwrap();
        temp_file.flush().unwrap();

        let keys = ApiKeys::from_file(temp_file.path()).unwrap();

        assert_eq!(keys.count(), 3);
        assert!(keys.validate("key-3"));
        assert!(!keys.validate("# comment line"));
    }

    #[test]
    fn test_api_keys_from_file_not_found() {
        assert!(ApiKeys::from_file("/nonexistent/path/to/file.txt").is_err());
    }

    #[test]
    fn test_api_keys_trim_whitespace() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "  key-with-spaces  ").unwrap();
        writeln!(temp_file, "\tkey-with-tabs\t").unwrap();
        temp_file.flush().unwrap();

        let keys = ApiKeys::from_file(temp_file.path()).unwrap();

        assert!(keys.validate("key-with-spaces"));
        assert!(keys.validate("key-with-tabs"));
        assert!(!keys.validate("  key-with-spaces  "));
    }

    #[test]
    fn test_load_api_keys_explicit_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "explicit-key").unwrap();
        temp_file.flush().unwrap();

        let keys = load_api_keys(Some(temp_file.path()));
        assert!(keys.validate("explicit-key"));
    }

    #[test]
    fn test_api_keys_case_sensitive() {
        let keys = ApiKeys::from_keys(["CaseSensitiveKey"]);
        assert!(keys.validate("CaseSensitiveKey"));
        assert!(!keys.validate("casesensitivekey"));
    }

    #[test]
    fn test_default_locations_start_with_working_dir() {
        let locations = default_key_locations();
        assert_eq!(locations[0], PathBuf::from("./api_keys.txt"));
        assert_eq!(
            locations.last(),
            Some(&PathBuf::from("/etc/fintext/api_keys.txt"))
        );
    }
}
