/// Maximum allowed text length for a single request (in characters)
///
/// Requests exceeding this limit are rejected with an error.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum number of cells a batch clean request may contain
pub const MAX_BATCH_CELLS: usize = 50_000;

/// Maximum number of texts accepted by the frequency endpoints
pub const MAX_TEXTS_PER_REQUEST: usize = 1_000;

/// Default port for the HTTP server
pub const DEFAULT_PORT: u16 = 3000;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_text_length_reasonable() {
        assert!(MAX_TEXT_LENGTH > 0);
        assert!(MAX_TEXT_LENGTH <= 100_000); // Sanity check
    }

    #[test]
    fn test_batch_limits_reasonable() {
        assert!(MAX_BATCH_CELLS >= MAX_TEXTS_PER_REQUEST);
        assert!(DEFAULT_REQUEST_TIMEOUT_SECS > 0);
    }
}
