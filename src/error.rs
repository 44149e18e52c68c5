//! Error types for championship scoring and standings prediction.
//!
//! Scoring, standings and prediction never fail: live data is partial by nature and every
//! input combination has a defined (possibly empty or zero-valued) output. Errors are only
//! raised where the engine cannot build a baseline at all.
//!
//! ## Error Categories
//!
//! - **Parse Errors**: Unparseable historical results or session-info YAML
//! - **Config Errors**: Invalid points schedules, refresh intervals or drop rules
//! - **File Errors**: Problems reading configuration or result files
//! - **Source Errors**: The snapshot collaborator failed during a refresh tick
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use pitwall_standings::StandingsError;
//!
//! let error = StandingsError::source_failed("telemetry not connected");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for standings operations.
pub type Result<T, E = StandingsError> = std::result::Result<T, E>;

/// Main error type for standings operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StandingsError {
    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot source failed: {reason}")]
    Source { reason: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl StandingsError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            StandingsError::Source { .. } => true,
            StandingsError::Timeout { .. } => true,
            StandingsError::Parse { .. } => false,
            StandingsError::Config { .. } => false,
            StandingsError::File { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            StandingsError::Parse { .. } => vec![
                "Re-download the season results",
                "Check the payload is the results JSON, not an error page",
                "Verify the session-info YAML came from a running simulator",
            ],
            StandingsError::Config { .. } => vec![
                "Check count_best_of and refresh_seconds are positive",
                "Check every points list is ordered best position first",
            ],
            StandingsError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
            StandingsError::Source { .. } => vec![
                "Ensure iRacing is running",
                "Wait for the session to load",
                "Restart the telemetry collector",
            ],
            StandingsError::Timeout { .. } => vec![
                "Increase the refresh interval",
                "Check system performance",
            ],
        }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        StandingsError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(reason: impl Into<String>) -> Self {
        StandingsError::Config { reason: reason.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        StandingsError::File { path, source }
    }

    /// Helper constructor for snapshot source failures.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        StandingsError::Source { reason: reason.into() }
    }
}

impl From<serde_json::Error> for StandingsError {
    fn from(err: serde_json::Error) -> Self {
        StandingsError::Parse { context: "Results JSON".to_string(), details: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn error_messages_carry_their_context(
            context in "[a-zA-Z ]+",
            details in ".*",
            reason in ".*"
        ) {
            let parse = StandingsError::parse_error(context.clone(), details.clone());
            let msg = parse.to_string();
            prop_assert!(msg.contains(&context));
            prop_assert!(msg.contains(&details));

            let config = StandingsError::config_error(reason.clone());
            prop_assert!(config.to_string().contains(&reason));
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<StandingsError>();

        let error = StandingsError::source_failed("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn recovery_methods_work() {
        let source = StandingsError::source_failed("not connected");
        let parse = StandingsError::parse_error("Results JSON", "expected value");
        let config = StandingsError::config_error("count_best_of must be positive");

        assert!(source.is_retryable());
        assert!(!parse.is_retryable());
        assert!(!config.is_retryable());

        for error in [&source, &parse, &config] {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }

    #[test]
    fn file_errors_keep_the_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = StandingsError::file_error(PathBuf::from("season.json"), io);

        assert!(error.to_string().contains("season.json"));
        let source = std::error::Error::source(&error).expect("io source attached");
        assert!(source.to_string().contains("no such file"));
    }

    #[test]
    fn json_errors_convert_to_parse() {
        let err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let converted: StandingsError = err.into();
        assert!(matches!(converted, StandingsError::Parse { .. }));
    }
}
