use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {destination}: {source}")]
    FileWriteError {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("{roster} roster is missing required column '{column}'")]
    MissingColumnError { roster: String, column: String },

    #[error("{roster} roster line {line} has {found} fields, header has {expected}")]
    MalformedRowError {
        roster: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{roster} roster has no header row")]
    EmptyInputError { roster: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Employee {employee_id} classified into more than one group: {groups}")]
    InvariantViolation { employee_id: String, groups: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. }
            | Self::FileReadError { .. }
            | Self::CsvError(_)
            | Self::MissingColumnError { .. }
            | Self::MalformedRowError { .. }
            | Self::EmptyInputError { .. } => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::FileWriteError { .. } | Self::IoError(_) => ErrorCategory::Output,
            Self::InvariantViolation { .. } | Self::SerializationError(_) => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Config => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for this error. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Config => 2,
            ErrorCategory::Processing => 1,
            ErrorCategory::Output => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::FileNotFound { .. } => {
                "Check the path; both roster exports must exist before running".to_string()
            }
            Self::FileReadError { .. } => "Check file permissions on the roster export".to_string(),
            Self::CsvError(_) | Self::MalformedRowError { .. } => {
                "Re-export the roster as CSV; no row may have more fields than the header"
                    .to_string()
            }
            Self::MissingColumnError { column, .. } => {
                format!("Add a '{}' column to the export header", column)
            }
            Self::EmptyInputError { .. } => "The export is empty; re-run the export".to_string(),
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. } => {
                format!("Fix '{}' in the config file or on the command line", field)
            }
            Self::InvariantViolation { .. } => {
                "Inspect both rosters for this employee; no output was written".to_string()
            }
            Self::FileWriteError { .. } | Self::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            Self::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not load roster: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => format!("Could not write updates: {}", self),
            ErrorCategory::Processing => format!("Reconciliation failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
