//! Error types for the import engine

use std::path::PathBuf;

/// Result alias used throughout the engine
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Errors raised while reconciling survey spreadsheets into the store
#[derive(Debug)]
pub enum ImportError {
    /// A required field is absent or unusable
    InvalidInput {
        field: &'static str,
        message: String,
    },
    /// No source workbook was found for a campaign
    UnresolvedFile {
        campaign: String,
        candidates: Vec<PathBuf>,
    },
    /// Wraps whatever went wrong while processing one spreadsheet row
    RowProcessingFailure {
        row_number: usize,
        source: Box<ImportError>,
    },
    /// Any error reported by the database layer
    StorageFailure(sqlx::Error),
    /// The workbook could not be opened or has no usable sheet
    Workbook { path: PathBuf, message: String },
    /// Invalid campaign profile or settings
    Config { message: String },
}

impl ImportError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        ImportError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ImportError::Config {
            message: message.into(),
        }
    }

    /// Wrap an error as the failure of a given spreadsheet row
    pub fn for_row(self, row_number: usize) -> Self {
        ImportError::RowProcessingFailure {
            row_number,
            source: Box::new(self),
        }
    }

    /// Check whether this is (or wraps) an `InvalidInput` error
    pub fn is_invalid_input(&self) -> bool {
        match self {
            ImportError::InvalidInput { .. } => true,
            ImportError::RowProcessingFailure { source, .. } => source.is_invalid_input(),
            _ => false,
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::InvalidInput { field, message } => {
                write!(f, "invalid input for '{}': {}", field, message)
            }
            ImportError::UnresolvedFile {
                campaign,
                candidates,
            } => {
                let tried: Vec<String> = candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                write!(
                    f,
                    "no source workbook found for campaign '{}' (tried: {})",
                    campaign,
                    tried.join(", ")
                )
            }
            ImportError::RowProcessingFailure { row_number, source } => {
                write!(f, "row {} failed: {}", row_number, source)
            }
            ImportError::StorageFailure(err) => write!(f, "storage failure: {}", err),
            ImportError::Workbook { path, message } => {
                write!(f, "cannot read workbook {}: {}", path.display(), message)
            }
            ImportError::Config { message } => write!(f, "invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::RowProcessingFailure { source, .. } => Some(source.as_ref()),
            ImportError::StorageFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ImportError {
    fn from(err: sqlx::Error) -> Self {
        ImportError::StorageFailure(err)
    }
}

impl From<sqlx::migrate::MigrateError> for ImportError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        ImportError::StorageFailure(sqlx::Error::Migrate(Box::new(err)))
    }
}
