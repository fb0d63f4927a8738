use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors shared by the pack tools.
///
/// Validation and missing-dependency failures are raised before any side
/// effect on disk; everything else propagates and aborts the run.
#[derive(Error, Debug)]
pub enum PackError {
    /// A source or destination that must already exist does not.
    #[error("path not found or not a directory: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A user-supplied name is empty or contains characters that cannot
    /// appear in a file or folder name.
    #[error("{what} {value:?} is empty or contains characters not allowed in file names")]
    InvalidName { what: &'static str, value: String },

    /// An include/exclude entry names a folder that is not present under
    /// the object folder.
    #[error("{list} folder not found under the object folder: {name:?}")]
    ListedFolderMissing { list: &'static str, name: String },

    /// The same folder appears in both the include and the exclude list.
    #[error("folder {0:?} is both included and excluded")]
    IncludeExcludeConflict(String),

    /// A boolean option was given a value outside the accepted spellings.
    #[error("{0:?} is not a recognized boolean value (use true/t/yes/y/1 or false/f/no/n/0)")]
    InvalidBoolFlag(String),

    /// The default tag would shadow a subfolder tag.
    #[error("default tag {0:?} collides with an existing subfolder name")]
    TagConflict(String),

    /// A required external tool could not be located.
    #[error("required tool not found: {0}")]
    MissingDependency(&'static str),

    /// The external converter ran but reported failure.
    #[error("image converter failed on {} ({})", .input.display(), .status)]
    ConverterFailed { input: PathBuf, status: ExitStatus },

    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Filesystem walk failure.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// The tag manifest could not be encoded.
    #[error("failed to encode tag manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type for pack tool operations.
pub type Result<T> = std::result::Result<T, PackError>;
