//! Tree option models, manifest entries and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::report::ReportTreeDiff;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for `copy_tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCopyOptions {
    /// Prune hidden files and directories (whole subtrees) from the copy.
    pub if_skip_hidden: bool,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            if_skip_hidden: true,
        }
    }
}

/// Input options for `assert_directory` / `diff_tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecAssertOptions {
    /// Walk hidden files and directories too.
    pub if_include_hidden: bool,
    /// Tolerate on-disk entries that are not expected (superset check).
    pub if_allow_extra: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Manifest

/// One enumerated source entry, relative to the copy source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecManifestEntry {
    /// Path relative to the source root.
    pub path_rel: PathBuf,
    /// Whether the entry is a directory (otherwise a file).
    pub if_is_dir: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised by `copy_tree`.
///
/// The first I/O failure aborts the copy; entries already written are left in place.
#[derive(Debug, Error)]
pub enum CopyTreeError {
    /// Source path is missing or not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Enumeration, directory creation or file copy failed.
    #[error("Failed to copy {}: {source}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised by `assert_directory`.
#[derive(Debug, Error)]
pub enum AssertDirectoryError {
    /// On-disk tree does not match the expected entries.
    #[error("{0}")]
    Mismatch(ReportTreeDiff),
    /// Traversal of an existing root failed.
    #[error("Failed to walk {}: {source}", .path.display())]
    Io {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl AssertDirectoryError {
    /// Diff report when this is an assertion failure.
    pub fn report(&self) -> Option<&ReportTreeDiff> {
        match self {
            Self::Mismatch(report) => Some(report),
            Self::Io { .. } => None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
