//! Scaffolding options and error types.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Environment variable overriding the default staging root.
pub const C_ENV_STAGE_DIR: &str = "AXIOMKIT_STAGE_DIR";

/// Staging root configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecStageOptions {
    /// Directory under which stage directories are created.
    pub path_dir_stage_root: PathBuf,
    /// Wipe the root when it is initialized.
    pub if_reset_root: bool,
}

impl Default for SpecStageOptions {
    fn default() -> Self {
        let path_dir_stage_root = std::env::var_os(C_ENV_STAGE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("axiomkit_stage"));
        Self {
            path_dir_stage_root,
            if_reset_root: true,
        }
    }
}

/// Commit identity written into throwaway repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for SpecGitIdentity {
    fn default() -> Self {
        Self {
            name: "username".to_string(),
            email: "user@site.tld".to_string(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Staging root, stage directory or working-directory change failed.
#[derive(Debug, Error)]
#[error("Failed to stage {}: {source}", .path.display())]
pub struct StageError {
    /// Directory being created, removed or entered.
    pub path: PathBuf,
    /// Underlying IO error.
    #[source]
    pub source: io::Error,
}

/// External command failures. Nothing is retried.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The program exited unsuccessfully.
    #[error("Command `{program} {}` failed with {status}", .args.join(" "))]
    Failed {
        program: String,
        args: Vec<String>,
        status: ExitStatus,
    },
    /// Captured standard output was not valid UTF-8.
    #[error("Output of `{program}` is not valid UTF-8")]
    Utf8 { program: String },
    /// Preparing files for the command failed.
    #[error("Failed to prepare {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
