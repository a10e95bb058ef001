//! Throwaway git repositories for tests.
//!
//! All helpers act on the current working directory.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::process::check_call_silent;
use crate::spec::{CommandError, SpecGitIdentity};

/// Commit message used by callers that do not care about it.
pub const C_COMMIT_MESSAGE_DEFAULT: &str = "add file";

/// Set the repository-local commit identity.
pub fn git_config(spec_identity: &SpecGitIdentity) -> Result<(), CommandError> {
    check_call_silent("git", ["config", "user.name", spec_identity.name.as_str()])?;
    check_call_silent("git", ["config", "user.email", spec_identity.email.as_str()])
}

/// Initialize a repository on branch `master` with the default identity.
pub fn git_init() -> Result<(), CommandError> {
    check_call_silent("git", ["init", "--initial-branch=master"])?;
    git_config(&SpecGitIdentity::default())
}

/// Create each path as an empty file (with parent directories), stage it, and
/// commit them all in a single commit.
pub fn commit_files<I, S>(filenames: I, message: &str) -> Result<(), CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut n_files = 0_usize;
    for filename in filenames {
        let path_file = filename.as_ref();
        if let Some(path_parent) = path_file.parent()
            && !path_parent.as_os_str().is_empty()
        {
            fs::create_dir_all(path_parent).map_err(|e| io_error(path_parent, e))?;
        }
        fs::File::create(path_file).map_err(|e| io_error(path_file, e))?;
        check_call_silent("git", [OsStr::new("add"), path_file.as_os_str()])?;
        n_files += 1;
    }
    check_call_silent("git", ["commit", "-m", message])?;
    debug!(n_files, message, "committed placeholder files");
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> CommandError {
    CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}
