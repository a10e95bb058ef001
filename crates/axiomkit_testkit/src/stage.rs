//! Staging directories for integration tests.
//!
//! Stage directories are left on disk after the test so failures can be
//! inspected; the root is wiped by [`init_stage_root`] on the next run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::spec::{SpecStageOptions, StageError};

/// Create the staging root, wiping it first when `if_reset_root` is set.
pub fn init_stage_root(spec_stage_options: &SpecStageOptions) -> Result<PathBuf, StageError> {
    let path_dir_root = &spec_stage_options.path_dir_stage_root;
    if spec_stage_options.if_reset_root {
        match fs::remove_dir_all(path_dir_root) {
            Ok(()) => debug!(root = %path_dir_root.display(), "cleared stage root"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(stage_error(path_dir_root, e)),
        }
    }
    fs::create_dir_all(path_dir_root).map_err(|e| stage_error(path_dir_root, e))?;
    Ok(path_dir_root.clone())
}

/// Create a unique `<name>-XXXXXX` directory under the staging root and make it
/// the current working directory.
pub fn stage_dir(name: &str, spec_stage_options: &SpecStageOptions) -> Result<PathBuf, StageError> {
    let path_dir_root = &spec_stage_options.path_dir_stage_root;
    fs::create_dir_all(path_dir_root).map_err(|e| stage_error(path_dir_root, e))?;

    let path_dir_stage = tempfile::Builder::new()
        .prefix(&format!("{name}-"))
        .tempdir_in(path_dir_root)
        .map_err(|e| stage_error(path_dir_root, e))?
        .keep();
    std::env::set_current_dir(&path_dir_stage).map_err(|e| stage_error(&path_dir_stage, e))?;
    debug!(stage = %path_dir_stage.display(), "entered stage directory");
    Ok(path_dir_stage)
}

/// Restores the previous working directory when dropped.
#[derive(Debug)]
#[must_use = "the previous directory is restored when the guard is dropped"]
pub struct PushdGuard {
    path_dir_prev: PathBuf,
}

impl PushdGuard {
    /// Directory that will be restored.
    pub fn previous(&self) -> &Path {
        &self.path_dir_prev
    }
}

impl Drop for PushdGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.path_dir_prev) {
            warn!(path = %self.path_dir_prev.display(), "Failed to restore working directory: {e}");
        }
    }
}

/// Change the working directory to `dir` until the returned guard is dropped.
pub fn pushd<P: AsRef<Path>>(dir: P) -> Result<PushdGuard, StageError> {
    let path_dir_prev = std::env::current_dir().map_err(|e| stage_error(Path::new("."), e))?;
    std::env::set_current_dir(dir.as_ref()).map_err(|e| stage_error(dir.as_ref(), e))?;
    Ok(PushdGuard { path_dir_prev })
}

fn stage_error(path: &Path, source: io::Error) -> StageError {
    StageError {
        path: path.to_path_buf(),
        source,
    }
}
