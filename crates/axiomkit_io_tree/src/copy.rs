//! Directory tree enumeration and copy replay.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::spec::{CopyTreeError, SpecCopyOptions, SpecManifestEntry};
use crate::util::{copy_file_with_metadata, list_dir, retain_visible};

#[derive(Debug)]
struct SpecManifestContext {
    path_dir_src: PathBuf,
    if_skip_hidden: bool,
    set_visited_dirs: HashSet<(u64, u64)>,
    l_manifest: Vec<SpecManifestEntry>,
}

/// Copy a directory tree from `dir_source` into `dir_destination`.
///
/// The copy runs in two phases:
/// 1. Enumerate the full source manifest (see [`collect_manifest`]).
/// 2. Create `dir_destination` (with ancestors) and replay the manifest into it:
///    directories are created idempotently, files are copied with their
///    permission bits and timestamps, replacing existing destination files.
///
/// Because phase 1 finishes before anything is written, `dir_destination` may
/// live inside `dir_source` without the copy picking up its own output.
///
/// The first I/O failure is returned as [`CopyTreeError::Io`]; entries copied
/// before it are not rolled back.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: SpecCopyOptions,
) -> Result<(), CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref();
    let path_dir_dst = dir_destination.as_ref();

    let l_manifest = collect_manifest(path_dir_src, spec_cp_options.if_skip_hidden)?;

    fs::create_dir_all(path_dir_dst).map_err(|e| io_error(path_dir_dst, e))?;

    let mut set_seen_dirs: HashSet<&Path> = HashSet::new();
    let mut n_dirs = 0_usize;
    let mut n_files = 0_usize;
    for spec_entry in &l_manifest {
        let path_src = path_dir_src.join(&spec_entry.path_rel);
        let path_dst = path_dir_dst.join(&spec_entry.path_rel);

        if spec_entry.if_is_dir {
            if set_seen_dirs.insert(spec_entry.path_rel.as_path()) {
                fs::create_dir_all(&path_dst).map_err(|e| io_error(&path_dst, e))?;
                n_dirs += 1;
            }
            continue;
        }

        trace!(src = %path_src.display(), dst = %path_dst.display(), "copy file");
        copy_file_with_metadata(&path_src, &path_dst).map_err(|e| io_error(&path_dst, e))?;
        n_files += 1;
    }

    debug!(
        src = %path_dir_src.display(),
        dst = %path_dir_dst.display(),
        n_dirs,
        n_files,
        "copied tree"
    );
    Ok(())
}

/// Enumerate every descendant of `dir_source` as a relative manifest.
///
/// Traversal is depth-first: each directory is listed right before its children,
/// and siblings are ordered by name. With `if_skip_hidden`, hidden entries are
/// dropped before descending, so hidden directories never contribute children.
/// Directory symlinks are followed; on unix a directory reached twice through
/// links is listed but not entered again.
pub fn collect_manifest<P>(
    dir_source: P,
    if_skip_hidden: bool,
) -> Result<Vec<SpecManifestEntry>, CopyTreeError>
where
    P: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    if !path_dir_src.is_dir() {
        return Err(CopyTreeError::SourceNotDirectory(path_dir_src));
    }

    let mut spec_mf_ctx = SpecManifestContext {
        path_dir_src: path_dir_src.clone(),
        if_skip_hidden,
        set_visited_dirs: HashSet::new(),
        l_manifest: Vec::new(),
    };
    mark_visited(&path_dir_src, &mut spec_mf_ctx);
    walk_directory(&path_dir_src, &mut spec_mf_ctx)?;
    Ok(spec_mf_ctx.l_manifest)
}

fn walk_directory(
    path_root: &Path,
    spec_mf_ctx: &mut SpecManifestContext,
) -> Result<(), CopyTreeError> {
    let mut l_children = list_dir(path_root).map_err(|e| io_error(path_root, e))?;
    retain_visible(&mut l_children, spec_mf_ctx.if_skip_hidden);

    for spec_child in l_children {
        let path_rel = spec_child
            .path_entry
            .strip_prefix(&spec_mf_ctx.path_dir_src)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(&spec_child.name_entry));

        if spec_child.if_is_dir {
            spec_mf_ctx.l_manifest.push(SpecManifestEntry {
                path_rel,
                if_is_dir: true,
            });
            if mark_visited(&spec_child.path_entry, spec_mf_ctx) {
                walk_directory(&spec_child.path_entry, spec_mf_ctx)?;
            } else {
                warn!(
                    path = %spec_child.path_entry.display(),
                    "Symlink loop detected; not descending"
                );
            }
            continue;
        }

        let meta_src =
            fs::metadata(&spec_child.path_entry).map_err(|e| io_error(&spec_child.path_entry, e))?;
        if !meta_src.is_file() {
            warn!(path = %spec_child.path_entry.display(), "Special file skipped");
            continue;
        }
        if spec_child.if_is_symlink {
            trace!(path = %spec_child.path_entry.display(), "file symlink dereferenced");
        }
        spec_mf_ctx.l_manifest.push(SpecManifestEntry {
            path_rel,
            if_is_dir: false,
        });
    }
    Ok(())
}

/// Record a directory identity; `false` when it was already visited.
fn mark_visited(path_dir: &Path, spec_mf_ctx: &mut SpecManifestContext) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let Ok(stat_dir) = fs::metadata(path_dir) {
            return spec_mf_ctx
                .set_visited_dirs
                .insert((stat_dir.dev(), stat_dir.ino()));
        }
    }
    #[cfg(not(unix))]
    {
        let _ = (path_dir, &spec_mf_ctx.set_visited_dirs);
    }
    true
}

fn io_error(path: &Path, source: io::Error) -> CopyTreeError {
    CopyTreeError::Io {
        path: path.to_path_buf(),
        source,
    }
}
