use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::conf::C_HIDDEN_MARKER;

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Whether a basename starts with [`C_HIDDEN_MARKER`].
pub fn is_hidden_name(name: &OsStr) -> bool {
    let mut buf_marker = [0_u8; 4];
    let raw_marker = C_HIDDEN_MARKER.encode_utf8(&mut buf_marker).as_bytes();
    name.as_encoded_bytes().starts_with(raw_marker)
}

/// Lexically normalize a path.
///
/// Drops `.` components, folds `name/..` pairs and trailing separators without
/// touching the filesystem. `..` above an absolute root is discarded; leading `..`
/// of a relative path is kept. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut l_parts: Vec<Component<'_>> = Vec::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => match l_parts.last() {
                Some(Component::Normal(_)) => {
                    l_parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => l_parts.push(part),
            },
            _ => l_parts.push(part),
        }
    }

    if l_parts.is_empty() {
        return PathBuf::from(".");
    }
    l_parts.iter().collect()
}

/// Render `path` relative to `path_dir_root`, falling back to the full path when
/// it lies outside the root.
pub(crate) fn render_path_rel(path: &Path, path_dir_root: &Path) -> String {
    match path.strip_prefix(path_dir_root) {
        Ok(path_rel) if path_rel.as_os_str().is_empty() => ".".to_string(),
        Ok(path_rel) => path_rel.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DirectoryListing

/// One child of a listed directory.
#[derive(Debug, Clone)]
pub(crate) struct SpecDirChild {
    pub(crate) path_entry: PathBuf,
    pub(crate) name_entry: OsString,
    /// Directory after following symlinks.
    pub(crate) if_is_dir: bool,
    pub(crate) if_is_symlink: bool,
}

/// List the direct children of `path_dir`, sorted by name.
pub(crate) fn list_dir(path_dir: &Path) -> io::Result<Vec<SpecDirChild>> {
    let mut l_children = Vec::new();
    for entry_res in fs::read_dir(path_dir)? {
        let entry = entry_res?;
        let cfg_file_type = entry.file_type()?;
        let path_entry = entry.path();
        let b_is_symlink = cfg_file_type.is_symlink();
        let b_is_dir = cfg_file_type.is_dir() || (b_is_symlink && path_entry.is_dir());
        l_children.push(SpecDirChild {
            path_entry,
            name_entry: entry.file_name(),
            if_is_dir: b_is_dir,
            if_is_symlink: b_is_symlink,
        });
    }
    l_children.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
    Ok(l_children)
}

/// Filter a listing down to the entries a traversal should visit.
pub(crate) fn retain_visible(l_children: &mut Vec<SpecDirChild>, if_skip_hidden: bool) {
    if if_skip_hidden {
        l_children.retain(|c| !is_hidden_name(&c.name_entry));
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

/// Copy file bytes, permission bits and timestamps (plus xattrs on Linux),
/// replacing any existing destination file.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    fs::copy(path_file_src, path_file_dst)?;

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    {
        copy_xattrs_linux(path_file_src, path_file_dst);
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        if let Err(e) = xattr::set(path_file_dst, &name, &raw_value) {
            tracing::trace!(
                path = %path_file_dst.display(),
                xattr = %name.to_string_lossy(),
                "xattr not copied: {e}"
            );
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
