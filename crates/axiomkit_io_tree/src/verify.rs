//! On-disk tree verification against an expected entry set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::report::ReportTreeDiff;
use crate::spec::{AssertDirectoryError, SpecAssertOptions};
use crate::util::{list_dir, normalize_path, retain_visible};

/// Assert that `dir_root` holds exactly the `expected` entries.
///
/// `expected` paths are relative to `dir_root` and cover files and directories at
/// every depth (`a` and `a/b` are separate entries). With
/// [`SpecAssertOptions::if_allow_extra`] the check becomes "expected is a subset
/// of actual". A missing root is walked as an empty tree.
///
/// Returns [`AssertDirectoryError::Mismatch`] carrying the missing/extra report
/// once traversal has finished.
pub fn assert_directory<P, I, S>(
    dir_root: P,
    expected: I,
    spec_as_options: SpecAssertOptions,
) -> Result<(), AssertDirectoryError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let report = diff_tree(dir_root, expected, spec_as_options)?;
    if report.is_match() {
        return Ok(());
    }
    debug!(root = %report.path_dir_root.display(), "tree mismatch: {report}");
    Err(AssertDirectoryError::Mismatch(report))
}

/// Compare `dir_root` with `expected` and return the diff without failing on
/// mismatch.
pub fn diff_tree<P, I, S>(
    dir_root: P,
    expected: I,
    spec_as_options: SpecAssertOptions,
) -> Result<ReportTreeDiff, AssertDirectoryError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let path_dir_root = normalize_path(dir_root.as_ref());
    let set_actual = collect_actual(&path_dir_root, spec_as_options.if_include_hidden)?;
    let set_expected: BTreeSet<PathBuf> = expected
        .into_iter()
        .map(|p| normalize_path(&path_dir_root.join(p.as_ref())))
        .collect();

    Ok(ReportTreeDiff::from_sets(
        &path_dir_root,
        &set_expected,
        &set_actual,
        spec_as_options.if_allow_extra,
    ))
}

/// Collect every file and directory under `dir_root`, each joined onto the
/// normalized root and normalized again (a `.` root yields bare relative paths).
///
/// Without `if_include_hidden`, hidden entries are dropped before descending.
/// Directory symlinks are listed but not entered. A root that is not an existing
/// directory yields an empty set.
pub fn collect_actual<P>(
    dir_root: P,
    if_include_hidden: bool,
) -> Result<BTreeSet<PathBuf>, AssertDirectoryError>
where
    P: AsRef<Path>,
{
    let path_dir_root = normalize_path(dir_root.as_ref());
    let mut set_actual = BTreeSet::new();
    if !path_dir_root.is_dir() {
        debug!(root = %path_dir_root.display(), "root is not a directory; empty tree");
        return Ok(set_actual);
    }
    walk_directory(&path_dir_root, !if_include_hidden, &mut set_actual)?;
    Ok(set_actual)
}

fn walk_directory(
    path_root: &Path,
    if_skip_hidden: bool,
    set_actual: &mut BTreeSet<PathBuf>,
) -> Result<(), AssertDirectoryError> {
    let mut l_children = list_dir(path_root).map_err(|e| AssertDirectoryError::Io {
        path: path_root.to_path_buf(),
        source: e,
    })?;
    retain_visible(&mut l_children, if_skip_hidden);

    for spec_child in l_children {
        if spec_child.if_is_dir && !spec_child.if_is_symlink {
            walk_directory(&spec_child.path_entry, if_skip_hidden, set_actual)?;
        }
        set_actual.insert(normalize_path(&spec_child.path_entry));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::{assert_directory, collect_actual, diff_tree};
    use crate::spec::{AssertDirectoryError, SpecAssertOptions};

    const L_NONE: [&str; 0] = [];

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, txt).expect("write text");
    }

    fn mismatch_text(err: AssertDirectoryError) -> String {
        match err {
            AssertDirectoryError::Mismatch(report) => report.to_string(),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn make_abc(tmp: &TempDir) {
        write_text(&tmp.path().join("a/b"), "b");
        write_text(&tmp.path().join("c"), "c");
    }

    #[test]
    fn assert_directory_exact_match_passes() {
        let tmp = TempDir::new().expect("tempdir");
        make_abc(&tmp);

        assert_directory(tmp.path(), ["a", "a/b", "c"], SpecAssertOptions::default())
            .expect("exact match");
    }

    #[test]
    fn assert_directory_reports_extra_subentries() {
        let tmp = TempDir::new().expect("tempdir");
        make_abc(&tmp);

        let err = assert_directory(tmp.path(), ["a", "c"], SpecAssertOptions::default())
            .expect_err("must fail");
        let report = err.report().expect("mismatch report").clone();
        assert!(report.missing_rel().is_empty());
        assert_eq!(
            report.extra_rel(),
            vec![Path::new("a").join("b").to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn assert_directory_reports_missing_entries() {
        let tmp = TempDir::new().expect("tempdir");
        make_abc(&tmp);

        let err = assert_directory(
            tmp.path(),
            ["a", "a/b", "c", "d"],
            SpecAssertOptions::default(),
        )
        .expect_err("must fail");
        assert_eq!(mismatch_text(err), r#"missing: ["d"], extra: []"#);
    }

    #[test]
    fn assert_directory_allow_extra_is_superset_check() {
        let tmp = TempDir::new().expect("tempdir");
        write_text(&tmp.path().join("a"), "a");
        write_text(&tmp.path().join("b"), "b");

        let spec_as_options = SpecAssertOptions {
            if_allow_extra: true,
            ..SpecAssertOptions::default()
        };
        assert_directory(tmp.path(), ["a"], spec_as_options).expect("superset passes");

        let err = assert_directory(tmp.path(), ["a"], SpecAssertOptions::default())
            .expect_err("exact must fail");
        assert_eq!(mismatch_text(err), r#"missing: [], extra: ["b"]"#);

        let err = assert_directory(tmp.path(), ["a", "z"], spec_as_options)
            .expect_err("missing must fail");
        assert_eq!(mismatch_text(err), r#"missing: ["z"]"#);
    }

    #[test]
    fn assert_directory_hidden_excluded_by_default() {
        let tmp = TempDir::new().expect("tempdir");
        write_text(&tmp.path().join(".x"), "x");

        assert_directory(tmp.path(), L_NONE, SpecAssertOptions::default())
            .expect("hidden ignored");

        let spec_as_options = SpecAssertOptions {
            if_include_hidden: true,
            ..SpecAssertOptions::default()
        };
        let err = assert_directory(tmp.path(), L_NONE, spec_as_options).expect_err("must fail");
        assert_eq!(mismatch_text(err), r#"missing: [], extra: [".x"]"#);
    }

    #[test]
    fn collect_actual_prunes_hidden_directories() {
        let tmp = TempDir::new().expect("tempdir");
        write_text(&tmp.path().join(".git/objects/pack"), "p");
        write_text(&tmp.path().join("docs/.nojekyll"), "");
        write_text(&tmp.path().join("docs/index.html"), "i");

        let set_visible = collect_actual(tmp.path(), false).expect("walk");
        assert_eq!(set_visible.len(), 2);
        assert!(set_visible.contains(&tmp.path().join("docs")));
        assert!(set_visible.contains(&tmp.path().join("docs/index.html")));

        let set_all = collect_actual(tmp.path(), true).expect("walk");
        assert_eq!(set_all.len(), 6);
    }

    #[test]
    fn assert_directory_normalizes_expected_paths() {
        let tmp = TempDir::new().expect("tempdir");
        make_abc(&tmp);

        assert_directory(
            tmp.path().join("a/.."),
            ["./a/", "a/x/../b", "c"],
            SpecAssertOptions::default(),
        )
        .expect("normalized match");
    }

    #[test]
    fn assert_directory_missing_root_is_empty_tree() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join("nope");

        assert_directory(&root, L_NONE, SpecAssertOptions::default()).expect("empty passes");
        let err = assert_directory(&root, ["a"], SpecAssertOptions::default())
            .expect_err("must fail");
        assert_eq!(mismatch_text(err), r#"missing: ["a"], extra: []"#);
    }

    #[test]
    fn diff_tree_returns_report_without_failing() {
        let tmp = TempDir::new().expect("tempdir");
        make_abc(&tmp);

        let report = diff_tree(tmp.path(), ["a", "q"], SpecAssertOptions::default())
            .expect("diff");
        assert!(!report.is_match());
        assert_eq!(report.missing_rel(), vec!["q".to_string()]);
        assert_eq!(report.extra_rel().len(), 2);
    }

    #[test]
    fn collect_actual_entries_are_normalized() {
        let tmp = TempDir::new().expect("tempdir");
        make_abc(&tmp);

        let set_actual = collect_actual(tmp.path(), false).expect("walk");
        for path in &set_actual {
            assert_eq!(path, &crate::util::normalize_path(path));
        }
    }

    #[cfg(unix)]
    #[test]
    fn assert_directory_unreadable_subdir_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tempdir");
        let path_dir_locked = tmp.path().join("locked");
        write_text(&path_dir_locked.join("inner.txt"), "i");
        std::fs::set_permissions(&path_dir_locked, std::fs::Permissions::from_mode(0o000))
            .expect("chmod 000");

        // Privileged users can still list the directory.
        if std::fs::read_dir(&path_dir_locked).is_ok() {
            std::fs::set_permissions(&path_dir_locked, std::fs::Permissions::from_mode(0o755))
                .expect("restore mode");
            return;
        }

        let res = assert_directory(
            tmp.path(),
            ["locked", "locked/inner.txt"],
            SpecAssertOptions::default(),
        );
        std::fs::set_permissions(&path_dir_locked, std::fs::Permissions::from_mode(0o755))
            .expect("restore mode");

        match res.expect_err("must fail") {
            AssertDirectoryError::Io { path, .. } => assert_eq!(path, path_dir_locked),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn collect_actual_lists_but_does_not_enter_dir_symlinks() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().expect("tempdir");
        write_text(&tmp.path().join("real/file.txt"), "f");
        symlink(tmp.path().join("real"), tmp.path().join("link")).expect("create symlink");

        assert_directory(
            tmp.path(),
            ["real", "real/file.txt", "link"],
            SpecAssertOptions::default(),
        )
        .expect("link listed, not entered");
    }
}
