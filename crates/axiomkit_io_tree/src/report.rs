//! Tree-diff report model.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::render_path_rel;

/// Outcome of comparing an on-disk tree with an expected entry set.
///
/// Paths are stored normalized and absolute-to-root (joined onto
/// `path_dir_root`); rendering strips the root again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTreeDiff {
    /// Normalized verification root.
    pub path_dir_root: PathBuf,
    /// Expected entries not found on disk.
    pub missing: BTreeSet<PathBuf>,
    /// On-disk entries that were not expected.
    pub extra: BTreeSet<PathBuf>,
    /// Extra entries are tolerated (superset check).
    pub if_allow_extra: bool,
}

impl ReportTreeDiff {
    /// Build a report from the two normalized sets.
    pub fn from_sets(
        path_dir_root: &Path,
        set_expected: &BTreeSet<PathBuf>,
        set_actual: &BTreeSet<PathBuf>,
        if_allow_extra: bool,
    ) -> Self {
        Self {
            path_dir_root: path_dir_root.to_path_buf(),
            missing: set_expected.difference(set_actual).cloned().collect(),
            extra: set_actual.difference(set_expected).cloned().collect(),
            if_allow_extra,
        }
    }

    /// Whether the tree satisfies the comparison policy.
    pub fn is_match(&self) -> bool {
        self.missing.is_empty() && (self.if_allow_extra || self.extra.is_empty())
    }

    /// Missing entries rendered relative to the root, sorted.
    pub fn missing_rel(&self) -> Vec<String> {
        self.render_rel(&self.missing)
    }

    /// Extra entries rendered relative to the root, sorted.
    pub fn extra_rel(&self) -> Vec<String> {
        self.render_rel(&self.extra)
    }

    fn render_rel(&self, set_paths: &BTreeSet<PathBuf>) -> Vec<String> {
        set_paths
            .iter()
            .map(|p| render_path_rel(p, &self.path_dir_root))
            .collect()
    }

    /// Human-readable failure text.
    ///
    /// Superset checks only mention missing entries.
    pub fn format(&self) -> String {
        if self.if_allow_extra {
            return format!("missing: {:?}", self.missing_rel());
        }
        format!(
            "missing: {:?}, extra: {:?}",
            self.missing_rel(),
            self.extra_rel()
        )
    }
}

impl fmt::Display for ReportTreeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
