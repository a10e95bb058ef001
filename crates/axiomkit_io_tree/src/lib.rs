//! `axiomkit_io_tree` v1:
//! Rust-side directory-tree copy and verification kernel.
//!
//! Module layout (copier and verifier share `util` traversal helpers):
//! - `conf`   : constants
//! - `copy`   : manifest enumeration and replay
//! - `verify` : actual-tree traversal and set comparison
//! - `spec`   : options/manifest/errors
//! - `report` : tree-diff report model
//! - `util`   : shared helper functions

pub mod conf;
pub mod copy;
pub mod report;
pub mod spec;
mod util;
pub mod verify;

pub use conf::C_HIDDEN_MARKER;
pub use copy::{collect_manifest, copy_tree};
pub use report::ReportTreeDiff;
pub use spec::{
    AssertDirectoryError, CopyTreeError, SpecAssertOptions, SpecCopyOptions, SpecManifestEntry,
};
pub use util::{is_hidden_name, normalize_path};
pub use verify::{assert_directory, collect_actual, diff_tree};
