//! `axiomkit_testkit` v1:
//! Integration-test scaffolding around `axiomkit_io_tree`.
//!
//! Module layout:
//! - `stage`    : staging root, unique stage directories and `pushd`
//! - `process`  : run external commands to completion
//! - `git`      : throwaway repositories with committed placeholder files
//! - `redirect` : HTML redirect matchers
//! - `logging`  : test subscriber setup
//! - `spec`     : options and errors

pub mod git;
pub mod logging;
pub mod process;
pub mod redirect;
pub mod spec;
pub mod stage;

pub use axiomkit_io_tree::{
    AssertDirectoryError, CopyTreeError, ReportTreeDiff, SpecAssertOptions, SpecCopyOptions,
    assert_directory, copy_tree,
};
pub use git::{C_COMMIT_MESSAGE_DEFAULT, commit_files, git_config, git_init};
pub use logging::init_test_logging;
pub use process::{check_call_silent, check_output};
pub use redirect::{match_redir, pattern_redir};
pub use spec::{CommandError, SpecGitIdentity, SpecStageOptions, StageError};
pub use stage::{PushdGuard, init_stage_root, pushd, stage_dir};
