//! Run external commands to completion.

use std::ffi::{OsStr, OsString};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::spec::CommandError;

/// Run `program` with its standard output and error discarded.
///
/// A nonzero exit becomes [`CommandError::Failed`].
pub fn check_call_silent<I, S>(program: &str, args: I) -> Result<(), CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let l_args = collect_args(args);
    let status = Command::new(program)
        .args(&l_args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| spawn_error(program, e))?;
    check_status(program, &l_args, status)
}

/// Run `program` and return its standard output as text.
///
/// Standard error is passed through to the caller's terminal.
pub fn check_output<I, S>(program: &str, args: I) -> Result<String, CommandError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let l_args = collect_args(args);
    let output = Command::new(program)
        .args(&l_args)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| spawn_error(program, e))?;
    check_status(program, &l_args, output.status)?;
    String::from_utf8(output.stdout).map_err(|_| CommandError::Utf8 {
        program: program.to_string(),
    })
}

fn collect_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}

fn check_status(
    program: &str,
    l_args: &[OsString],
    status: ExitStatus,
) -> Result<(), CommandError> {
    debug!(program, ?l_args, %status, "command finished");
    if status.success() {
        return Ok(());
    }
    Err(CommandError::Failed {
        program: program.to_string(),
        args: l_args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect(),
        status,
    })
}

fn spawn_error(program: &str, source: std::io::Error) -> CommandError {
    CommandError::Spawn {
        program: program.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{check_call_silent, check_output};
    use crate::spec::CommandError;

    const L_NO_ARGS: [&str; 0] = [];

    #[test]
    fn check_output_captures_stdout() {
        let txt = check_output("rustc", ["--version"]).expect("rustc --version");
        assert!(txt.starts_with("rustc "));
    }

    #[test]
    fn check_call_silent_succeeds_on_zero_exit() {
        check_call_silent("rustc", ["--version"]).expect("rustc --version");
    }

    #[test]
    fn check_call_silent_fails_on_nonzero_exit() {
        let err = check_call_silent("rustc", ["--axiomkit-no-such-flag"]).expect_err("must fail");
        match err {
            CommandError::Failed { program, args, status } => {
                assert_eq!(program, "rustc");
                assert_eq!(args, vec!["--axiomkit-no-such-flag".to_string()]);
                assert!(!status.success());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = check_output("axiomkit-no-such-program", L_NO_ARGS).expect_err("must fail");
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
