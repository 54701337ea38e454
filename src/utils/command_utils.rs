//! Command execution utility functions
//!
//! Every child runs synchronously: the wrapper blocks until it exits.

use std::{
    ffi::OsStr,
    fmt::Debug,
    path::Path,
    process::{Command, Output},
};

use crate::{
    arg_parser::CompileMode,
    constants::{CCACHE_COMMAND_NAME, GENERIC_FAILURE_EXIT_CODE},
    error::Error,
};

/// Run `args[0]` with the remaining arguments and return its exit code.
///
/// A child killed by a signal reports the generic failure code.
pub fn execute_command<S>(args: &[S], mode: CompileMode) -> Result<i32, Error>
where
    S: AsRef<OsStr> + Debug,
{
    run_command(args, mode, None)
}

/// [`execute_command`] with `work_dir` as the child's working directory
pub fn execute_command_in_dir<S, P>(args: &[S], mode: CompileMode, work_dir: P) -> Result<i32, Error>
where
    S: AsRef<OsStr> + Debug,
    P: AsRef<Path>,
{
    run_command(args, mode, Some(work_dir.as_ref()))
}

fn run_command<S>(args: &[S], mode: CompileMode, work_dir: Option<&Path>) -> Result<i32, Error>
where
    S: AsRef<OsStr> + Debug,
{
    let Some((program, rest)) = args.split_first() else {
        return Err(Error::InvalidArguments(
            "The number of arguments cannot be 0".into(),
        ));
    };

    tracing::debug!("[{:?}] Arguments: {:?}", mode, args);
    let mut command = Command::new(program);
    command.args(rest);
    if let Some(work_dir) = work_dir {
        tracing::debug!("[{:?}] Working directory: {:?}", mode, work_dir);
        command.current_dir(work_dir);
    }
    let status = command.status()?;
    tracing::debug!("[{:?}] Exit status: {}", mode, status);

    Ok(status.code().unwrap_or_else(|| {
        tracing::warn!("[{:?}] {:?} was terminated by a signal", mode, program);
        GENERIC_FAILURE_EXIT_CODE
    }))
}

/// Like [`execute_command`], but turns a non-zero exit into [`Error::CommandFailed`]
pub fn execute_command_checked<S>(args: &[S], mode: CompileMode) -> Result<(), Error>
where
    S: AsRef<OsStr> + Debug,
{
    match execute_command(args, mode)? {
        0 => Ok(()),
        code => Err(Error::CommandFailed {
            program: args
                .first()
                .map(|program| program.as_ref().to_string_lossy().into_owned())
                .unwrap_or_default(),
            code,
        }),
    }
}

pub fn execute_command_for_output<P, S>(program_filepath: P, args: &[S]) -> Result<Output, Error>
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let program_filepath = program_filepath.as_ref();
    Command::new(program_filepath)
        .args(args)
        .output()
        .map_err(Error::Io)
}

pub fn execute_command_for_stdout_string<P, S>(
    program_filepath: P,
    args: &[S],
) -> Result<String, Error>
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let output = execute_command_for_output(program_filepath, args)?;
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Command name of the parent process, as reported by `ps`
#[cfg(unix)]
pub fn parent_process_name() -> Option<String> {
    let ppid = std::os::unix::process::parent_id().to_string();
    match execute_command_for_stdout_string("ps", &["-o", "comm=", "-p", &ppid]) {
        Ok(name) if !name.is_empty() => Some(name),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!("Failed to query the parent process: {}", err);
            None
        }
    }
}

#[cfg(not(unix))]
pub fn parent_process_name() -> Option<String> {
    None
}

/// Returns `true` if the parent process is ccache, i.e., we are being run
/// as its preprocessor stage
pub fn is_invoked_from_ccache() -> bool {
    parent_process_name().is_some_and(|name| is_ccache_command(&name))
}

fn is_ccache_command(name: &str) -> bool {
    Path::new(name.trim())
        .file_name()
        .is_some_and(|file_name| file_name == CCACHE_COMMAND_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ccache_command() {
        assert!(is_ccache_command("ccache"));
        assert!(is_ccache_command("/usr/bin/ccache\n"));
        assert!(!is_ccache_command("make"));
        assert!(!is_ccache_command("sccache"));
    }

    #[test]
    fn test_execute_command_rejects_empty_args() {
        let args: [&str; 0] = [];
        assert!(execute_command(&args, CompileMode::Compiling).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_command_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let code =
            execute_command_in_dir(&["touch", "marker"], CompileMode::Archiving, dir.path())
                .unwrap();
        assert_eq!(code, 0);
        assert!(dir.path().join("marker").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_command_reports_exit_code() {
        let code = execute_command(&["sh", "-c", "exit 7"], CompileMode::Compiling).unwrap();
        assert_eq!(code, 7);

        let err = execute_command_checked(&["sh", "-c", "exit 3"], CompileMode::Linking)
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
