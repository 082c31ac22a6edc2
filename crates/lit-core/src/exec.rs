//! Running one external command against a deadline
//!
//! A timer thread races the child process. The timer only ever sets the
//! timeout flag; it never touches the child, so a command that overruns is
//! reported as [`ExecError::Timeout`] once it exits on its own. Killing a
//! runaway child is left to the caller.

use crate::error::{ExecError, ExecResult};
use crate::path_utils::which;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(unix)]
const SIGINT: i32 = 2;

/// Exit code and captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCmdResult {
    /// Exit status; `-N` when the process was killed by signal `N`
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// How to run a command
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Working directory; inherited when unset
    pub cwd: Option<PathBuf>,
    /// Complete child environment; inherited when unset
    pub env: Option<BTreeMap<String, String>>,
    /// Text written to the child's stdin, which is otherwise empty
    pub stdin: Option<String>,
    /// Deadline in milliseconds; zero or negative disables it
    pub timeout_ms: i64,
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Run `command` and wait for it to finish.
///
/// `command[0]` is looked up on the `PATH` of the child's environment unless
/// it contains a path separator. The timer, if any, has been joined by the
/// time this returns.
pub fn execute_command(command: &[String], options: &ExecOptions) -> ExecResult<RunCmdResult> {
    let (program, args) = command.split_first().ok_or(ExecError::EmptyCommand)?;
    let program_path = resolve_program(program, options)?;

    let mut cmd = Command::new(&program_path);
    cmd.args(args)
        .stdin(if options.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    if let Some(env) = &options.env {
        cmd.env_clear().envs(env);
    }

    let timed_out = Arc::new(AtomicBool::new(false));
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let timer = start_timer(options.timeout_ms, Arc::clone(&timed_out), done_rx);

    let outcome = run_child(cmd, options.stdin.as_deref());

    // Dropping the sender wakes the timer without setting the flag.
    drop(done_tx);
    if let Some(timer) = timer {
        let _ = timer.join();
    }

    let (status, stdout, stderr) = outcome.map_err(|source| ExecError::Spawn {
        command: program.clone(),
        source,
    })?;
    let result = RunCmdResult {
        exit_code: exit_code(&status),
        stdout,
        stderr,
    };

    if timed_out.load(Ordering::SeqCst) {
        return Err(ExecError::Timeout {
            timeout_ms: options.timeout_ms,
            partial: result,
        });
    }
    if was_interrupted(&status) {
        return Err(ExecError::Interrupted);
    }
    Ok(result)
}

fn resolve_program(program: &str, options: &ExecOptions) -> ExecResult<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 || path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let not_found = || ExecError::CommandNotFound(program.to_string());
    // An explicit environment is searched with its own PATH, even when unset.
    let search = match &options.env {
        Some(env) => Some(env.get("PATH").map(OsStr::new).ok_or_else(not_found)?),
        None => None,
    };
    which(path, search).ok_or_else(not_found)
}

/// Start the deadline timer, or `None` when there is no deadline or the
/// thread could not be spawned.
fn start_timer(
    timeout_ms: i64,
    timed_out: Arc<AtomicBool>,
    done: Receiver<()>,
) -> Option<JoinHandle<()>> {
    if timeout_ms <= 0 {
        return None;
    }
    let deadline = Duration::from_millis(timeout_ms as u64);

    thread::Builder::new()
        .name("lit-exec-timer".to_string())
        .spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = done.recv_timeout(deadline) {
                timed_out.store(true, Ordering::SeqCst);
            }
        })
        .ok()
}

fn run_child(mut cmd: Command, stdin: Option<&str>) -> std::io::Result<(ExitStatus, String, String)> {
    let mut child = cmd.spawn()?;

    // Feed stdin from its own thread so a chatty child can't deadlock us.
    let writer = match (child.stdin.take(), stdin) {
        (Some(mut pipe), Some(text)) => {
            let text = text.to_string();
            Some(thread::spawn(move || {
                let _ = pipe.write_all(text.as_bytes());
            }))
        }
        _ => None,
    };

    let output = child.wait_with_output()?;
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    Ok((
        output.status,
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    ))
}

#[cfg(unix)]
fn exit_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => -signal,
        (None, None) => -1,
    }
}

#[cfg(not(unix))]
fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(unix)]
fn was_interrupted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn was_interrupted(_status: &ExitStatus) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::tempdir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_captures_output_and_exit_code() {
        let result = execute_command(&sh("echo out; echo err >&2; exit 3"), &ExecOptions::new()).unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn test_stdin_is_forwarded() {
        let options = ExecOptions::new().with_stdin("hello\n");
        let result = execute_command(&["cat".to_string()], &options).unwrap();
        assert_eq!(result.stdout, "hello\n");
    }

    #[test]
    fn test_stdin_defaults_to_empty() {
        let result = execute_command(&["cat".to_string()], &ExecOptions::new()).unwrap();
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_env_replaces_environment() {
        let mut env = BTreeMap::new();
        env.insert("PATH".to_string(), std::env::var("PATH").unwrap_or_default());
        env.insert("LIT_EXEC_EXTRA".to_string(), "42".to_string());
        let options = ExecOptions::new().with_env(env);

        let result = execute_command(&sh("echo $LIT_EXEC_EXTRA-${HOME:-unset}"), &options).unwrap();
        assert_eq!(result.stdout, "42-unset\n");
    }

    #[test]
    fn test_cwd() {
        let dir = tempdir().unwrap();
        let options = ExecOptions::new().with_cwd(dir.path());
        let result = execute_command(&["pwd".to_string()], &options).unwrap();
        assert_eq!(
            PathBuf::from(result.stdout.trim()).canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_timeout() {
        let options = ExecOptions::new().with_timeout_ms(100);
        let err = execute_command(&sh("echo started; sleep 1"), &options).unwrap_err();
        match err {
            ExecError::Timeout { timeout_ms, partial } => {
                assert_eq!(timeout_ms, 100);
                assert_eq!(partial.stdout, "started\n");
                assert_eq!(partial.exit_code, 0);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_fast_command_does_not_wait_for_timer() {
        let options = ExecOptions::new().with_timeout_ms(10_000);
        let start = Instant::now();
        let result = execute_command(&sh("exit 0"), &options).unwrap();
        assert_eq!(result.exit_code, 0);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_non_positive_timeout_never_fires() {
        for timeout_ms in [0, -5] {
            let options = ExecOptions::new().with_timeout_ms(timeout_ms);
            let result = execute_command(&sh("sleep 0.2; echo done"), &options).unwrap();
            assert_eq!(result.stdout, "done\n");
        }
    }

    #[test]
    fn test_interrupt_is_distinct() {
        let err = execute_command(&sh("kill -INT $$"), &ExecOptions::new()).unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_other_signal_maps_to_negative_code() {
        let result = execute_command(&sh("kill -TERM $$"), &ExecOptions::new()).unwrap();
        assert_eq!(result.exit_code, -15);
    }

    #[test]
    fn test_unknown_and_empty_commands() {
        let err = execute_command(
            &["lit-no-such-command-anywhere".to_string()],
            &ExecOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ExecError::CommandNotFound(_)));

        let err = execute_command(&[], &ExecOptions::new()).unwrap_err();
        assert!(matches!(err, ExecError::EmptyCommand));
    }
}
