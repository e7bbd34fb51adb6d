/// Execution Engine - Candidate Process Execution
///
/// **Core Responsibility:**
/// Compile (when the profile asks for it) and run a candidate program,
/// feeding fixture input to stdin and capturing raw outputs under timing.
///
/// **Critical Architectural Boundary:**
/// - Engine knows HOW to execute (shell dispatch, pipes, timeouts)
/// - Engine does NOT compare outputs or decide pass/fail
/// - Engine returns raw outputs for the evaluator to grade
///
/// Commands come from plain-text templates holding two placeholders:
/// `{file}` (absolute path to the candidate source) and `{fileNoExt}` (that
/// path without its extension). Substitution is literal, one pass, and the
/// substituted path is double-quoted for the shell.
use crate::evaluator::ExecutionOutput;
use gavel_common::error::{GavelError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Per-fixture wall-clock bound when neither the profile nor the caller sets
/// one. A candidate that never terminates must not block the run forever.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// The compile step is one blocking call gating the whole run; bound it too.
pub const COMPILE_TIMEOUT_MS: u64 = 60_000;

/// Raw result of one spawned command.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_ok: bool,
    pub timed_out: bool,
    pub duration_ms: f64,
}

/// Substitute the path placeholders into a command template.
pub fn substitute(template: &str, file: &Path) -> String {
    let full = file.display().to_string();
    let no_ext = file.with_extension("").display().to_string();
    template
        .replace("{file}", &format!("\"{}\"", full))
        .replace("{fileNoExt}", &format!("\"{}\"", no_ext))
}

/// Spawn `command` through the shell, write `stdin_data` and close the
/// stream, drain both output streams, and await termination within
/// `timeout_ms`. On expiry the child is killed and the partial state is
/// returned with `timed_out` set.
pub async fn run_command(command: &str, stdin_data: &str, timeout_ms: u64) -> Result<RunOutput> {
    let start = Instant::now();

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GavelError::ProcessSpawnFailure(e.to_string()))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| GavelError::ProcessSpawnFailure("stdout pipe unavailable".to_string()))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| GavelError::ProcessSpawnFailure("stderr pipe unavailable".to_string()))?;

    // Drain both streams concurrently with the wait; a candidate that fills
    // a pipe buffer would otherwise deadlock against us.
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    if let Some(mut stdin) = child.stdin.take() {
        if !stdin_data.is_empty() {
            // A candidate may exit without reading its input; a broken pipe
            // here is the candidate's business, not a harness failure.
            if let Err(e) = stdin.write_all(stdin_data.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(GavelError::ProcessSpawnFailure(e.to_string()));
                }
            }
        }
        // Dropping the handle closes the stream and signals end-of-input.
        drop(stdin);
    }

    let mut timed_out = false;
    let exit_ok = match tokio::time::timeout(Duration::from_millis(timeout_ms), child.wait()).await
    {
        Ok(status) => status
            .map_err(|e| GavelError::ProcessSpawnFailure(e.to_string()))?
            .success(),
        Err(_) => {
            timed_out = true;
            let _ = child.start_kill();
            // Reap the killed child so its pipes close and the readers finish.
            let _ = child.wait().await;
            false
        }
    };

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let stdout = String::from_utf8_lossy(&stdout_task.await.unwrap_or_default()).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_task.await.unwrap_or_default()).into_owned();

    Ok(RunOutput {
        stdout,
        stderr,
        exit_ok,
        timed_out,
        duration_ms,
    })
}

/// Run the compile template once, before any fixture.
///
/// Any diagnostic output or a non-zero exit aborts the whole run: nothing is
/// worth executing against a candidate that did not build cleanly.
pub async fn compile(template: &str, file: &Path) -> Result<()> {
    let command = substitute(template, file);
    info!(command = %command, "compiling candidate");

    let output = run_command(&command, "", COMPILE_TIMEOUT_MS).await?;

    if output.timed_out {
        return Err(GavelError::CompilationFailure(format!(
            "compile step exceeded {}ms",
            COMPILE_TIMEOUT_MS
        )));
    }
    if !output.exit_ok || !output.stderr.trim().is_empty() {
        let diagnostics = if output.stderr.trim().is_empty() {
            output.stdout
        } else {
            output.stderr
        };
        return Err(GavelError::CompilationFailure(diagnostics));
    }

    debug!(duration_ms = output.duration_ms, "compilation succeeded");
    Ok(())
}

/// Execute one fixture: spawn the run command, feed the input, capture the
/// raw streams and the wall-clock duration.
pub async fn run_fixture(
    command: &str,
    index: u32,
    stdin_data: &str,
    timeout_ms: u64,
) -> Result<ExecutionOutput> {
    debug!(fixture = index, "spawning candidate");
    let output = run_command(command, stdin_data, timeout_ms).await?;

    let stderr = if output.timed_out {
        warn!(fixture = index, timeout_ms, "fixture timed out");
        format!("time limit of {}ms exceeded", timeout_ms)
    } else {
        output.stderr
    };

    Ok(ExecutionOutput {
        index,
        stdout: output.stdout,
        stderr,
        exit_ok: output.exit_ok,
        timed_out: output.timed_out,
        duration_ms: output.duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn substitution_is_literal_and_quoted() {
        let file = PathBuf::from("/work/p/solution.py");
        assert_eq!(
            substitute("python3 {file}", &file),
            "python3 \"/work/p/solution.py\""
        );
        assert_eq!(
            substitute("g++ {file} -o {fileNoExt}", &file),
            "g++ \"/work/p/solution.py\" -o \"/work/p/solution\""
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn echo_program_round_trips_stdin() {
        let output = run_command("cat", "[1,2,3]\n7", 5_000).await.unwrap();
        assert!(output.exit_ok);
        assert!(!output.timed_out);
        assert_eq!(output.stdout, "[1,2,3]\n7");
        assert!(output.duration_ms > 0.0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_reported() {
        let output = run_command("echo boom 1>&2; exit 3", "", 5_000).await.unwrap();
        assert!(!output.exit_ok);
        assert!(output.stderr.contains("boom"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_process_is_killed_at_the_limit() {
        let start = Instant::now();
        let output = run_command("sleep 5", "", 200).await.unwrap();
        assert!(output.timed_out);
        assert!(!output.exit_ok);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn compile_diagnostics_abort() {
        let err = compile("echo nope 1>&2", Path::new("/tmp/x.cpp"))
            .await
            .unwrap_err();
        match err {
            GavelError::CompilationFailure(diag) => assert!(diag.contains("nope")),
            other => panic!("expected CompilationFailure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clean_compile_passes() {
        compile("true", Path::new("/tmp/x.cpp")).await.unwrap();
    }
}
