//! Bounded execution of the LADR binaries
//!
//! Every run writes its input to a fresh, uniquely named temporary file,
//! starts the binary from its own directory (Prover9 and Mace4 look for
//! sibling resources there), waits at most the configured wall-clock
//! bound, and kills the child when the bound is exceeded. The input file
//! is removed on every exit path; removal failures are ignored.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Serialize;
use tempfile::TempPath;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// The process exited on its own
    Completed { exit_code: Option<i32> },
    /// The wall-clock bound was hit and the process was killed
    TimedOut { limit_secs: u64 },
    /// The process could not be started or its streams could not be read
    LaunchFailed { reason: String },
}

/// Captured streams and status of one process invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawProverOutput {
    pub stdout: String,
    pub stderr: String,
    #[serde(flatten)]
    pub status: RunStatus,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RawProverOutput {
    pub fn completed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: RunStatus::Completed { exit_code: Some(0) },
            elapsed: Duration::ZERO,
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            status: RunStatus::TimedOut {
                limit_secs: limit.as_secs(),
            },
            elapsed: limit,
        }
    }

    pub fn launch_failed(reason: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            status: RunStatus::LaunchFailed {
                reason: reason.into(),
            },
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.status, RunStatus::TimedOut { .. })
    }
}

/// Synthesized input file owned by a single run.
///
/// Dropping it deletes the file as a backstop for cancelled runs;
/// [`InputFile::remove`] deletes it eagerly.
#[derive(Debug)]
pub struct InputFile {
    path: TempPath,
}

impl InputFile {
    /// Write `content` to a new uniquely named `.in` file in the system
    /// temp directory
    pub fn create(content: &str) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("ladr-")
            .suffix(".in")
            .tempfile()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file, swallowing any failure
    pub fn remove(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            debug!(path = %shown, error = %e, "Could not remove input file");
        }
    }
}

/// Runs one LADR binary against synthesized input files
#[derive(Debug, Clone)]
pub struct ProverProcessRunner {
    binary: PathBuf,
    working_dir: PathBuf,
}

impl ProverProcessRunner {
    /// Runner for `binary`, started from the binary's own directory
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        let binary = binary.into();
        let working_dir = binary
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            binary,
            working_dir,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Write `content` to a fresh input file and run against it
    pub async fn run_text(&self, content: &str, options: &[String], limit: Duration) -> RawProverOutput {
        debug!("Created input file content:\n{}", content);
        match InputFile::create(content) {
            Ok(input) => self.run(input, options, limit).await,
            Err(e) => {
                error!(error = %e, "Failed to create input file");
                RawProverOutput::launch_failed(format!("Failed to create input file: {}", e))
            }
        }
    }

    /// Run `binary options... -f <input>` bounded by `limit`.
    ///
    /// Never fails: launch and I/O errors become
    /// [`RunStatus::LaunchFailed`]. The input file is consumed and removed.
    pub async fn run(&self, input: InputFile, options: &[String], limit: Duration) -> RawProverOutput {
        let mut args: Vec<OsString> = options.iter().map(OsString::from).collect();
        args.push("-f".into());
        args.push(input.path().as_os_str().to_owned());

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(binary = %self.binary.display(), ?args, "Running");
        let output = run_bounded(cmd, limit).await;
        input.remove();

        if !output.stdout.is_empty() {
            debug!("stdout:\n{}", output.stdout);
        }
        if !output.stderr.is_empty() {
            debug!("stderr:\n{}", output.stderr);
        }
        output
    }
}

/// Spawn `cmd`, collect both streams, and kill the child once `limit`
/// elapses.
pub async fn run_bounded(mut cmd: Command, limit: Duration) -> RawProverOutput {
    let start = Instant::now();

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!(error = %e, "Failed to spawn process");
            return RawProverOutput::launch_failed(format!("Failed to start process: {}", e));
        }
    };

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let result = timeout(limit, async {
        let mut stdout = String::new();
        let mut stderr = String::new();

        let (status, stdout_result, stderr_result) = tokio::join!(
            child.wait(),
            async {
                if let Some(mut handle) = stdout_handle {
                    if let Err(e) = handle.read_to_string(&mut stdout).await {
                        debug!(error = %e, "stdout was not fully read");
                    }
                }
                stdout
            },
            async {
                if let Some(mut handle) = stderr_handle {
                    if let Err(e) = handle.read_to_string(&mut stderr).await {
                        debug!(error = %e, "stderr was not fully read");
                    }
                }
                stderr
            }
        );

        Ok::<_, std::io::Error>((status?, stdout_result, stderr_result))
    })
    .await;

    let elapsed = start.elapsed();

    match result {
        Ok(Ok((status, stdout, stderr))) => RawProverOutput {
            stdout,
            stderr,
            status: RunStatus::Completed {
                exit_code: status.code(),
            },
            elapsed,
        },
        Ok(Err(e)) => {
            error!(error = %e, "Process I/O failed");
            let _ = child.kill().await;
            RawProverOutput {
                elapsed,
                ..RawProverOutput::launch_failed(format!("Process I/O failed: {}", e))
            }
        }
        Err(_) => {
            warn!("Process timed out after {:?}", limit);
            let _ = child.kill().await;
            RawProverOutput {
                elapsed,
                ..RawProverOutput::timed_out(limit)
            }
        }
    }
}
