use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};

use crate::draft::CommandDraft;
use crate::error::Error;

/// Lines of captured output kept for display.
const OUTPUT_TAIL_LINES: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Succeeded { output: Vec<String> },
    /// Ran but exited non-zero. `code` is `None` when killed by a signal.
    Failed { code: Option<i32>, output: Vec<String> },
    /// The binary couldn't be started at all.
    SpawnFailed { message: String },
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded { .. })
    }

    pub fn output(&self) -> &[String] {
        match self {
            ExecutionOutcome::Succeeded { output } | ExecutionOutcome::Failed { output, .. } => {
                output.as_slice()
            }
            ExecutionOutcome::SpawnFailed { .. } => &[],
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ExecutionOutcome::Succeeded { .. } => "Command finished successfully".to_string(),
            ExecutionOutcome::Failed { code: Some(code), .. } => {
                format!("Command exited with status {}", code)
            }
            ExecutionOutcome::Failed { code: None, .. } => {
                "Command was terminated by a signal".to_string()
            }
            ExecutionOutcome::SpawnFailed { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    NotStarted,
    Running,
    Finished(ExecutionOutcome),
}

/// Runs `binary args..` in `workdir` and waits for it. stdin is closed and
/// output is captured so it can't draw over the TUI.
pub fn execute(binary: &str, args: &[String], workdir: &Path) -> ExecutionOutcome {
    info!("Executing `{} {}` in {}", binary, args.join(" "), workdir.display());

    let result = Command::new(binary)
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::Spawn {
            binary: binary.to_string(),
            source,
        });

    let outcome = match result {
        Ok(output) => {
            let tail = output_tail(&output);
            if output.status.success() {
                ExecutionOutcome::Succeeded { output: tail }
            } else {
                ExecutionOutcome::Failed {
                    code: output.status.code(),
                    output: tail,
                }
            }
        }
        Err(e) => ExecutionOutcome::SpawnFailed {
            message: e.to_string(),
        },
    };

    if outcome.success() {
        info!("{}", outcome.summary());
    } else {
        warn!("{}", outcome.summary());
    }
    outcome
}

fn output_tail(output: &Output) -> Vec<String> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<String> = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::to_string)
        .collect();
    let skip = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines.into_iter().skip(skip).collect()
}

/// Runs at most one command on a background thread and hands back its
/// outcome through a channel polled by the event loop.
#[derive(Debug)]
pub struct Executor {
    workdir: PathBuf,
    in_flight: Option<Receiver<ExecutionOutcome>>,
}

impl Executor {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            in_flight: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Starts `draft` unless a run is already in flight. Returns whether it started.
    pub fn spawn(&mut self, draft: &CommandDraft) -> bool {
        if self.in_flight.is_some() {
            warn!("Ignoring `{}`: a command is already running", draft.display());
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let binary = draft.binary().to_string();
        let args = draft.args().to_vec();
        let workdir = self.workdir.clone();
        thread::spawn(move || {
            let outcome = execute(&binary, &args, &workdir);
            let _ = tx.send(outcome);
        });

        self.in_flight = Some(rx);
        true
    }

    /// Returns the outcome once the in-flight run has completed.
    pub fn poll(&mut self) -> Option<ExecutionOutcome> {
        let rx = self.in_flight.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.in_flight = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = None;
                Some(ExecutionOutcome::SpawnFailed {
                    message: "Execution thread exited without reporting".to_string(),
                })
            }
        }
    }

    /// Blocks until the in-flight run completes.
    #[cfg(test)]
    pub fn wait(&mut self) -> Option<ExecutionOutcome> {
        let rx = self.in_flight.take()?;
        rx.recv().ok()
    }
}
