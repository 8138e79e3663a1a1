//! Task dispatch and external process execution.
//!
//! The `TaskRunner` maps a [`Task`] onto the fixed command line for the
//! external framework and runs it with inherited stdio in the project
//! directory. It is a pure pass-through: the external tool's exit status
//! becomes the task's exit code, with no retry and no reinterpretation.
//!
//! The one composite target is [`Task::Run`]: the action server is spawned
//! as a supervised background child, the dialogue server runs in the
//! foreground, and when the dialogue server exits the action server is
//! terminated with it. There is no startup barrier between the two; the
//! dialogue server retries its action-endpoint connection on its own.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::task::{self, Task};
use crate::{dlog, dlog_debug, dlog_warn};

const CORE_TRAIN_MODULE: &str = "rasa_core.train";
const CORE_RUN_MODULE: &str = "rasa_core.run";
const CORE_VISUALIZE_MODULE: &str = "rasa_core.visualize";
const NLU_TRAIN_MODULE: &str = "rasa_nlu.train";
const ACTION_ENDPOINT_MODULE: &str = "rasa_core_sdk.endpoint";

/// One external command: the literal program and argv for a task.
///
/// Static text resolved from the config, never computed from runtime state.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            args: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command as one line, for logging.
    pub fn rendered(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// Dispatches tasks against a project directory.
///
/// # Example
///
/// ```ignore
/// use dojo::config::ProjectConfig;
/// use dojo::runner::TaskRunner;
/// use std::path::Path;
///
/// let runner = TaskRunner::new(ProjectConfig::default(), Path::new("."))?;
/// let code = runner.run_by_name("train-core").await?;
/// ```
#[derive(Debug)]
pub struct TaskRunner {
    config: ProjectConfig,
    project_dir: PathBuf,
    interpreter: PathBuf,
}

impl TaskRunner {
    /// Create a runner, resolving the configured interpreter on PATH.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InterpreterNotFound`] if the interpreter cannot be
    /// located, and [`Error::Validation`] for a degenerate config.
    pub fn new(config: ProjectConfig, project_dir: &Path) -> Result<Self> {
        config.validate()?;
        let interpreter = which::which(&config.python)
            .map_err(|_| Error::InterpreterNotFound(config.python.clone()))?;
        Ok(Self {
            config,
            project_dir: project_dir.to_path_buf(),
            interpreter,
        })
    }

    /// Create a runner with an explicit interpreter path, skipping PATH
    /// resolution. Useful for tests and non-standard installs.
    pub fn with_interpreter(config: ProjectConfig, project_dir: &Path, interpreter: PathBuf) -> Self {
        Self {
            config,
            project_dir: project_dir.to_path_buf(),
            interpreter,
        }
    }

    /// The config this runner dispatches with.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The working directory children run in.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The resolved interpreter.
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Run a task looked up by its command-line name.
    pub async fn run_by_name(&self, name: &str) -> Result<i32> {
        self.run(Task::from_name(name)?).await
    }

    /// Run a task to completion and return its exit code.
    ///
    /// The code is the external tool's own, unchanged. A child killed by a
    /// signal has no code and maps to 1.
    pub async fn run(&self, task: Task) -> Result<i32> {
        dlog!("Dispatch: {}", task);
        match task {
            Task::Help => {
                print!("{}", task::render_table());
                Ok(0)
            }
            Task::TrainCore => self.exec(self.train_core()).await,
            Task::TrainNlu => self.exec(self.train_nlu()).await,
            Task::TrainInteractive => self.exec(self.train_interactive()).await,
            Task::RunCore => self.exec(self.run_core()).await,
            Task::RunActions => self.exec(self.run_actions()).await,
            Task::Run => self.run_pair().await,
            Task::Visualize => self.exec(self.visualize()).await,
        }
    }

    /// The external command behind a task, or `None` for the two targets
    /// that are not a single external command (`help` spawns nothing,
    /// `run` composes `run-actions` and `run-core`).
    pub fn invocation(&self, task: Task) -> Option<Invocation> {
        match task {
            Task::Help | Task::Run => None,
            Task::TrainCore => Some(self.train_core()),
            Task::TrainNlu => Some(self.train_nlu()),
            Task::TrainInteractive => Some(self.train_interactive()),
            Task::RunCore => Some(self.run_core()),
            Task::RunActions => Some(self.run_actions()),
            Task::Visualize => Some(self.visualize()),
        }
    }

    fn train_core(&self) -> Invocation {
        let c = &self.config;
        let mut inv = Invocation::new(&self.interpreter)
            .arg("-m")
            .arg(CORE_TRAIN_MODULE)
            .arg("-s")
            .arg(&c.stories)
            .arg("-d")
            .arg(&c.domain)
            .arg("-o")
            .arg(&c.dialogue_model_dir)
            .arg("--epochs")
            .arg(c.epochs.to_string());
        if c.tool_debug {
            inv = inv.arg("--debug");
        }
        inv
    }

    fn train_nlu(&self) -> Invocation {
        let c = &self.config;
        Invocation::new(&self.interpreter)
            .arg("-m")
            .arg(NLU_TRAIN_MODULE)
            .arg("-c")
            .arg(&c.nlu_config)
            .arg("--fixed_model_name")
            .arg(&c.nlu_model_name)
            .arg("--data")
            .arg(&c.nlu_data)
            .arg("-o")
            .arg(&c.nlu_output_dir)
            .arg("--project")
            .arg(&c.nlu_project)
    }

    fn train_interactive(&self) -> Invocation {
        let c = &self.config;
        Invocation::new(&self.interpreter)
            .arg("-m")
            .arg(CORE_TRAIN_MODULE)
            .arg("--interactive")
            .arg("-s")
            .arg(&c.stories)
            .arg("-d")
            .arg(&c.domain)
            .arg("--endpoints")
            .arg(&c.endpoints)
    }

    fn run_core(&self) -> Invocation {
        let c = &self.config;
        let mut inv = Invocation::new(&self.interpreter)
            .arg("-m")
            .arg(CORE_RUN_MODULE)
            .arg("-d")
            .arg(&c.dialogue_model_dir)
            .arg("-u")
            .arg(self.nlu_model_path())
            .arg("-p")
            .arg(c.port.to_string())
            .arg("--endpoints")
            .arg(&c.endpoints);
        if c.tool_debug {
            inv = inv.arg("--debug");
        }
        inv
    }

    fn run_actions(&self) -> Invocation {
        Invocation::new(&self.interpreter)
            .arg("-m")
            .arg(ACTION_ENDPOINT_MODULE)
            .arg("--actions")
            .arg(&self.config.actions_dir)
    }

    fn visualize(&self) -> Invocation {
        let c = &self.config;
        Invocation::new(&self.interpreter)
            .arg("-m")
            .arg(CORE_VISUALIZE_MODULE)
            .arg("-s")
            .arg(&c.stories)
            .arg("-d")
            .arg(&c.domain)
            .arg("-o")
            .arg(&c.graph_output)
    }

    /// Where the NLU trainer leaves the model the server loads,
    /// e.g. `models/nlu/current`.
    fn nlu_model_path(&self) -> String {
        let c = &self.config;
        format!("{}/{}/{}", c.nlu_output_dir, c.nlu_project, c.nlu_model_name)
    }

    /// Run a single external command in the foreground.
    async fn exec(&self, inv: Invocation) -> Result<i32> {
        dlog_debug!("exec: {}", inv.rendered());
        let status = Command::new(&inv.program)
            .args(&inv.args)
            .current_dir(&self.project_dir)
            .status()
            .await?;
        dlog!("{} exited: {:?}", inv.program.display(), status.code());
        Ok(exit_code(status))
    }

    /// `run`: action server in the background, dialogue server in the
    /// foreground, action server terminated when the dialogue server exits.
    async fn run_pair(&self) -> Result<i32> {
        let actions = self.run_actions();
        dlog!("spawn background: {}", actions.rendered());
        let mut child = Command::new(&actions.program)
            .args(&actions.args)
            .current_dir(&self.project_dir)
            .kill_on_drop(true)
            .spawn()?;

        let code = self.exec(self.run_core()).await;

        // The action server's lifetime is scoped to this target. Its exit
        // status never overrides the dialogue server's code.
        match child.try_wait() {
            Ok(Some(status)) => {
                dlog!("action server already exited: {:?}", status.code());
            }
            _ => {
                if let Err(e) = child.start_kill() {
                    dlog_warn!("failed to signal action server: {}", e);
                }
                match child.wait().await {
                    Ok(status) => dlog_debug!("action server reaped: {:?}", status.code()),
                    Err(e) => dlog_warn!("failed to reap action server: {}", e),
                }
            }
        }

        code
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
