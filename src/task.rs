//! The static target table.
//!
//! Every task the runner knows is a variant here. The table is closed:
//! tasks are defined once, never mutated, and dispatch is a stateless
//! lookup. The command line behind each task lives in [`crate::runner`];
//! this module only owns names and descriptions.

use crate::error::{Error, Result};

/// A named target the runner can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Print the target table.
    Help,
    /// Train the dialogue policy from stories and the domain.
    TrainCore,
    /// Train the NLU model.
    TrainNlu,
    /// Train the dialogue policy interactively.
    TrainInteractive,
    /// Start the dialogue server.
    RunCore,
    /// Start the custom action server.
    RunActions,
    /// Start the action server in the background, then the dialogue server.
    Run,
    /// Render the training stories as a graph image.
    Visualize,
}

/// All tasks, in the order `help` lists them.
pub const ALL: [Task; 8] = [
    Task::Help,
    Task::TrainCore,
    Task::TrainNlu,
    Task::TrainInteractive,
    Task::RunCore,
    Task::RunActions,
    Task::Run,
    Task::Visualize,
];

impl Task {
    /// The kebab-case name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Help => "help",
            Task::TrainCore => "train-core",
            Task::TrainNlu => "train-nlu",
            Task::TrainInteractive => "train-interactive",
            Task::RunCore => "run-core",
            Task::RunActions => "run-actions",
            Task::Run => "run",
            Task::Visualize => "visualize",
        }
    }

    /// One-line description shown by `help`.
    pub fn description(&self) -> &'static str {
        match self {
            Task::Help => "Print this list of targets",
            Task::TrainCore => "Train the dialogue model from stories and the domain",
            Task::TrainNlu => "Train the NLU model from the NLU config and training data",
            Task::TrainInteractive => "Train the dialogue model interactively (human in the loop)",
            Task::RunCore => "Start the dialogue server with the trained models",
            Task::RunActions => "Start the custom action server",
            Task::Run => "Start the action server in the background, then the dialogue server",
            Task::Visualize => "Render the training stories as a conversation graph",
        }
    }

    /// Look a task up by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTask`] if the name matches no target. No
    /// process is spawned on that path.
    pub fn from_name(name: &str) -> Result<Self> {
        ALL.iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::UnknownTask(name.to_string()))
    }
}

/// The static target table `help` prints. One line per task, no side
/// effects, never spawns anything.
pub fn render_table() -> String {
    let mut out = String::from("Targets:\n");
    for task in ALL {
        out.push_str(&format!("  {:<18} {}\n", task.name(), task.description()));
    }
    out
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
