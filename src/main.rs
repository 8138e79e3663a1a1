use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dojo::config::ProjectConfig;
use dojo::runner::TaskRunner;
use dojo::task::Task;
use dojo::{dlog, dlog_error, Result};

/// Name of the project-local config file.
const CONFIG_FILE: &str = "dojo.toml";

/// Dojo - task runner for conversational-assistant projects
#[derive(Parser, Debug)]
#[command(name = "dojo")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    DOJO_DEBUG=1    Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.dojo/dojo.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Project directory the external commands run in
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Config file (defaults to <project-dir>/dojo.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Targets, one subcommand each. The command line behind every target is
/// fixed by the project config; see `dojo.toml`.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train the dialogue model from stories and the domain
    TrainCore,

    /// Train the NLU model from the NLU config and training data
    TrainNlu,

    /// Train the dialogue model interactively (human in the loop)
    TrainInteractive,

    /// Start the dialogue server with the trained models
    RunCore,

    /// Start the custom action server
    RunActions,

    /// Start the action server in the background, then the dialogue server
    Run,

    /// Render the training stories as a conversation graph
    Visualize,
}

impl Command {
    fn task(&self) -> Task {
        match self {
            Command::TrainCore => Task::TrainCore,
            Command::TrainNlu => Task::TrainNlu,
            Command::TrainInteractive => Task::TrainInteractive,
            Command::RunCore => Task::RunCore,
            Command::RunActions => Task::RunActions,
            Command::Run => Task::Run,
            Command::Visualize => Task::Visualize,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    dojo::log::init_with_debug(cli.debug);

    // Pass the external tool's exit status through unchanged.
    match dispatch(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            dlog_error!("dispatch failed: {}", e);
            eprintln!("dojo: {}", e);
            std::process::exit(1);
        }
    }
}

fn dispatch(cli: &Cli) -> Result<i32> {
    let task = cli.command.task();
    dlog!(
        "Dojo starting: task={}, project_dir={}",
        task,
        cli.project_dir.display()
    );

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.project_dir.join(CONFIG_FILE));
    let config = ProjectConfig::load_from(&config_path)?;

    let runner = TaskRunner::new(config, &cli.project_dir)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(runner.run(task))
}
