//! Single-target execution: argv fidelity and exit-status passthrough.

use dojo::config::ProjectConfig;
use dojo::error::Error;
use dojo::runner::TaskRunner;
use dojo::task::Task;

use crate::fixtures::StubProject;

fn runner_for(project: &StubProject) -> TaskRunner {
    TaskRunner::with_interpreter(
        ProjectConfig::default(),
        project.path(),
        project.interpreter(),
    )
}

#[tokio::test]
async fn train_core_passes_the_documented_argv() {
    let project = StubProject::with_exit_code(0);
    let runner = runner_for(&project);

    let code = runner.run(Task::TrainCore).await.unwrap();

    assert_eq!(code, 0);
    assert_eq!(
        project.recorded_argv(),
        [
            "-m",
            "rasa_core.train",
            "-s",
            "data/stories.md",
            "-d",
            "domain.yml",
            "-o",
            "models/dialogue",
            "--epochs",
            "100",
            "--debug",
        ]
    );
}

#[tokio::test]
async fn nonzero_exit_passes_through() {
    let project = StubProject::with_exit_code(3);
    let runner = runner_for(&project);

    let code = runner.run(Task::Visualize).await.unwrap();
    assert_eq!(code, 3);
}

#[tokio::test]
async fn run_by_name_dispatches() {
    let project = StubProject::with_exit_code(0);
    let runner = runner_for(&project);

    let code = runner.run_by_name("train-nlu").await.unwrap();

    assert_eq!(code, 0);
    assert_eq!(project.recorded_argv()[1], "rasa_nlu.train");
}

#[tokio::test]
async fn unknown_task_fails_without_spawning() {
    let project = StubProject::with_exit_code(0);
    let runner = runner_for(&project);

    let err = runner.run_by_name("deploy").await.unwrap_err();

    assert!(matches!(err, Error::UnknownTask(name) if name == "deploy"));
    assert!(!project.has_file("argv.txt"));
}

#[tokio::test]
async fn help_spawns_nothing_and_succeeds() {
    let project = StubProject::with_exit_code(0);
    let runner = runner_for(&project);

    let code = runner.run(Task::Help).await.unwrap();

    assert_eq!(code, 0);
    assert!(!project.has_file("argv.txt"));
}

#[tokio::test]
async fn missing_interpreter_surfaces_as_io_error() {
    let project = StubProject::with_exit_code(0);
    let runner = TaskRunner::with_interpreter(
        ProjectConfig::default(),
        project.path(),
        project.path().join("no-such-interpreter"),
    );

    let err = runner.run(Task::TrainCore).await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn rerunning_a_task_passes_identical_arguments() {
    let project = StubProject::with_exit_code(0);
    let runner = runner_for(&project);

    runner.run(Task::TrainCore).await.unwrap();
    let first = project.recorded_argv();
    runner.run(Task::TrainCore).await.unwrap();

    assert_eq!(project.recorded_argv(), first);
}

#[tokio::test]
async fn config_file_overrides_reach_the_command_line() {
    let project = StubProject::with_exit_code(0);
    let config_path = project.path().join("dojo.toml");
    std::fs::write(&config_path, "epochs = 7\nstories = \"data/alt.md\"\n").unwrap();

    let config = ProjectConfig::load_from(&config_path).unwrap();
    let runner =
        TaskRunner::with_interpreter(config, project.path(), project.interpreter());

    runner.run(Task::TrainCore).await.unwrap();
    let argv = project.recorded_argv();

    assert!(argv.windows(2).any(|w| w == ["--epochs", "7"]));
    assert!(argv.windows(2).any(|w| w == ["-s", "data/alt.md"]));
}
