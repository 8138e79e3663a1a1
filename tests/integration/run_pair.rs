//! The `run` target: action server in the background, dialogue server in
//! the foreground, action server terminated when the dialogue server exits.

use dojo::config::ProjectConfig;
use dojo::runner::TaskRunner;
use dojo::task::Task;

use crate::fixtures::{pid_alive, StubProject};

/// The stub branches on the module argument (`$2`), playing the action
/// server for `rasa_core_sdk.endpoint` and the dialogue server for
/// `rasa_core.run`. The dialogue-server half waits (bounded) for the action
/// server's marker so the spawn-order assertion cannot race.
const PAIR_SCRIPT: &str = r#"#!/bin/sh
case "$2" in
  rasa_core_sdk.endpoint)
    echo $$ > actions.pid
    : > actions_started
    exec sleep 30
    ;;
  rasa_core.run)
    i=0
    while [ ! -f actions_started ] && [ "$i" -lt 50 ]; do
      sleep 0.1
      i=$((i+1))
    done
    [ -f actions_started ] && exit 7 || exit 9
    ;;
esac
"#;

fn runner_for(project: &StubProject) -> TaskRunner {
    TaskRunner::with_interpreter(
        ProjectConfig::default(),
        project.path(),
        project.interpreter(),
    )
}

#[tokio::test]
async fn actions_start_before_core_and_core_code_passes_through() {
    let project = StubProject::with_script(PAIR_SCRIPT);
    let runner = runner_for(&project);

    let code = runner.run(Task::Run).await.unwrap();

    // 7 proves the dialogue server saw the action server's marker; 9 would
    // mean the action server was never spawned.
    assert_eq!(code, 7);
    assert!(project.has_file("actions_started"));
}

#[tokio::test]
async fn actions_server_is_terminated_when_core_exits() {
    let project = StubProject::with_script(PAIR_SCRIPT);
    let runner = runner_for(&project);

    runner.run(Task::Run).await.unwrap();

    let pid = project.read_file("actions.pid");
    assert!(
        !pid_alive(&pid),
        "action server (pid {}) outlived run-core",
        pid.trim()
    );
}

#[tokio::test]
async fn core_failure_does_not_become_an_error() {
    // A non-zero dialogue-server exit is a passthrough code, not Err; the
    // already-started action server is simply torn down.
    let project = StubProject::with_script(PAIR_SCRIPT);
    let runner = runner_for(&project);

    let result = runner.run(Task::Run).await;
    assert_eq!(result.unwrap(), 7);
}

#[tokio::test]
async fn pair_copes_with_an_action_server_that_exits_early() {
    const EARLY_EXIT_SCRIPT: &str = r#"#!/bin/sh
case "$2" in
  rasa_core_sdk.endpoint)
    exit 0
    ;;
  rasa_core.run)
    sleep 0.2
    exit 5
    ;;
esac
"#;
    let project = StubProject::with_script(EARLY_EXIT_SCRIPT);
    let runner = runner_for(&project);

    // Must neither hang on the reap nor let the action server's clean exit
    // mask the dialogue server's failure.
    let code = runner.run(Task::Run).await.unwrap();
    assert_eq!(code, 5);
}
