// Sequential plan execution and failure isolation

use std::sync::Arc;
use std::time::Duration;

use interpreter::{
    ActionError, ActionRegistry, ArgValue, CommandPlan, InterpreterError, Phase, PlanExecutor,
};
use parking_lot::Mutex;

fn plan(commands: &[&str]) -> CommandPlan {
    CommandPlan::new(commands.iter().map(|c| c.to_string()).collect())
}

fn registry(calls: Arc<Mutex<Vec<String>>>) -> ActionRegistry {
    let mut registry = ActionRegistry::new();

    let seen = calls.clone();
    registry.register_fn("record", move |args: Vec<ArgValue>| {
        let seen = seen.clone();
        async move {
            let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
            seen.lock().push(rendered.join("|"));
            Ok(None)
        }
    });

    let seen = calls.clone();
    registry.register_fn("slow", move |_| {
        let seen = seen.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            seen.lock().push("slow".to_string());
            Ok(Some("slept".to_string()))
        }
    });

    registry.register_fn("fail", |_| async {
        Err(ActionError::invalid("fail: always fails"))
    });

    registry
}

#[tokio::test]
async fn test_log_has_two_entries_per_command() {
    let executor = PlanExecutor::new(registry(Arc::default()));
    let commands = plan(&["record(1)", "slow()", "record(\"x\")"]);
    let log = executor.execute(&commands).await;

    assert_eq!(log.len(), 6);
    for (i, pair) in log.entries().chunks(2).enumerate() {
        assert_eq!(pair[0].phase, Phase::Attempted);
        assert_eq!(pair[1].phase, Phase::Succeeded);
        assert_eq!(pair[0].command_text, pair[1].command_text);
        assert_eq!(pair[0].command_text, commands.entries()[i]);
    }
    assert_eq!(log.succeeded(), 3);
    assert_eq!(log.failed(), 0);
}

#[tokio::test]
async fn test_commands_run_in_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let executor = PlanExecutor::new(registry(calls.clone()));

    executor
        .execute(&plan(&["slow()", "record(1, \"a\")", "record(2)"]))
        .await;

    assert_eq!(*calls.lock(), vec!["slow", "1|a", "2"]);
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let executor = PlanExecutor::new(registry(calls.clone()));

    let log = executor
        .execute(&plan(&[
            "record(1)",
            "not a command",
            "unknownCmd()",
            "fail()",
            "record(2)",
        ]))
        .await;

    assert_eq!(log.len(), 10);
    assert_eq!(log.succeeded(), 2);
    assert_eq!(log.failed(), 3);
    assert_eq!(*calls.lock(), vec!["1", "2"]);

    let messages: Vec<_> = log
        .outcomes()
        .map(|e| e.message.clone().unwrap_or_default())
        .collect();
    assert_eq!(messages[1], "Invalid command format: not a command");
    assert_eq!(messages[2], "unknown command: unknownCmd()");
    assert_eq!(messages[3], "fail failed: invalid arguments: fail: always fails");
}

#[tokio::test]
async fn test_success_message_is_logged() {
    let executor = PlanExecutor::new(registry(Arc::default()));
    let log = executor.execute(&plan(&["slow()"])).await;
    let outcome = log.outcomes().next().unwrap();
    assert_eq!(outcome.message.as_deref(), Some("slept"));
    assert_eq!(outcome.summary(), "✔ slow(): slept");
}

#[tokio::test]
async fn test_empty_plan_yields_empty_log() {
    let executor = PlanExecutor::new(registry(Arc::default()));
    assert!(executor.execute(&CommandPlan::default()).await.is_empty());
}

#[tokio::test]
async fn test_execute_value() {
    let executor = PlanExecutor::new(registry(Arc::default()));

    let log = executor
        .execute_value(serde_json::json!(["record(1)", 7]))
        .await
        .unwrap();
    assert_eq!(log.succeeded(), 1);
    assert_eq!(log.failed(), 1);

    let err = executor
        .execute_value(serde_json::json!({"plan": []}))
        .await
        .unwrap_err();
    assert!(matches!(err, InterpreterError::InvalidPlan(_)));
    assert_eq!(
        err.to_string(),
        "Invalid plan: expected an array of commands, got an object"
    );
}

#[tokio::test]
async fn test_log_serializes_as_array() {
    let executor = PlanExecutor::new(registry(Arc::default()));
    let log = executor.execute(&plan(&["unknownCmd()"])).await;

    assert_eq!(
        serde_json::to_value(&log).unwrap(),
        serde_json::json!([
            {"commandText": "unknownCmd()", "phase": "attempted"},
            {"commandText": "unknownCmd()", "phase": "failed", "message": "unknown command: unknownCmd()"},
        ])
    );
}
