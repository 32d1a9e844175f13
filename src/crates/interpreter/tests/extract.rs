// Plan extraction from raw model output

use interpreter::plan::extract;
use interpreter::InterpreterError;

#[test]
fn test_fenced_plan_with_prose() {
    let raw = "Sure! Here is the plan:\n```json\n[\"wait(100)\", \"pressKey(\\\"enter\\\")\"]\n```\nLet me know if you need more.";
    let plan = extract(raw).unwrap();
    assert_eq!(plan.entries(), &["wait(100)", "pressKey(\"enter\")"]);
}

#[test]
fn test_unlabelled_fence() {
    let raw = "```\n[\"typeText(\\\"hi\\\")\"]\n```";
    let plan = extract(raw).unwrap();
    assert_eq!(plan.entries(), &["typeText(\"hi\")"]);
}

#[test]
fn test_trailing_comma_is_repaired() {
    let plan = extract("[\"wait(1)\", \"wait(2)\",]").unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.entries()[1], "wait(2)");
}

#[test]
fn test_no_array() {
    let err = extract("I'm sorry, I can't help with that.").unwrap_err();
    assert!(matches!(err, InterpreterError::Extraction(_)));
    assert_eq!(err.code(), "EXTRACTION_ERROR");
    assert!(err.is_fatal());
}

#[test]
fn test_empty_response() {
    assert!(matches!(extract(""), Err(InterpreterError::Extraction(_))));
}

#[test]
fn test_empty_plan() {
    let err = extract("```json\n[]\n```").unwrap_err();
    assert!(matches!(err, InterpreterError::PlanEmpty));
    assert_eq!(
        err.to_string(),
        "LLM returned no commands. Please rephrase your instruction."
    );
}

#[test]
fn test_line_comments_are_stripped_outside_strings() {
    let raw = "[\n  \"openUrl(\\\"https://www.youtube.com\\\")\", // open the site\n  \"wait(3000)\" // let it load\n]";
    let plan = extract(raw).unwrap();
    assert_eq!(
        plan.entries(),
        &["openUrl(\"https://www.youtube.com\")", "wait(3000)"]
    );
}

#[test]
fn test_raw_line_breaks_inside_strings() {
    let raw = "[\"typeText(\\\"first\nsecond\\\")\"]";
    let plan = extract(raw).unwrap();
    assert_eq!(plan.entries(), &["typeText(\"first second\")"]);
}

#[test]
fn test_malformed_array() {
    let err = extract("[\"wait(1)\" \"wait(2)\"]").unwrap_err();
    assert!(matches!(err, InterpreterError::PlanMalformed(_)));
    assert!(err.to_string().contains("after repair"));
}

#[test]
fn test_array_inside_object() {
    let plan = extract(r#"{"commands": ["moveTo(1, 2)", "clickAt(1, 2)"]}"#).unwrap();
    assert_eq!(plan.len(), 2);
}

#[test]
fn test_non_string_entries_kept_as_json_text() {
    let plan = extract(r#"["wait(1)", 42, {"cmd": "x"}]"#).unwrap();
    assert_eq!(plan.entries(), &["wait(1)", "42", r#"{"cmd":"x"}"#]);
}

#[test]
fn test_non_array_block_is_ignored() {
    let raw = "```sh\nnpm start\n```\nThen run:\n```json\n[\"wait(5)\"]\n```";
    let plan = extract(raw).unwrap();
    assert_eq!(plan.entries(), &["wait(5)"]);
}
