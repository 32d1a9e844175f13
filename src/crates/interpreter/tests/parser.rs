// Command parsing strategies and the shared parse cache

use std::sync::Arc;

use interpreter::plan::{Strategy, StrategyError};
use interpreter::{ArgValue, CommandParser, InterpreterError, ParseCache};
use proptest::prelude::*;

fn s(v: &str) -> ArgValue {
    ArgValue::String(v.to_string())
}

#[test]
fn test_numeric_arguments() {
    let parsed = CommandParser::new().parse("clickAt(100, 200)").unwrap();
    assert_eq!(parsed.name, "clickAt");
    assert_eq!(parsed.args, vec![ArgValue::Number(100.0), ArgValue::Number(200.0)]);
}

#[test]
fn test_string_argument() {
    let parsed = CommandParser::new().parse(r#"typeText("hello world")"#).unwrap();
    assert_eq!(parsed.name, "typeText");
    assert_eq!(parsed.args, vec![s("hello world")]);
}

#[test]
fn test_escaped_quotes_stay_strict() {
    let parsed = CommandParser::new().parse(r#"typeText("say \"hi\"")"#).unwrap();
    assert_eq!(parsed.args, vec![s(r#"say "hi""#)]);
}

#[test]
fn test_no_arguments() {
    let parsed = CommandParser::new().parse("copyClipboard()").unwrap();
    assert_eq!(parsed.name, "copyClipboard");
    assert!(parsed.args.is_empty());
}

#[test]
fn test_unescaped_inner_quotes() {
    let parsed = CommandParser::new()
        .parse(r#"typeText("He said "hi" twice")"#)
        .unwrap();
    assert_eq!(parsed.args, vec![s(r#"He said "hi" twice"#)]);
}

#[test]
fn test_unquoted_token_falls_back_to_manual() {
    let parsed = CommandParser::new().parse("pressKey(ctrl+c)").unwrap();
    assert_eq!(parsed.args, vec![ArgValue::RawToken("ctrl+c".into())]);
}

#[test]
fn test_pattern_literal() {
    let parsed = CommandParser::new().parse("waitForText(/Order #\\d+/i)").unwrap();
    let pattern = &parsed.args[0];
    assert_eq!(
        pattern,
        &ArgValue::Pattern {
            source: "Order #\\d+".into(),
            flags: "i".into()
        }
    );
}

#[test]
fn test_bad_shape() {
    let err = CommandParser::new().parse("click at 100 200").unwrap_err();
    assert!(matches!(err, InterpreterError::CommandFormat(_)));
    assert!(!err.is_fatal());
}

#[test]
fn test_non_ascii_command_name() {
    let err = CommandParser::new().parse("clické()").unwrap_err();
    assert!(matches!(err, InterpreterError::CommandFormat(_)));
}

#[test]
fn test_cache_does_not_grow_on_repeats() {
    let parser = CommandParser::new();
    for _ in 0..50 {
        parser.parse("wait(250)").unwrap();
        parser.parse(r#"typeText("a")"#).unwrap();
    }
    assert_eq!(parser.cache().len(), 2);
}

#[test]
fn test_shared_cache_between_parsers() {
    let cache = Arc::new(ParseCache::new());
    let first = CommandParser::with_cache(cache.clone());
    let second = CommandParser::with_cache(cache.clone());

    first.parse("moveTo(5, 6)").unwrap();
    let parsed = second.parse("moveTo(5, 6)").unwrap();

    assert_eq!(parsed.args, vec![ArgValue::Number(5.0), ArgValue::Number(6.0)]);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_bounded_cache_still_parses() {
    let parser = CommandParser::with_cache(Arc::new(ParseCache::with_capacity(2)));
    for n in 0..5 {
        let parsed = parser.parse(&format!("wait({})", n)).unwrap();
        assert_eq!(parsed.args, vec![ArgValue::Number(n as f64)]);
    }
    assert_eq!(parser.cache().len(), 2);
}

#[test]
fn test_strict_rejection_names_strategy() {
    let err: StrategyError = Strategy::Strict.apply("ctrl+c").unwrap_err();
    assert_eq!(err.strategy, "strict");
    assert!(err.to_string().starts_with("strict strategy rejected arguments"));
}

proptest! {
    #[test]
    fn test_manual_agrees_with_strict_on_simple_args(
        text in "[A-Za-z0-9 ]{0,24}",
        n in any::<u32>(),
    ) {
        let args = format!("\"{}\", {}", text, n);
        let strict = Strategy::Strict.apply(&args).unwrap();
        let manual = Strategy::Manual.apply(&args).unwrap();
        prop_assert_eq!(&strict, &manual);
        prop_assert_eq!(strict, vec![ArgValue::String(text), ArgValue::Number(n as f64)]);
    }

    #[test]
    fn test_manual_never_fails(args in "\\PC{0,40}") {
        prop_assert!(Strategy::Manual.apply(&args).is_ok());
    }
}
