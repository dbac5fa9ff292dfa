mod common;

use common::{run, run_env};
use spp::Value;

#[test]
fn test_set_then_print_sum() {
    assert_eq!(run("set x to 5 plus 3. print x."), vec!["8"]);
}

#[test]
fn test_print_phrase() {
    let (env, lines) = run_env("print hello world.");
    assert_eq!(lines, vec!["hello world"]);
    assert!(env.variables().is_empty(), "phrases should not create variables");
}

#[test]
fn test_print_unbound_single_word() {
    assert_eq!(run("print hi."), vec!["hi"]);
}

#[test]
fn test_print_bound_single_word() {
    assert_eq!(run("set greeting to hello. print greeting."), vec!["hello"]);
}

#[test]
fn test_phrase_does_not_look_up_words() {
    assert_eq!(run("set x to 7. print x is here."), vec!["x is here"]);
}

#[test]
fn test_write_is_print() {
    assert_eq!(run("write hi there."), vec!["hi there"]);
}

#[test]
fn test_decimal_number() {
    let (env, lines) = run_env("set price to 2.5. print price. print 4.25.");
    assert_eq!(env.get("price"), Some(&Value::Number(2.5)));
    assert_eq!(lines, vec!["2.5", "4.25"]);
}

#[test]
fn test_reassignment() {
    assert_eq!(run("set x to 1. set x to x plus 1. print x."), vec!["2"]);
}

#[test]
fn test_set_unbound_word_is_text() {
    let (env, _) = run_env("set color to blue.");
    assert_eq!(env.get("color"), Some(&Value::string("blue")));
}

#[test]
fn test_comments_are_ignored() {
    let source = "// greeting program\nprint hi. // trailing note\n// the end";
    assert_eq!(run(source), vec!["hi"]);
}

#[test]
fn test_keywords_ignore_case() {
    assert_eq!(run("SET x TO 3. Print x."), vec!["3"]);
}

#[test]
fn test_identifiers_keep_case() {
    assert_eq!(run("set X to 1. print x."), vec!["x"]);
}

#[test]
fn test_statements_across_lines() {
    let source = "set a to\n  4.\nset b to a\n  times 2.\nprint b.";
    assert_eq!(run(source), vec!["8"]);
}

#[test]
fn test_list_prints_comma_joined() {
    assert_eq!(
        run("set colors to red, green, blue. print colors."),
        vec!["red, green, blue"]
    );
}

#[test]
fn test_empty_program() {
    let (env, lines) = run_env("");
    assert!(lines.is_empty());
    assert!(env.variables().is_empty());
}
