mod common;

use common::{run, run_env, run_err, run_partial};
use spp::interpreter::MAX_REPEAT_LEN;
use spp::Value;

#[test]
fn test_division() {
    assert_eq!(run("set r to 10 divided by 2. print r."), vec!["5"]);
    assert_eq!(run("set r to 7 divided by 2. print r."), vec!["3.5"]);
}

#[test]
fn test_division_by_zero_gives_zero() {
    let (env, _) = run_env("set a to 10 divided by 0.");
    assert_eq!(env.get("a"), Some(&Value::Number(0.0)));
}

#[test]
fn test_divided_alone_is_a_name() {
    assert_eq!(run("set divided to 1. print divided."), vec!["1"]);
    assert_eq!(run("print divided we fall."), vec!["divided we fall"]);
}

#[test]
fn test_is_alone_is_a_name() {
    assert_eq!(run("set is to 3. print is."), vec!["3"]);
}

#[test]
fn test_fused_operators_ignore_case_and_line_breaks() {
    assert_eq!(run("set r to 9 DIVIDED BY 3. print r."), vec!["3"]);
    assert_eq!(
        run("if 4 is\n  greater than 3 then print yes. end if."),
        vec!["yes"]
    );
}

#[test]
fn test_precedence_in_set() {
    assert_eq!(run("set r to 1 plus 2 times 3. print r."), vec!["7"]);
}

#[test]
fn test_print_chain_is_left_to_right() {
    assert_eq!(run("print 1 plus 2 times 3."), vec!["9"]);
    assert_eq!(run("set x to 5. print x minus 1 divided by 2."), vec!["2"]);
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(run("set r to 10 minus 4 minus 3. print r."), vec!["3"]);
}

#[test]
fn test_float_formatting() {
    assert_eq!(run("set r to 0.1 plus 0.2. print r."), vec!["0.30000000000000004"]);
    assert_eq!(run("set r to 0 minus 5. print r."), vec!["-5"]);
}

#[test]
fn test_text_concatenation() {
    assert_eq!(run("set r to foo plus bar. print r."), vec!["foobar"]);
    assert_eq!(run("print hello plus world."), vec!["helloworld"]);
}

#[test]
fn test_text_repetition() {
    assert_eq!(run("set r to ab times 3. print r."), vec!["ababab"]);
    assert_eq!(run("set r to 2 times ha. print r."), vec!["haha"]);
}

#[test]
fn test_list_concatenation() {
    let source = "set a to 1, 2. set b to 3, 4. set c to a plus b. print c.";
    assert_eq!(run(source), vec!["1, 2, 3, 4"]);
}

#[test]
fn test_comparisons_produce_booleans() {
    let source = "set a to 1 equals 1. print a.\n\
                  set b to 2 is greater than 5. print b.\n\
                  set c to apple is less than banana. print c.\n\
                  set d to 4 is equal to 4. print d.";
    assert_eq!(run(source), vec!["true", "false", "true", "true"]);
}

#[test]
fn test_equals_is_loose_across_types() {
    let source = "set t to 1 equals 1.\n\
                  set a to t equals 1. print a.\n\
                  set b to word equals 1. print b.";
    assert_eq!(run(source), vec!["true", "false"]);
}

#[test]
fn test_booleans_in_arithmetic() {
    let source = "set t to 1 equals 1. set r to t plus 1. print r.\n\
                  set f to 1 equals 2. set q to 5 divided by f. print q.";
    assert_eq!(run(source), vec!["2", "0"]);
}

#[test]
fn test_not() {
    assert_eq!(run("set r to not 0. print r."), vec!["true"]);
    assert_eq!(run("set r to not not 3. print r."), vec!["true"]);
}

#[test]
fn test_and_binds_tighter_than_or() {
    // (1 or 0) and 0 would be false.
    assert_eq!(run("set r to 1 or 0 and 0. print r."), vec!["true"]);
}

#[test]
fn test_mixed_ordering_is_type_error() {
    let err = run_err("set r to apple is greater than 3.");
    assert_eq!(err.to_string(), "cannot order text and number");
}

#[test]
fn test_non_numeric_arithmetic_is_type_error() {
    let err = run_err("set a to 1, 2. set r to a minus 1.");
    assert_eq!(err.to_string(), "cannot subtract list and number");

    let err = run_err("set r to ab times 1.5.");
    assert_eq!(err.to_string(), "cannot multiply text and number");
}

#[test]
fn test_huge_text_repetition_is_an_error() {
    let (lines, err) = run_partial("print start. set b to ab times 99999999999999999999. print b.");
    assert_eq!(lines, vec!["start"]);
    assert_eq!(err.to_string(), "cannot repeat text 100000000000000000000 times");
}

#[test]
fn test_list_repetition_past_the_cap_is_an_error() {
    let err = run_err("set a to 1, 2. set r to a times 9000000.");
    assert_eq!(err.to_string(), "cannot repeat list 9000000 times");
}

#[test]
fn test_repetition_up_to_the_cap_succeeds() {
    let source = format!("set r to x times {}.", MAX_REPEAT_LEN);
    let (env, _) = run_env(&source);
    match env.get("r") {
        Some(Value::String(text)) => assert_eq!(text.len(), MAX_REPEAT_LEN),
        other => panic!("expected text, got {:?}", other),
    }
}
