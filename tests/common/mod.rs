#![allow(dead_code)]

use spp::interpreter::parse_and_run;
use spp::{BufferConsole, Environment, Error};

/// Runs a program that must succeed and returns its output lines.
pub fn run(source: &str) -> Vec<String> {
    run_env(source).1
}

pub fn run_env(source: &str) -> (Environment, Vec<String>) {
    let mut console = BufferConsole::new();
    match parse_and_run(source, &mut console) {
        Ok(env) => (env, owned_lines(&console)),
        Err(e) => panic!("program failed: {}\n--- source ---\n{}", e, source),
    }
}

/// Runs with scripted `ask` answers; returns the raw console text, prompts included.
pub fn run_with_input(source: &str, input: &[&str]) -> String {
    let mut console = BufferConsole::with_input(input.iter().copied());
    if let Err(e) = parse_and_run(source, &mut console) {
        panic!("program failed: {}\n--- source ---\n{}", e, source);
    }
    console.output().to_string()
}

pub fn run_err(source: &str) -> Error {
    run_partial(source).1
}

/// Runs a program that must fail; returns what it printed before failing and the error.
pub fn run_partial(source: &str) -> (Vec<String>, Error) {
    let mut console = BufferConsole::new();
    match parse_and_run(source, &mut console) {
        Ok(_) => panic!("program should have failed:\n{}", source),
        Err(e) => (owned_lines(&console), e),
    }
}

fn owned_lines(console: &BufferConsole) -> Vec<String> {
    console.lines().into_iter().map(String::from).collect()
}
