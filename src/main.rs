use clap::Parser;
use owo_colors::OwoColorize;
use spp::cli::{generate_completions, Args, Commands};
use spp::config::AppConfig;
use spp::convert::environment_to_json;
use spp::diagnostic::DiagnosticRenderer;
use spp::interpreter::{self, Interpreter, StdConsole};
use spp::lexer::tokenize;
use spp::Error;
use std::io::{self, BufRead};
use std::path::Path;

const STOP_LINE: &str = "STOP.";

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting spp");

    let (source, file_name) = match &args.file {
        Some(path) => {
            verbose_log(&config, &format!("Reading program from file: {}", path.display()));
            match read_file(path) {
                Ok(source) => (source, path.display().to_string()),
                Err(e) => {
                    error_message(&config, &e);
                    std::process::exit(1);
                }
            }
        }
        None => (read_interactive_source(&config), "<stdin>".to_string()),
    };

    verbose_log(&config, &format!("Read {} bytes of source", source.len()));

    if config.show_tokens {
        print_tokens(&source, &file_name, &config);
    } else if config.show_ast {
        print_ast(&source, &file_name, &config);
    } else {
        run_program(&source, &file_name, &config);
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Error: cannot read {}: {}", path.display(), e))
}

/// Collects lines until one reads `STOP.` or stdin closes.
fn read_interactive_source(config: &AppConfig) -> String {
    println!("S++ Language Interpreter");
    println!("========================");
    println!("Enter code (type '{}' on a new line to execute):", STOP_LINE);

    verbose_log(config, "Entering interactive mode");

    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) if line.trim() == STOP_LINE => break,
            Ok(line) => lines.push(line),
            Err(e) => {
                error_message(config, &format!("Error: failed to read input: {}", e));
                break;
            }
        }
    }

    verbose_log(config, &format!("Collected {} lines", lines.len()));
    lines.join("\n")
}

fn print_tokens(source: &str, file_name: &str, config: &AppConfig) {
    match tokenize(source) {
        Ok(tokens) => {
            verbose_log(config, &format!("Lexed {} tokens", tokens.len()));
            for token in &tokens {
                println!("{}", token);
            }
        }
        Err(e) => report_error(config, source, file_name, &Error::from(e)),
    }
}

fn print_ast(source: &str, file_name: &str, config: &AppConfig) {
    match interpreter::parse(source) {
        Ok(program) => {
            verbose_log(config, &format!("Parsed {} statements", program.statements.len()));
            println!("{:#?}", program);
        }
        Err(e) => report_error(config, source, file_name, &e),
    }
}

fn run_program(source: &str, file_name: &str, config: &AppConfig) {
    verbose_log(config, "Parsing program");
    let program = match interpreter::parse(source) {
        Ok(program) => program,
        Err(e) => {
            report_error(config, source, file_name, &e);
            return;
        }
    };
    verbose_log(config, &format!("Parsed {} statements", program.statements.len()));

    let mut console = StdConsole;
    let mut runner = Interpreter::new(&mut console);
    if let Err(e) = runner.run(&program) {
        report_error(config, source, file_name, &Error::from(e));
        return;
    }

    let env = runner.into_environment();
    verbose_log(
        config,
        &format!(
            "Run finished with {} variables and {} functions",
            env.variables().len(),
            env.function_names().count()
        ),
    );

    if config.dump_env {
        match serde_json::to_string_pretty(&environment_to_json(&env)) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => error_message(config, &format!("Error: cannot serialize variables: {}", e)),
        }
    }
}

/// A failed run still exits with status 0; the `Error:` line is the signal.
fn report_error(config: &AppConfig, source: &str, file_name: &str, error: &Error) {
    error_message(config, &format!("Error: {}", error));

    if config.verbose {
        if let Some(position) = error.position() {
            let renderer = DiagnosticRenderer::new(source, file_name, config.color_enabled);
            eprint!("{}", renderer.render(position));
        }
    }
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[spp:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
