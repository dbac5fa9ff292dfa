//! Console input/output used by `print`, `write` and `ask`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Where program output goes and where `ask` answers come from.
pub trait Console {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Shows `prompt` without a newline and blocks for one line of input.
    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// The process's standard output and standard input.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", prompt)?;
            stdout.flush()?;
        }

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(&input).to_string()))
    }
}

/// Scripted input and captured output, for running programs in tests or when embedding.
#[derive(Debug, Default)]
pub struct BufferConsole {
    input: VecDeque<String>,
    output: String,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    /// Everything written so far, prompts included.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push_str(line);
        self.output.push('\n');
        Ok(())
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.push_str(prompt);
        Ok(self.input.pop_front())
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_console_captures_output() {
        let mut console = BufferConsole::with_input(["Ada"]);
        console.write_line("hello").unwrap();
        let answer = console.prompt("Name? ").unwrap();

        assert_eq!(answer.as_deref(), Some("Ada"));
        assert_eq!(console.output(), "hello\nName? ");
        assert_eq!(console.prompt("Again? ").unwrap(), None);
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("yes\r\n"), "yes");
        assert_eq!(strip_line_ending("yes\n"), "yes");
        assert_eq!(strip_line_ending("yes"), "yes");
    }
}
