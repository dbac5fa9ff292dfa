use std::fmt;

/// A 1-based line/column location in program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Renders a fatal error with the offending source line and a caret under the column.
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    /// Renders the snippet lines that follow the `Error:` line.
    ///
    /// Returns an empty string when the position is outside the source, e.g. for a
    /// program that ends before the missing token.
    pub fn render(&self, position: Position) -> String {
        let content = match self.source.lines().nth(position.line.saturating_sub(1)) {
            Some(line) => line,
            None => return String::new(),
        };

        let width = position.line.to_string().len();
        let gutter = " ".repeat(width + 1);
        let mut output = String::new();

        output.push_str(&format!(
            "{}{} {}:{}\n",
            " ".repeat(width),
            self.style_blue("-->"),
            self.file_name,
            position
        ));
        output.push_str(&format!("{} {}\n", gutter, self.style_blue("|")));
        output.push_str(&format!(
            "{} {} {}\n",
            self.style_blue(&format!("{:>width$}", position.line, width = width + 1)),
            self.style_blue("|"),
            content
        ));

        let padding: String = content
            .chars()
            .take(position.column.saturating_sub(1))
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        output.push_str(&format!(
            "{} {} {}{}\n",
            gutter,
            self.style_blue("|"),
            padding,
            self.style_red("^")
        ));

        output
    }

    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[34m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}
