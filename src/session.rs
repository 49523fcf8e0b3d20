use crate::decimal::Decimal;
use crate::error_handling::*;
use crate::evaluating::evaluate;
use crate::history::{Category, History};
use nu_ansi_term::{Color, Style};
use std::io::{self, BufRead, Write};
use tracing::warn;

pub const WELCOME: &str = "Welcome to the Simple Unlimited Precision Calculator!";

pub const INSTRUCTIONS: &str = "
----- Calculator Instructions -----
Enter your calculation in the format:
  number operator number
Supported operators: +, -, *, /
Examples:
  5 + 3
  10.5 - 2.7
  4 * 6
  15 / 3
Enter 'help' to see these instructions again.
Enter 'quit' or 'exit' to close the calculator.
-----------------------------------";

pub const PROMPT: &str = "Enter a calculation (or 'quit' to exit): ";

pub const GOODBYE: &str = "Closing calculator. Goodbye!";

/// Styles applied to console output.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub banner: Style,
    pub result: Style,
    pub error: Style,
    pub warning: Style,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        if !color {
            return Self::plain();
        }
        Self {
            banner: Style::new().bold(),
            result: Color::Green.normal(),
            error: Color::Red.normal(),
            warning: Color::Yellow.normal(),
        }
    }

    pub fn plain() -> Self {
        Self {
            banner: Style::new(),
            result: Style::new(),
            error: Style::new(),
            warning: Style::new(),
        }
    }
}

/// The line shown to the user for one evaluation.
pub fn render(outcome: &Result<Decimal>) -> String {
    match outcome {
        Ok(value) => format!("Result: {value}"),
        Err(error @ CalcError::malformed_input) => format!("Entry Error: {error}"),
        Err(error) => format!("Error: {error}"),
    }
}

pub struct Session<R, W> {
    input: R,
    output: W,
    history: Box<dyn History>,
    palette: Palette,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, history: Box<dyn History>, palette: Palette) -> Self {
        Self {
            input,
            output,
            history,
            palette,
        }
    }

    /// Runs until `quit`, `exit` or end of input. Only console I/O errors
    /// are returned; history failures are reported and the loop goes on.
    pub fn run(&mut self) -> io::Result<()> {
        self.record(Category::start, "Calculator session started")?;
        writeln!(self.output, "{}", self.palette.banner.paint(WELCOME))?;
        self.show_instructions()?;

        loop {
            write!(self.output, "\n{PROMPT}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            let raw = line.trim_end_matches(['\r', '\n']);
            self.record(Category::user_input, raw)?;

            let command = raw.trim().to_lowercase();
            match command.as_str() {
                "quit" | "exit" => break,
                "help" => self.show_instructions()?,
                _ => self.calculate(&command)?,
            }
        }

        writeln!(self.output, "{}", self.palette.banner.paint(GOODBYE))?;
        self.record(Category::end, "Calculator session ended")
    }

    fn show_instructions(&mut self) -> io::Result<()> {
        writeln!(self.output, "{INSTRUCTIONS}")?;
        self.record(Category::instructions, "Displayed calculator instructions")
    }

    fn calculate(&mut self, expression: &str) -> io::Result<()> {
        let outcome = evaluate(expression);
        let message = render(&outcome);
        let style = if outcome.is_ok() {
            self.palette.result
        } else {
            self.palette.error
        };

        writeln!(self.output, "{}", style.paint(message.as_str()))?;
        self.record(Category::calculation, &format!("{expression} -> {message}"))
    }

    fn record(&mut self, category: Category, content: &str) -> io::Result<()> {
        if let Err(error) = self.history.append(category, content) {
            warn!(%category, %error, "history entry not saved");
            let notice = format!("History Error: {error}");
            writeln!(self.output, "{}", self.palette.warning.paint(notice.as_str()))?;
        }
        Ok(())
    }
}
