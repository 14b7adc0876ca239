use std::io::{self, BufRead, IsTerminal, Write};

use crate::ops::auth::PasswordPrompt;

/// Line-based password prompt. Reads from `input`, writes prompts and
/// errors to `output`. An empty line or end of input cancels.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
    label: String,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W, label: &str) -> Self {
        LinePrompt {
            input,
            output,
            label: label.to_string(),
        }
    }

    /// Ask for one value under `label`. `None` on an empty line or EOF.
    pub fn read_value(&mut self, label: &str) -> Option<String> {
        // Prompt output is best effort; a closed stderr must not block input
        let _ = write!(self.output, "{}: ", label);
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let value = line.trim_end_matches(['\r', '\n']);
                (!value.is_empty()).then(|| value.to_string())
            }
        }
    }
}

impl<R: BufRead, W: Write> PasswordPrompt for LinePrompt<R, W> {
    fn ask(&mut self, error: Option<&str>) -> Option<String> {
        if let Some(msg) = error {
            let _ = writeln!(self.output, "{}", msg);
        }
        let label = self.label.clone();
        self.read_value(&label)
    }
}

/// Password prompt for the CLI. On a terminal the input is read without
/// echo; piped stdin is read line by line.
pub enum TerminalPrompt<R, W> {
    Hidden { label: String },
    Piped(LinePrompt<R, W>),
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Ask for one value under `label`. `None` on an empty entry or EOF.
    pub fn read_value(&mut self, label: &str) -> Option<String> {
        match self {
            TerminalPrompt::Hidden { .. } => {
                match rpassword::prompt_password(format!("{}: ", label)) {
                    Ok(value) => (!value.is_empty()).then_some(value),
                    Err(e) => {
                        log::warn!("event=password_prompt status=failed error={}", e);
                        None
                    }
                }
            }
            TerminalPrompt::Piped(lines) => lines.read_value(label),
        }
    }
}

impl<R: BufRead, W: Write> PasswordPrompt for TerminalPrompt<R, W> {
    fn ask(&mut self, error: Option<&str>) -> Option<String> {
        match self {
            TerminalPrompt::Hidden { label } => {
                if let Some(msg) = error {
                    eprintln!("{}", msg);
                }
                let label = label.clone();
                self.read_value(&label)
            }
            TerminalPrompt::Piped(lines) => lines.ask(error),
        }
    }
}

/// Prompt on the terminal: hidden input when stdin is a TTY, otherwise
/// lines from stdin with prompts on stderr.
pub fn terminal_prompt(label: &str) -> TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    if io::stdin().is_terminal() {
        TerminalPrompt::Hidden {
            label: label.to_string(),
        }
    } else {
        TerminalPrompt::Piped(LinePrompt::new(io::stdin().lock(), io::stderr(), label))
    }
}
