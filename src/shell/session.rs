use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::{Report, ResultExt, Snafu};
use tracing::debug;

use crate::namespace::{DirEntry, Namespace, NamespaceError, NodeKind};
use crate::script::Command;

const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  ls [path]            list a directory, or show a file's name
  mkdir <path>         create a directory and any missing parents
  append <path> <text> append text to a file, creating it if needed
                       (\\n, \\t and \\\\ are decoded)
  cat <path>           print a file's content
  help                 show this message
  exit                 leave the shell
";

/// Executes commands against a single namespace, writing results to `out`.
pub struct Session<W> {
    namespace: Namespace,
    out: W,
    colorize: bool,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, colorize: bool) -> Self {
        Self {
            namespace: Namespace::new(),
            out,
            colorize,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn execute(&mut self, command: &Command) -> Result<(), SessionError> {
        debug!("Executing '{}'", command);

        match command {
            Command::List { path } => {
                let entries = self
                    .namespace
                    .entries(path)
                    .with_context(|_| CommandFailedSnafu {
                        command: command.to_string(),
                    })?;
                for entry in &entries {
                    self.write_entry(entry)?;
                }
            }
            Command::MakeContainer { path } => {
                self.namespace
                    .make_container(path)
                    .with_context(|_| CommandFailedSnafu {
                        command: command.to_string(),
                    })?;
            }
            Command::Append { path, text } => {
                self.namespace
                    .append_to_file(path, text)
                    .with_context(|_| CommandFailedSnafu {
                        command: command.to_string(),
                    })?;
            }
            Command::Read { path } => {
                let content = self
                    .namespace
                    .read_file(path)
                    .with_context(|_| CommandFailedSnafu {
                        command: command.to_string(),
                    })?;
                self.out.write_all(content.as_bytes()).context(OutputSnafu)?;
                if !content.is_empty() && !content.ends_with('\n') {
                    writeln!(self.out).context(OutputSnafu)?;
                }
            }
        }

        self.out.flush().context(OutputSnafu)
    }

    /// Line-oriented shell. Failed commands are reported on stderr and the
    /// loop goes on; only I/O failures end it early.
    pub fn run_interactive<R: BufRead>(
        &mut self,
        input: R,
        prompt: bool,
    ) -> Result<(), SessionError> {
        if prompt {
            self.write_prompt()?;
        }

        for line in input.lines() {
            let line = line.context(InputSnafu)?;
            let trimmed = line.trim();

            match trimmed {
                "exit" | "quit" => break,
                "help" => self.out.write_all(HELP.as_bytes()).context(OutputSnafu)?,
                _ if trimmed.is_empty() || trimmed.starts_with('#') => {}
                _ => match line.parse::<Command>() {
                    Ok(command) => match self.execute(&command) {
                        Ok(()) => {}
                        Err(error @ SessionError::CommandFailed { .. }) => report(error),
                        Err(error) => return Err(error),
                    },
                    Err(error) => report(error),
                },
            }

            if prompt {
                self.write_prompt()?;
            }
        }

        Ok(())
    }

    fn write_entry(&mut self, entry: &DirEntry) -> Result<(), SessionError> {
        let written = match entry.kind {
            NodeKind::Container if self.colorize => {
                writeln!(self.out, "{}", format!("{}/", entry.name).blue().bold())
            }
            NodeKind::Container => writeln!(self.out, "{}/", entry.name),
            NodeKind::Leaf => writeln!(self.out, "{}", entry.name),
        };
        written.context(OutputSnafu)
    }

    fn write_prompt(&mut self) -> Result<(), SessionError> {
        self.out.write_all(PROMPT.as_bytes()).context(OutputSnafu)?;
        self.out.flush().context(OutputSnafu)
    }
}

/// Prints a recoverable error with its causes to stderr
pub fn report<E: std::error::Error + 'static>(error: E) {
    write_report(&mut std::io::stderr().lock(), error);
}

fn write_report<E: std::error::Error + 'static>(out: &mut impl Write, error: E) {
    debug!("Recoverable failure: {:?}", error);
    let _ = writeln!(out, "{}", Report::from_error(error));
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Command '{}' failed", command))]
    CommandFailed {
        command: String,
        source: NamespaceError,
    },
    #[snafu(display("Failed to write command output"))]
    OutputError { source: std::io::Error },
    #[snafu(display("Failed to read input"))]
    InputError { source: std::io::Error },
}
