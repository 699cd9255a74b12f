//! External command execution
//!
//! Every command is echoed before it runs. While it runs, stdout lines are
//! logged at info level prefixed with `> ` and stderr lines at warn level
//! prefixed with `! `. A non-zero exit becomes [`PublishError::ExternalCommand`]
//! carrying the captured stderr.

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{info, warn};

use crate::error::{PublishError, Result};

/// A program and its arguments, passed to the OS without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandLine {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    /// Human-readable form; arguments containing spaces are double-quoted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs external commands and returns their stdout
pub trait CommandRunner {
    fn run(&self, command: &CommandLine) -> Result<String>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &CommandLine) -> Result<String> {
        (**self).run(command)
    }
}

/// Runs commands as child processes of the current process
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    working_dir: Option<std::path::PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands in `dir` instead of the current directory
    pub fn in_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        ProcessRunner {
            working_dir: Some(dir.into()),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<String> {
        info!("Executing: '{}'", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| PublishError::command(command.to_string(), e.to_string(), None))?;

        // stderr is drained on its own thread while stdout is read here
        let stderr_handle = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || stream_lines(stderr, |line| warn!("! {}", line))));

        let stdout = match child.stdout.take() {
            Some(stdout) => stream_lines(stdout, |line| info!("> {}", line)),
            None => String::new(),
        };

        let stderr = match stderr_handle {
            Some(handle) => handle.join().unwrap_or_default(),
            None => String::new(),
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(PublishError::command(
                command.to_string(),
                stderr.trim_end(),
                status.code(),
            ));
        }

        Ok(stdout)
    }
}

/// Read `reader` to EOF line by line, reporting each non-blank line, and return everything read.
///
/// Bytes that are not UTF-8 are replaced rather than ending the read, so the
/// child never writes into a closed pipe.
fn stream_lines<R: Read>(reader: R, mut report: impl FnMut(&str)) -> String {
    let mut reader = BufReader::new(reader);
    let mut collected = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if !line.trim().is_empty() {
            report(line.trim_end());
        }
        collected.push_str(line);
        collected.push('\n');
    }
    collected
}
