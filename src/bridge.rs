//! Host automation bridge
//!
//! Everything the action says to the outside world goes through an
//! [`ActionBridge`]: reading inputs, writing log lines, publishing outputs and
//! raising the failure signal. Components receive the bridge as a parameter so
//! they can be exercised with a [`MemoryBridge`] in isolation.

use crate::error::{CompressionError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        write!(f, "{}", name)
    }
}

pub trait ActionBridge {
    /// Value of a named input, `None` when unset or blank.
    fn read_input(&self, name: &str) -> Option<String>;

    fn log(&self, level: LogLevel, message: &str);

    /// Publish a named value for later pipeline steps.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Mark the run as failed. The caller decides the exit code.
    fn set_failed(&self, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }
}

/// Bridge for GitHub Actions runners.
///
/// Inputs come from `INPUT_<NAME>` variables, logs are workflow commands and
/// outputs are appended to the file named by `GITHUB_OUTPUT`.
#[derive(Debug, Default)]
pub struct GitHubActionsBridge {
    output_file: Option<PathBuf>,
}

impl GitHubActionsBridge {
    pub fn from_env() -> Self {
        let output_file = env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { output_file }
    }

    pub fn with_output_file(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: Some(output_file.into()),
        }
    }

    /// `GITHUB_ACTIONS` is set to `true` on every hosted and self-hosted runner.
    pub fn is_available() -> bool {
        env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
    }
}

/// Environment variable name GitHub uses for an action input.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Escape a message for a workflow command.
pub fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl ActionBridge for GitHubActionsBridge {
    fn read_input(&self, name: &str) -> Option<String> {
        env::var(input_env_name(name))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => println!("::debug::{}", escape_command_data(message)),
            LogLevel::Info => println!("{}", message),
            LogLevel::Warning => println!("::warning::{}", escape_command_data(message)),
            LogLevel::Error => println!("::error::{}", escape_command_data(message)),
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        CompressionError::Bridge(format!(
                            "cannot open output file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                writeln!(file, "{}={}", name, value)?;
            }
            None => println!("{}={}", name, value),
        }
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Bridge for local runs: logs go through `tracing`, outputs to stdout.
#[derive(Debug, Default)]
pub struct ConsoleBridge;

impl ActionBridge for ConsoleBridge {
    fn read_input(&self, _name: &str) -> Option<String> {
        None
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        println!("{}={}", name, value);
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Bridge that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    inputs: HashMap<String, String>,
    logs: RefCell<Vec<(LogLevel, String)>>,
    outputs: RefCell<Vec<(String, String)>>,
    failure: RefCell<Option<String>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.logs.borrow().clone()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.logs
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs
            .borrow()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn failure(&self) -> Option<String> {
        self.failure.borrow().clone()
    }
}

impl ActionBridge for MemoryBridge {
    fn read_input(&self, name: &str) -> Option<String> {
        self.inputs
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.logs.borrow_mut().push((level, message.to_string()));
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .borrow_mut()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.log(LogLevel::Error, message);
        *self.failure.borrow_mut() = Some(message.to_string());
    }
}
