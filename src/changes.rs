//! Discovery of images touched by the latest commit.

use crate::bridge::ActionBridge;
use crate::error::{CompressionError, Result};
use crate::utils::is_image_file;
use std::path::PathBuf;
use std::process::Command;

/// Source of the paths added or modified by the latest commit.
pub trait ChangeSource {
    fn list_changed_paths(&self) -> Result<Vec<String>>;
}

/// Asks `git` for the files added or modified since the parent commit.
#[derive(Debug, Clone)]
pub struct GitDiff {
    program: String,
}

impl Default for GitDiff {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another executable in place of `git`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn diff_against(&self, base: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .args([
                "diff",
                "--name-only",
                "--relative",
                "-z",
                "--diff-filter=AM",
                base,
                "HEAD",
            ])
            .output()
            .map_err(|e| CompressionError::GitDiff(format!("cannot run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompressionError::GitDiff(format!(
                "diff against {} exited with {}: {}",
                base,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ChangeSource for GitDiff {
    fn list_changed_paths(&self) -> Result<Vec<String>> {
        // Both spell the first parent; the second form is tried once more
        // before giving up
        let stdout = self
            .diff_against("HEAD~1")
            .or_else(|_| self.diff_against("HEAD^"))?;

        Ok(parse_diff_output(&stdout))
    }
}

/// A fixed list of changed paths.
#[derive(Debug, Clone, Default)]
pub struct StaticChangeSource {
    paths: Vec<String>,
}

impl StaticChangeSource {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChangeSource for StaticChangeSource {
    fn list_changed_paths(&self) -> Result<Vec<String>> {
        Ok(self.paths.clone())
    }
}

/// Split diff output into trimmed, non-blank entries.
///
/// Entries are NUL-terminated (`git diff -z`), which also keeps non-ASCII
/// names unquoted. Newline-separated output is accepted too.
pub fn parse_diff_output(stdout: &str) -> Vec<String> {
    stdout
        .split(['\0', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Changed paths that are supported images and still exist on disk.
///
/// A failing source is not fatal: it is logged as a warning and yields an
/// empty list.
pub fn changed_image_files(source: &dyn ChangeSource, bridge: &dyn ActionBridge) -> Vec<PathBuf> {
    let paths = match source.list_changed_paths() {
        Ok(paths) => paths,
        Err(e) => {
            bridge.warning(&format!("Could not list changed files: {}", e));
            return Vec::new();
        }
    };

    paths
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .filter(|p| is_image_file(p))
        .filter(|p| {
            let exists = p.is_file();
            if !exists {
                bridge.debug(&format!("Skipping {}: not a file on disk", p.display()));
            }
            exists
        })
        .collect()
}
