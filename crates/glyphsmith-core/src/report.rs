//! Build outcome reporting
//!
//! Transcoding stages and emitters fail independently; a build collects
//! every failure instead of stopping at the first one.

use std::fmt;
use std::path::PathBuf;

use crate::artifacts::FontFormat;

/// A unit of work that produces one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// A font file of the given format
    Font(FontFormat),
    /// Style sheet
    Css,
    /// Preview page
    Html,
    /// Name → class map
    NameMap,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Font(format) => write!(f, "{} font", format.extension().to_uppercase()),
            Stage::Css => f.write_str("style sheet"),
            Stage::Html => f.write_str("preview page"),
            Stage::NameMap => f.write_str("name map"),
        }
    }
}

/// A stage that did not produce its artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Failed stage
    pub stage: Stage,
    /// Why it failed
    pub message: String,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Everything a build wrote and everything that failed
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Successfully written artifacts, in completion order
    pub written: Vec<(Stage, PathBuf)>,
    /// Failed stages
    pub failures: Vec<StageFailure>,
}

impl BuildReport {
    /// Record a written artifact
    pub fn record_written(&mut self, stage: Stage, path: PathBuf) {
        tracing::info!("Wrote {}", path.display());
        self.written.push((stage, path));
    }

    /// Record a failed stage
    pub fn record_failure(&mut self, stage: Stage, message: impl Into<String>) {
        let failure = StageFailure {
            stage,
            message: message.into(),
        };
        tracing::error!("{}", failure);
        self.failures.push(failure);
    }

    /// Fold another report into this one
    pub fn extend(&mut self, other: BuildReport) {
        self.written.extend(other.written);
        self.failures.extend(other.failures);
    }

    /// True when no stage failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Path written by `stage`, if it succeeded
    pub fn path_of(&self, stage: Stage) -> Option<&PathBuf> {
        self.written
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, path)| path)
    }

    /// Failure recorded for `stage`, if any
    pub fn failure_of(&self, stage: Stage) -> Option<&StageFailure> {
        self.failures.iter().find(|f| f.stage == stage)
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} artifact(s) written, {} failed",
            self.written.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}
