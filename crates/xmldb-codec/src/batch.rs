use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec::Codec;
use crate::error::CodecError;
use crate::verify::{Mismatch, Verdict};

/// What to do with a listed file that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Report the file as a failure.
    #[default]
    Fail,
    /// Report the file as skipped.
    Skip,
}

/// Per-file result of a batch check.
#[derive(Debug)]
pub enum Outcome {
    Canonical,
    Mismatch(Mismatch),
    /// The file is not a valid document.
    Invalid(CodecError),
    /// The file exists but could not be read.
    Unreadable(io::Error),
    /// The file does not exist and the policy is `Fail`.
    Missing,
    /// The file does not exist and the policy is `Skip`.
    Skipped,
}

impl Outcome {
    /// Whether this outcome should make the overall check fail.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Canonical | Self::Skipped)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Canonical => "ok",
            Self::Mismatch(_) => "not canonical",
            Self::Invalid(_) => "invalid",
            Self::Unreadable(_) => "unreadable",
            Self::Missing => "missing",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch(m) => write!(f, "{}: {m}", self.label()),
            Self::Invalid(e) => write!(f, "{}: {e}", self.label()),
            Self::Unreadable(e) => write!(f, "{}: {e}", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

/// The outcome for one file of a batch.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl FileReport {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }
}

/// Counts per outcome across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub canonical: usize,
    pub mismatched: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                Outcome::Canonical => summary.canonical += 1,
                Outcome::Mismatch(_) => summary.mismatched += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Invalid(_) | Outcome::Unreadable(_) | Outcome::Missing => {
                    summary.failed += 1
                }
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.canonical + self.mismatched + self.failed + self.skipped
    }

    pub fn is_success(&self) -> bool {
        self.mismatched == 0 && self.failed == 0
    }
}

impl Codec {
    /// Verifies one file on disk.
    pub fn check_file(&self, path: &Path, policy: MissingPolicy) -> FileReport {
        let outcome = match std::fs::read_to_string(path) {
            Ok(source) => match self.verify(&source) {
                Ok(Verdict::Canonical) => Outcome::Canonical,
                Ok(Verdict::Mismatch(m)) => Outcome::Mismatch(m),
                Err(e) => Outcome::Invalid(e),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => match policy {
                MissingPolicy::Fail => Outcome::Missing,
                MissingPolicy::Skip => Outcome::Skipped,
            },
            Err(e) => Outcome::Unreadable(e),
        };
        if outcome.is_failure() {
            warn!(path = %path.display(), outcome = outcome.label(), "check failed");
        } else {
            debug!(path = %path.display(), outcome = outcome.label(), "checked");
        }
        FileReport {
            path: path.to_path_buf(),
            outcome,
        }
    }

    /// Verifies every file independently, in the order given.
    ///
    /// A failure in one file never stops the others from being checked.
    pub fn check_files<P: AsRef<Path>>(&self, paths: &[P], policy: MissingPolicy) -> Vec<FileReport> {
        paths
            .iter()
            .map(|p| self.check_file(p.as_ref(), policy))
            .collect()
    }
}

/// Writes the canonical text over a file reported as not canonical.
///
/// Returns `Ok(false)` when the report needs no rewrite.
///
/// # Errors
///
/// Returns the I/O error from writing the file.
pub fn rewrite(report: &FileReport) -> io::Result<bool> {
    let Outcome::Mismatch(m) = &report.outcome else {
        return Ok(false);
    };
    std::fs::write(&report.path, &m.canonical)?;
    debug!(path = %report.path.display(), "rewrote canonical form");
    Ok(true)
}
