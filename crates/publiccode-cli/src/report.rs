//! Per-file validation reports
//!
//! One [`FileReport`] per input file, printable for humans and
//! serializable as the `--json` output.

use colored::Colorize;
use publiccode_core::{Error, PublicCode, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The outcome of validating one manifest file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub valid: bool,
    /// Validation messages in engine emission order; for non-validation
    /// failures, the single failure message.
    pub errors: Vec<String>,
    /// Non-fatal messages emitted alongside a successful parse.
    pub warnings: Vec<String>,
}

impl FileReport {
    pub fn from_parse(file: &Path, outcome: Result<PublicCode>) -> Self {
        match outcome {
            Ok(doc) => Self {
                file: file.to_path_buf(),
                valid: true,
                errors: Vec::new(),
                warnings: doc.warnings().to_vec(),
            },
            Err(Error::Validation { errors, .. }) => Self {
                file: file.to_path_buf(),
                valid: false,
                errors,
                warnings: Vec::new(),
            },
            Err(other) => Self {
                file: file.to_path_buf(),
                valid: false,
                errors: vec![other.to_string()],
                warnings: Vec::new(),
            },
        }
    }

    pub fn print(&self, quiet: bool) {
        if self.valid {
            if !quiet {
                println!("{} {}", "ok".green().bold(), self.file.display());
            }
        } else {
            println!("{} {}", "invalid".red().bold(), self.file.display());
        }

        for error in &self.errors {
            println!("  {error}");
        }
        for warning in &self.warnings {
            if !quiet {
                println!("  {} {warning}", "warning:".yellow());
            }
        }
    }
}
