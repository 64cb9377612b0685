use std::path::Path;

use itertools::Itertools;

use crate::libs::error::BbhError;

/// Companion files `makeblastdb -dbtype prot` leaves next to the FASTA file.
pub const DB_SUFFIXES: [&str; 3] = [".phr", ".pin", ".psq"];

/// Produces a headerless outfmt-6 table of `query` searched against `db`.
pub trait AlignmentRunner {
    /// Writes the hit table to `out`. An existing `out` is kept unless `force`.
    fn align(&self, db: &Path, query: &Path, out: &Path, force: bool) -> Result<(), BbhError>;
}

/// Runs NCBI `blastp`.
#[derive(Debug, Clone)]
pub struct Blastp {
    pub program: String,
    pub evalue: f64,
    pub threads: usize,
}

impl Default for Blastp {
    fn default() -> Self {
        Self {
            program: "blastp".to_string(),
            evalue: 0.001,
            threads: 1,
        }
    }
}

impl Blastp {
    pub fn args(&self, db: &Path, query: &Path, out: &Path) -> Vec<String> {
        vec![
            "-db".to_string(),
            db.display().to_string(),
            "-query".to_string(),
            query.display().to_string(),
            "-out".to_string(),
            out.display().to_string(),
            "-evalue".to_string(),
            self.evalue.to_string(),
            "-outfmt".to_string(),
            "6".to_string(),
            "-num_threads".to_string(),
            self.threads.to_string(),
        ]
    }
}

impl AlignmentRunner for Blastp {
    fn align(&self, db: &Path, query: &Path, out: &Path, force: bool) -> Result<(), BbhError> {
        if !force && out.is_file() {
            log::info!("{} already blasted", query.display());
            return Ok(());
        }

        let args = self.args(db, query, out);
        let command = format!("{} {}", self.program, args.iter().join(" "));

        let exe = which::which(&self.program).map_err(|e| BbhError::AlignmentTool {
            command: command.clone(),
            diagnostic: format!(
                "{}; make sure BLAST+ is installed and `{}` is in PATH",
                e, self.program
            ),
        })?;

        log::info!("blasting {} vs {}", query.display(), db.display());
        log::info!("{}", command);

        let output = std::process::Command::new(exe)
            .args(&args)
            .output()
            .map_err(|e| BbhError::AlignmentTool {
                command: command.clone(),
                diagnostic: e.to_string(),
            })?;

        if !output.status.success() {
            // Partial output from a failed run must not be picked up as cached
            if out.is_file() {
                std::fs::remove_file(out)?;
            }
            return Err(BbhError::AlignmentTool {
                command,
                diagnostic: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}
