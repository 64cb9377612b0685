use std::path::{Path, PathBuf};

use crate::libs::blast::{AlignmentRunner, Blastp, DB_SUFFIXES};
use crate::libs::coverage::{filter_by_coverage, validate_min_coverage, CoverageSummary};
use crate::libs::error::BbhError;
use crate::libs::hit::DirectionalHitTable;
use crate::libs::length::GeneLengthIndex;
use crate::libs::resolve::{resolve, OrthologRecord, OutputMode, ResolveSummary};
use crate::libs::store::{
    alignment_is_current, cached_result, materialize, record_alignment, RunParams,
};

/// Everything a pair's resolution depends on, passed in explicitly.
#[derive(Debug, Clone)]
pub struct BbhConfig {
    /// Base directory for relative input paths
    pub indir: Option<PathBuf>,
    pub outdir: PathBuf,
    /// Result file name, `<db1>_vs_<db2>_parsed.csv` when absent
    pub outname: Option<String>,
    pub min_coverage: f64,
    pub evalue: f64,
    pub threads: usize,
    pub force: bool,
    pub save_files: bool,
    pub output_mode: OutputMode,
    pub blastp: String,
}

impl Default for BbhConfig {
    fn default() -> Self {
        Self {
            indir: None,
            outdir: PathBuf::from("bbh"),
            outname: None,
            min_coverage: 0.8,
            evalue: 0.001,
            threads: 1,
            force: false,
            save_files: true,
            output_mode: OutputMode::FullOnly,
            blastp: "blastp".to_string(),
        }
    }
}

impl BbhConfig {
    pub fn validate(&self) -> Result<(), BbhError> {
        validate_min_coverage(self.min_coverage)?;
        if !(self.evalue > 0.0 && self.evalue.is_finite()) {
            return Err(BbhError::InvalidParameter(format!(
                "evalue must be greater than 0, got {}",
                self.evalue
            )));
        }
        if self.threads < 1 {
            return Err(BbhError::InvalidParameter(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn input_path(&self, path: &Path) -> PathBuf {
        match &self.indir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn runner(&self) -> Blastp {
        Blastp {
            program: self.blastp.clone(),
            evalue: self.evalue,
            threads: self.threads,
        }
    }
}

/// File name without its last extension, `ecoli.fasta` gives `ecoli`
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Checks inputs and search indices, then creates the output directory.
pub fn preflight(db1: &Path, db2: &Path, outdir: &Path) -> Result<(), BbhError> {
    for db in [db1, db2] {
        if !db.is_file() {
            return Err(BbhError::MissingInput {
                path: db.to_path_buf(),
                reason: "fasta file is missing".to_string(),
            });
        }
    }
    for db in [db1, db2] {
        for suffix in DB_SUFFIXES {
            let mut index = db.as_os_str().to_os_string();
            index.push(suffix);
            let index = PathBuf::from(index);
            if !index.is_file() {
                return Err(BbhError::MissingInput {
                    path: index,
                    reason: "BLAST db file is missing, run makeblastdb first".to_string(),
                });
            }
        }
    }

    if !outdir.is_dir() {
        log::info!("Making the output directory: {}", outdir.display());
        std::fs::create_dir_all(outdir)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct PairOutcome {
    pub records: Vec<OrthologRecord>,
    /// The persisted result was reused, nothing was resolved
    pub cached: bool,
    pub out_file: PathBuf,
    pub forward: CoverageSummary,
    pub reverse: CoverageSummary,
    pub summary: ResolveSummary,
}

/// Resolves the two per-direction tables already on disk.
pub fn resolve_files(
    fasta1: &Path,
    fasta2: &Path,
    hits1: &Path,
    hits2: &Path,
    min_coverage: f64,
    mode: OutputMode,
) -> Result<PairOutcome, BbhError> {
    validate_min_coverage(min_coverage)?;

    let lengths1 = GeneLengthIndex::from_path(fasta1)?;
    let lengths2 = GeneLengthIndex::from_path(fasta2)?;

    let (forward, forward_summary) =
        filter_by_coverage(&DirectionalHitTable::from_path(hits1)?, &lengths1, min_coverage)?;
    let (reverse, reverse_summary) =
        filter_by_coverage(&DirectionalHitTable::from_path(hits2)?, &lengths2, min_coverage)?;

    let resolution = resolve(&forward, &reverse, &lengths1, &lengths2, mode)?;
    let s = &resolution.summary;
    log::info!(
        "{} genes with hits: {} <=>, {} ->, {} without reciprocal hits, {} dropped by coverage",
        s.genes,
        s.full,
        s.partial,
        s.no_reciprocal,
        forward_summary.queries_dropped
    );

    Ok(PairOutcome {
        records: resolution.records,
        cached: false,
        out_file: PathBuf::new(),
        forward: forward_summary,
        reverse: reverse_summary,
        summary: resolution.summary,
    })
}

/// Bidirectional best hits of `db1` against `db2`.
///
/// Both files need prebuilt BLAST protein databases next to them. Alignment
/// tables land in the output directory as `<db2>_vs_<db1>.txt` and
/// `<db1>_vs_<db2>.txt`, named `<query>_vs_<db>`.
pub fn get_bbh(
    db1: &Path,
    db2: &Path,
    config: &BbhConfig,
    runner: &dyn AlignmentRunner,
) -> Result<PairOutcome, BbhError> {
    config.validate()?;

    let db1 = config.input_path(db1);
    let db2 = config.input_path(db2);
    preflight(&db1, &db2, &config.outdir)?;

    let on1 = stem(&db1);
    let on2 = stem(&db2);
    let outname = config
        .outname
        .clone()
        .unwrap_or_else(|| format!("{}_vs_{}_parsed.csv", on1, on2));
    let out_file = config.outdir.join(outname);

    let params = RunParams {
        query_set: db1.display().to_string(),
        subject_set: db2.display().to_string(),
        min_coverage: config.min_coverage,
        evalue: config.evalue,
        with_partial: config.output_mode == OutputMode::WithPartial,
    };
    if !config.force {
        if let Some(records) = cached_result(&out_file, &params)? {
            log::info!("bbh already parsed for {} {}", on1, on2);
            return Ok(PairOutcome {
                records,
                cached: true,
                out_file,
                ..Default::default()
            });
        }
    }

    let hits2 = config.outdir.join(format!("{}_vs_{}.txt", on2, on1));
    let hits1 = config.outdir.join(format!("{}_vs_{}.txt", on1, on2));
    for (db, query, hits) in [(&db1, &db2, &hits2), (&db2, &db1, &hits1)] {
        let current = alignment_is_current(hits, config.evalue);
        if !current && hits.is_file() {
            log::info!(
                "{} was not searched with evalue {}, realigning",
                hits.display(),
                config.evalue
            );
        }
        runner.align(db, query, hits, config.force || !current)?;
        record_alignment(hits, config.evalue)?;
    }

    log::info!("parsing BBHs for {} {}", on1, on2);
    let mut outcome = resolve_files(
        &db1,
        &db2,
        &hits1,
        &hits2,
        config.min_coverage,
        config.output_mode,
    )?;

    materialize(
        &outcome.records,
        config.save_files,
        &out_file,
        &params,
        &[hits1.as_path(), hits2.as_path()],
    )?;
    outcome.out_file = out_file;

    Ok(outcome)
}
