use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::libs::error::BbhError;
use crate::libs::resolve::OrthologRecord;

/// Parameters that determine a persisted result.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub query_set: String,
    pub subject_set: String,
    pub min_coverage: f64,
    pub evalue: f64,
    /// One-directional best hits are part of the result
    pub with_partial: bool,
}

impl RunParams {
    fn to_lines(&self) -> String {
        format!(
            "query_set\t{}\nsubject_set\t{}\nmin_coverage\t{}\nevalue\t{}\nwith_partial\t{}\n",
            self.query_set, self.subject_set, self.min_coverage, self.evalue, self.with_partial
        )
    }

    fn from_reader<R: BufRead>(reader: R) -> Option<Self> {
        let mut params = RunParams {
            query_set: String::new(),
            subject_set: String::new(),
            min_coverage: f64::NAN,
            evalue: f64::NAN,
            with_partial: false,
        };
        for line in reader.lines() {
            let line = line.ok()?;
            let (key, value) = line.split_once('\t')?;
            match key {
                "query_set" => params.query_set = value.to_string(),
                "subject_set" => params.subject_set = value.to_string(),
                "min_coverage" => params.min_coverage = value.parse().ok()?,
                "evalue" => params.evalue = value.parse().ok()?,
                "with_partial" => params.with_partial = value.parse().ok()?,
                _ => {}
            }
        }
        Some(params)
    }
}

/// `<result>.params`, next to the result file
pub fn params_path(result: &Path) -> PathBuf {
    let mut name = result.as_os_str().to_os_string();
    name.push(".params");
    PathBuf::from(name)
}

pub fn write_records<W: Write>(wtr: W, records: &[OrthologRecord]) -> Result<(), BbhError> {
    let mut wtr = csv::Writer::from_writer(wtr);
    if records.is_empty() {
        wtr.write_record(EMPTY_HEADER)?;
    }
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

const EMPTY_HEADER: [&str; 16] = [
    "",
    "gene",
    "subject",
    "PID",
    "alnLength",
    "mismatchCount",
    "gapOpenCount",
    "queryStart",
    "queryEnd",
    "subjectStart",
    "subjectEnd",
    "eVal",
    "bitScore",
    "gene_length",
    "COV",
    "BBH",
];

pub fn read_records(path: &Path) -> Result<Vec<OrthologRecord>, BbhError> {
    let reader = crate::reader(&path.display().to_string())?;
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = vec![];
    for result in rdr.deserialize::<OrthologRecord>() {
        let rec = result.map_err(|e| BbhError::MalformedResult {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        records.push(rec);
    }
    Ok(records)
}

/// Returns the persisted result at `path` when it was produced with `params`.
///
/// A result without a parameter file predates it and is accepted as is.
pub fn cached_result(
    path: &Path,
    params: &RunParams,
) -> Result<Option<Vec<OrthologRecord>>, BbhError> {
    if !path.is_file() {
        return Ok(None);
    }

    let sidecar = params_path(path);
    if sidecar.is_file() {
        let stored = RunParams::from_reader(crate::reader(&sidecar.display().to_string())?);
        if stored.as_ref() != Some(params) {
            log::info!(
                "{} was parsed with different parameters, recomputing",
                path.display()
            );
            return Ok(None);
        }
    }

    Ok(Some(read_records(path)?))
}

/// True when `table` exists and its `.params` stamp records `evalue`.
///
/// A table without a stamp has unknown provenance and is not current.
pub fn alignment_is_current(table: &Path, evalue: f64) -> bool {
    if !table.is_file() {
        return false;
    }
    let Ok(text) = std::fs::read_to_string(params_path(table)) else {
        return false;
    };
    text.lines()
        .filter_map(|line| line.strip_prefix("evalue\t"))
        .any(|value| value.parse::<f64>().ok() == Some(evalue))
}

/// Stamps `table` with the e-value it was searched with.
pub fn record_alignment(table: &Path, evalue: f64) -> Result<(), BbhError> {
    std::fs::write(params_path(table), format!("evalue\t{}\n", evalue))?;
    Ok(())
}

/// Persists `records` with their parameters, or removes the per-direction
/// alignment tables and their stamps when `persist` is false.
pub fn materialize(
    records: &[OrthologRecord],
    persist: bool,
    out_file: &Path,
    params: &RunParams,
    intermediates: &[&Path],
) -> Result<(), BbhError> {
    if persist {
        log::info!("Saving results to: {}", out_file.display());
        write_records(crate::writer(&out_file.display().to_string())?, records)?;
        std::fs::write(params_path(out_file), params.to_lines())?;
    } else {
        for path in intermediates {
            for file in [path.to_path_buf(), params_path(path)] {
                if file.is_file() {
                    log::debug!("Removing {}", file.display());
                    std::fs::remove_file(&file)?;
                }
            }
        }
    }
    Ok(())
}
