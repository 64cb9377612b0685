use std::io::BufRead;
use std::path::Path;

use indexmap::IndexSet;

use crate::libs::error::BbhError;

/// Column names of a tabular (outfmt 6) alignment result, in file order.
pub const HIT_COLUMNS: [&str; 12] = [
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
];

/// One row of an alignment result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitRecord {
    /// 0-based position of the row within its table
    pub row: usize,
    pub query: String,
    pub subject: String,
    pub percent_identity: f64,
    pub alignment_length: u32,
    pub mismatch_count: u32,
    pub gap_open_count: u32,
    pub query_start: u32,
    pub query_end: u32,
    pub subject_start: u32,
    pub subject_end: u32,
    pub e_value: f64,
    pub bit_score: f64,
}

impl std::str::FromStr for HitRecord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('\t').map(|f| f.trim()).collect();
        if fields.len() != HIT_COLUMNS.len() {
            return Err(format!(
                "expected {} columns, found {}",
                HIT_COLUMNS.len(),
                fields.len()
            ));
        }

        let parse_u32 = |i: usize| {
            fields[i]
                .parse::<u32>()
                .map_err(|_| format!("invalid {}: {}", HIT_COLUMNS[i], fields[i]))
        };
        let parse_f64 = |i: usize| {
            fields[i]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid {}: {}", HIT_COLUMNS[i], fields[i]))
        };

        if fields[0].is_empty() || fields[1].is_empty() {
            return Err("empty query or subject identifier".to_string());
        }

        let percent_identity = parse_f64(2)?;
        if !(0.0..=100.0).contains(&percent_identity) {
            return Err(format!("PID out of [0, 100]: {}", percent_identity));
        }

        Ok(HitRecord {
            row: 0,
            query: fields[0].to_string(),
            subject: fields[1].to_string(),
            percent_identity,
            alignment_length: parse_u32(3)?,
            mismatch_count: parse_u32(4)?,
            gap_open_count: parse_u32(5)?,
            query_start: parse_u32(6)?,
            query_end: parse_u32(7)?,
            subject_start: parse_u32(8)?,
            subject_end: parse_u32(9)?,
            e_value: parse_f64(10)?,
            bit_score: parse_f64(11)?,
        })
    }
}

/// Hits of one set queried against the other, in the aligner's row order.
#[derive(Debug, Clone, Default)]
pub struct DirectionalHitTable {
    /// Where the rows came from, used in diagnostics
    pub name: String,
    pub records: Vec<HitRecord>,
}

impl DirectionalHitTable {
    /// Reads a headerless tab-separated table. Blank and `#` lines are skipped
    /// and do not count towards `row`.
    pub fn from_reader<R: BufRead>(name: &str, reader: R) -> Result<Self, BbhError> {
        let mut records = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut rec = line.parse::<HitRecord>().map_err(|message| BbhError::MalformedHit {
                source_name: name.to_string(),
                line: i + 1,
                message,
            })?;
            rec.row = records.len();
            records.push(rec);
        }

        Ok(Self {
            name: name.to_string(),
            records,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BbhError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let reader = crate::reader(&name)?;
        Self::from_reader(&name, reader)
    }

    /// Distinct query identifiers in first-seen order.
    pub fn queries(&self) -> IndexSet<&str> {
        self.records.iter().map(|r| r.query.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hit() {
        let line = "b0001\tECO_1\t95.000\t21\t1\t0\t1\t21\t1\t21\t2.3e-10\t 45.1";
        let hit: HitRecord = line.parse().unwrap();

        assert_eq!(hit.query, "b0001");
        assert_eq!(hit.subject, "ECO_1");
        assert_eq!(hit.percent_identity, 95.0);
        assert_eq!(hit.alignment_length, 21);
        assert_eq!(hit.query_end, 21);
        assert_eq!(hit.e_value, 2.3e-10);
        assert_eq!(hit.bit_score, 45.1);
    }

    #[test]
    fn test_parse_hit_invalid() {
        assert!("g1\ts1\t95.0\t21".parse::<HitRecord>().is_err());
        // custom outfmt 6 column lists are not the fixed layout
        assert_eq!(
            "g1\ts1\t95.0\t21\t1\t0\t1\t21\t1\t21\t1e-5\t40\t21"
                .parse::<HitRecord>()
                .unwrap_err(),
            "expected 12 columns, found 13"
        );
        assert!("g1\ts1\tabc\t21\t1\t0\t1\t21\t1\t21\t1e-5\t40"
            .parse::<HitRecord>()
            .is_err());
        assert!("g1\ts1\t101.0\t21\t1\t0\t1\t21\t1\t21\t1e-5\t40"
            .parse::<HitRecord>()
            .is_err());
        assert!("g1\ts1\tNaN\t21\t1\t0\t1\t21\t1\t21\t1e-5\t40"
            .parse::<HitRecord>()
            .is_err());
    }

    #[test]
    fn test_table_from_reader() {
        let input = "\
# comment
g1\ts1\t95.0\t100\t5\t0\t1\t100\t1\t100\t1e-50\t200

g1\ts2\t90.0\t100\t10\t0\t1\t100\t1\t100\t1e-40\t180
g2\ts2\t80.0\t50\t10\t0\t1\t50\t1\t50\t1e-20\t90
";
        let table = DirectionalHitTable::from_reader("mem", input.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[2].row, 2);
        assert_eq!(table.queries().into_iter().collect::<Vec<_>>(), vec!["g1", "g2"]);
    }

    #[test]
    fn test_table_reports_line() {
        let input = "g1\ts1\t95.0\t100\t5\t0\t1\t100\t1\t100\t1e-50\t200\ng2\tbroken\n";
        match DirectionalHitTable::from_reader("mem", input.as_bytes()) {
            Err(BbhError::MalformedHit { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
