use std::collections::HashSet;

use crate::libs::error::BbhError;
use crate::libs::hit::{DirectionalHitTable, HitRecord};
use crate::libs::length::GeneLengthIndex;

/// A hit joined with the length of its query.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveredHit {
    pub hit: HitRecord,
    pub gene_length: usize,
    /// `alignment_length / gene_length`, may exceed 1
    pub coverage: f64,
}

/// Coverage filtered rows of one direction, input order kept.
#[derive(Debug, Clone, Default)]
pub struct CoveredTable {
    pub name: String,
    pub hits: Vec<CoveredHit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    pub records_in: usize,
    pub records_kept: usize,
    /// Queries that had hits but none survived the threshold
    pub queries_dropped: usize,
}

pub fn validate_min_coverage(min_coverage: f64) -> Result<(), BbhError> {
    if min_coverage > 0.0 && min_coverage <= 1.0 {
        Ok(())
    } else {
        Err(BbhError::InvalidParameter(format!(
            "coverage must be greater than 0 and less than or equal to 1, got {}",
            min_coverage
        )))
    }
}

pub fn coverage(alignment_length: u32, gene_length: usize) -> f64 {
    match (alignment_length, gene_length) {
        (0, _) => 0.0,
        (_, 0) => f64::INFINITY,
        (a, g) => a as f64 / g as f64,
    }
}

/// Joins every row with the length of its query and keeps rows whose
/// coverage reaches `min_coverage`.
///
/// `index` must be the index of the query side. A query without a length is
/// an inconsistency between the table and the sequence set and is reported.
pub fn filter_by_coverage(
    table: &DirectionalHitTable,
    index: &GeneLengthIndex,
    min_coverage: f64,
) -> Result<(CoveredTable, CoverageSummary), BbhError> {
    validate_min_coverage(min_coverage)?;

    let mut hits = Vec::with_capacity(table.len());
    for rec in &table.records {
        let gene_length = index.get(&rec.query).ok_or_else(|| BbhError::MissingLength {
            query: rec.query.clone(),
            set: index.name().to_string(),
        })?;
        let coverage = coverage(rec.alignment_length, gene_length);
        if coverage >= min_coverage {
            hits.push(CoveredHit {
                hit: rec.clone(),
                gene_length,
                coverage,
            });
        }
    }

    let kept: HashSet<&str> = hits.iter().map(|h| h.hit.query.as_str()).collect();
    let summary = CoverageSummary {
        records_in: table.len(),
        records_kept: hits.len(),
        queries_dropped: table
            .queries()
            .into_iter()
            .filter(|q| !kept.contains(q))
            .count(),
    };
    log::debug!(
        "{}: kept {} of {} hits at coverage >= {}",
        table.name,
        summary.records_kept,
        summary.records_in,
        min_coverage
    );

    Ok((
        CoveredTable {
            name: table.name.clone(),
            hits,
        },
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> DirectionalHitTable {
        let input = "\
g1\ts1\t95.0\t90\t5\t0\t1\t90\t1\t90\t1e-50\t200
g1\ts2\t90.0\t50\t10\t0\t1\t50\t1\t50\t1e-40\t180
g2\ts2\t80.0\t40\t10\t0\t1\t40\t1\t40\t1e-20\t90
";
        DirectionalHitTable::from_reader("mem", input.as_bytes()).unwrap()
    }

    fn index() -> GeneLengthIndex {
        vec![("g1".to_string(), 100), ("g2".to_string(), 100)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_validate() {
        assert!(validate_min_coverage(0.8).is_ok());
        assert!(validate_min_coverage(1.0).is_ok());
        assert!(validate_min_coverage(0.0).is_err());
        assert!(validate_min_coverage(1.5).is_err());
        assert!(validate_min_coverage(-0.1).is_err());
        assert!(validate_min_coverage(f64::NAN).is_err());
    }

    #[test]
    fn test_filter() {
        let (covered, summary) = filter_by_coverage(&table(), &index(), 0.5).unwrap();

        assert_eq!(covered.hits.len(), 2);
        assert_eq!(covered.hits[0].hit.subject, "s1");
        assert_relative_eq!(covered.hits[0].coverage, 0.9);
        assert_relative_eq!(covered.hits[1].coverage, 0.5);
        assert_eq!(
            summary,
            CoverageSummary {
                records_in: 3,
                records_kept: 2,
                queries_dropped: 1,
            }
        );
    }

    #[test]
    fn test_filter_is_monotone() {
        let mut prev = usize::MAX;
        for c in [0.1, 0.4, 0.5, 0.9, 1.0] {
            let (covered, _) = filter_by_coverage(&table(), &index(), c).unwrap();
            assert!(covered.hits.len() <= prev);
            prev = covered.hits.len();
        }
    }

    #[test]
    fn test_missing_length() {
        let index: GeneLengthIndex = vec![("g1".to_string(), 100)].into_iter().collect();
        let err = filter_by_coverage(&table(), &index, 0.5).unwrap_err();
        assert!(matches!(err, BbhError::MissingLength { ref query, .. } if query == "g2"));
    }

    #[test]
    fn test_zero_length_gene() {
        assert_eq!(coverage(0, 0), 0.0);
        assert!(coverage(10, 0).is_infinite());
    }
}
