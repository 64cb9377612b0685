//! Reciprocal best hit resolution over two coverage filtered tables.
//!
//! Hits are ranked by percent identity alone. Among hits sharing the maximum
//! identity the first one in table order wins. E-value and bit score are carried
//! along but never used for ranking.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::libs::coverage::{CoveredHit, CoveredTable};
use crate::libs::error::BbhError;
use crate::libs::length::GeneLengthIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reciprocity {
    /// Best hit in both directions
    #[serde(rename = "<=>")]
    Full,
    /// Best hit in the forward direction only
    #[serde(rename = "->")]
    Partial,
}

impl std::fmt::Display for Reciprocity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reciprocity::Full => write!(f, "<=>"),
            Reciprocity::Partial => write!(f, "->"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    FullOnly,
    WithPartial,
}

/// A resolved gene of set A with its best hit in set B.
///
/// Field order and names are those of the persisted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthologRecord {
    /// Row of the best hit in the forward table
    #[serde(rename = "")]
    pub index: usize,
    pub gene: String,
    pub subject: String,
    #[serde(rename = "PID")]
    pub percent_identity: f64,
    #[serde(rename = "alnLength")]
    pub alignment_length: u32,
    #[serde(rename = "mismatchCount")]
    pub mismatch_count: u32,
    #[serde(rename = "gapOpenCount")]
    pub gap_open_count: u32,
    #[serde(rename = "queryStart")]
    pub query_start: u32,
    #[serde(rename = "queryEnd")]
    pub query_end: u32,
    #[serde(rename = "subjectStart")]
    pub subject_start: u32,
    #[serde(rename = "subjectEnd")]
    pub subject_end: u32,
    #[serde(rename = "eVal")]
    pub e_value: f64,
    #[serde(rename = "bitScore")]
    pub bit_score: f64,
    pub gene_length: usize,
    #[serde(rename = "COV")]
    pub coverage: f64,
    #[serde(rename = "BBH")]
    pub reciprocity: Reciprocity,
}

impl OrthologRecord {
    fn from_hit(best: &CoveredHit, reciprocity: Reciprocity) -> Self {
        let hit = &best.hit;
        Self {
            index: hit.row,
            gene: hit.query.clone(),
            subject: hit.subject.clone(),
            percent_identity: hit.percent_identity,
            alignment_length: hit.alignment_length,
            mismatch_count: hit.mismatch_count,
            gap_open_count: hit.gap_open_count,
            query_start: hit.query_start,
            query_end: hit.query_end,
            subject_start: hit.subject_start,
            subject_end: hit.subject_end,
            e_value: hit.e_value,
            bit_score: hit.bit_score,
            gene_length: best.gene_length,
            coverage: best.coverage,
            reciprocity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Distinct genes with at least one filtered forward hit
    pub genes: usize,
    pub full: usize,
    pub partial: usize,
    /// Genes whose best subject has no row in the reverse table
    pub no_reciprocal: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub records: Vec<OrthologRecord>,
    pub summary: ResolveSummary,
}

/// First hit carrying the maximum percent identity.
fn best_hit<'a>(hits: &[&'a CoveredHit]) -> Option<&'a CoveredHit> {
    let mut best: Option<&CoveredHit> = None;
    for &h in hits {
        match best {
            Some(b) if h.hit.percent_identity <= b.hit.percent_identity => {}
            _ => best = Some(h),
        }
    }
    best
}

fn group_by_query(table: &CoveredTable) -> IndexMap<&str, Vec<&CoveredHit>> {
    let mut groups: IndexMap<&str, Vec<&CoveredHit>> = IndexMap::new();
    for h in &table.hits {
        groups.entry(h.hit.query.as_str()).or_default().push(h);
    }
    groups
}

fn check_ids(
    table: &CoveredTable,
    query_set: &GeneLengthIndex,
    subject_set: &GeneLengthIndex,
) -> Result<(), BbhError> {
    for h in &table.hits {
        for (id, role, set) in [
            (&h.hit.query, "query", query_set),
            (&h.hit.subject, "subject", subject_set),
        ] {
            if !set.contains(id) {
                return Err(BbhError::InputMismatch {
                    table: table.name.clone(),
                    id: id.clone(),
                    role,
                    set: set.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Resolves bidirectional best hits of set A against set B.
///
/// `a_to_b` holds set A queried against set B, `b_to_a` the reverse. Every
/// identifier must be known to the matching index.
pub fn resolve(
    a_to_b: &CoveredTable,
    b_to_a: &CoveredTable,
    lengths_a: &GeneLengthIndex,
    lengths_b: &GeneLengthIndex,
    mode: OutputMode,
) -> Result<Resolution, BbhError> {
    check_ids(a_to_b, lengths_a, lengths_b)?;
    check_ids(b_to_a, lengths_b, lengths_a)?;

    let forward = group_by_query(a_to_b);
    let reverse = group_by_query(b_to_a);

    let mut resolution = Resolution::default();
    for (gene, hits) in &forward {
        let Some(best) = best_hit(hits) else {
            continue;
        };
        resolution.summary.genes += 1;

        let subject = best.hit.subject.as_str();
        let Some(back) = reverse.get(subject).and_then(|hits| best_hit(hits)) else {
            log::debug!("{} -> {}: no reciprocal hit", gene, subject);
            resolution.summary.no_reciprocal += 1;
            continue;
        };

        let reciprocity = if back.hit.subject == *gene {
            resolution.summary.full += 1;
            Reciprocity::Full
        } else {
            log::debug!("{} -> {} -> {}", gene, subject, back.hit.subject);
            resolution.summary.partial += 1;
            Reciprocity::Partial
        };

        if reciprocity == Reciprocity::Full || mode == OutputMode::WithPartial {
            resolution
                .records
                .push(OrthologRecord::from_hit(best, reciprocity));
        }
    }

    Ok(resolution)
}
