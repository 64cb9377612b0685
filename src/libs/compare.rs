use std::collections::BTreeSet;

use crate::libs::resolve::OrthologRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Same,
    /// Identical once gene and subject are exchanged, the reciprocal run
    Swapped,
    Different {
        only_left: Vec<(String, String)>,
        only_right: Vec<(String, String)>,
    },
}

fn pairs(records: &[OrthologRecord]) -> BTreeSet<(String, String)> {
    records
        .iter()
        .map(|r| (r.gene.clone(), r.subject.clone()))
        .collect()
}

/// Compares two results by their (gene, subject) pairs.
pub fn compare(left: &[OrthologRecord], right: &[OrthologRecord]) -> Comparison {
    let l = pairs(left);
    let r = pairs(right);
    if l == r {
        return Comparison::Same;
    }

    let swapped: BTreeSet<(String, String)> =
        r.iter().map(|(g, s)| (s.clone(), g.clone())).collect();
    if l == swapped {
        return Comparison::Swapped;
    }

    Comparison::Different {
        only_left: l.difference(&r).cloned().collect(),
        only_right: r.difference(&l).cloned().collect(),
    }
}
