use std::io::BufRead;
use std::path::Path;

use indexmap::IndexMap;

use crate::libs::error::BbhError;

/// Sequence identifier to residue count, for one sequence set.
///
/// Built once and never mutated afterwards. Identifiers are the first word of
/// each FASTA definition line, which is also the identifier the aligner reports.
#[derive(Debug, Clone, Default)]
pub struct GeneLengthIndex {
    name: String,
    lengths: IndexMap<String, usize>,
}

impl GeneLengthIndex {
    pub fn from_reader<R: BufRead>(name: &str, reader: R) -> Result<Self, BbhError> {
        let malformed = |message: String| BbhError::MalformedSequence {
            source_name: name.to_string(),
            message,
        };

        let mut fa_in = noodles_fasta::io::Reader::new(reader);
        let mut lengths = IndexMap::new();

        for result in fa_in.records() {
            let record = result.map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => malformed(e.to_string()),
                _ => BbhError::Io(e),
            })?;
            let id = String::from_utf8(record.name().into())
                .map_err(|_| malformed("identifier is not valid UTF-8".to_string()))?;
            if id.is_empty() {
                return Err(malformed("record without identifier".to_string()));
            }

            let len = record.sequence().len();
            if lengths.insert(id.clone(), len).is_some() {
                return Err(malformed(format!("duplicate identifier `{}`", id)));
            }
        }

        Ok(Self {
            name: name.to_string(),
            lengths,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BbhError> {
        let name = path.as_ref().display().to_string();
        let reader = crate::reader(&name)?;
        Self::from_reader(&name, reader)
    }

    /// Name of the sequence set, the path it was read from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.lengths.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lengths.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Identifiers and lengths in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lengths.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, usize)> for GeneLengthIndex {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Self {
            name: "memory".to_string(),
            lengths: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        let input = ">g1 some protein\nMKV\nLLA\n>g2\nMA\n>g3\n\n";
        let index = GeneLengthIndex::from_reader("mem", input.as_bytes()).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("g1"), Some(6));
        assert_eq!(index.get("g2"), Some(2));
        // empty sequences are valid
        assert_eq!(index.get("g3"), Some(0));
        assert_eq!(index.get("g1 some protein"), None);
        assert_eq!(
            index.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["g1", "g2", "g3"]
        );
    }

    #[test]
    fn test_duplicate_identifier() {
        let input = ">g1\nMKV\n>g1\nMA\n";
        let err = GeneLengthIndex::from_reader("mem", input.as_bytes()).unwrap_err();
        assert!(matches!(err, BbhError::MalformedSequence { .. }));
    }

    #[test]
    fn test_missing_identifier() {
        let input = ">\nMKV\n";
        let err = GeneLengthIndex::from_reader("mem", input.as_bytes()).unwrap_err();
        assert!(matches!(err, BbhError::MalformedSequence { .. }));
    }
}
