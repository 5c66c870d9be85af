//! Classic cross-reference table for the appended update
//!
//! Records are grouped into subsections of consecutive object numbers.
//! Every record is exactly 20 bytes:
//! `oooooooooo ggggg n\r\n` (10-digit offset, 5-digit generation, status).

use super::tokens::*;
use crate::error::{PdfError, Result};
use std::collections::BTreeMap;

/// One cross-reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRef {
    pub id: u32,
    /// Byte offset for in-use objects, next free object number for free ones
    pub pointer: u64,
    pub generation: u16,
    pub free: bool,
    pub update: bool,
}

impl XRef {
    /// Record for an object written at `pointer`
    pub fn in_use(id: u32, generation: u16, pointer: u64) -> Self {
        Self {
            id,
            pointer,
            generation,
            free: false,
            update: true,
        }
    }

    /// Free-list record pointing at the next free object number
    pub fn free(id: u32, generation: u16, next_free: u64) -> Self {
        Self {
            id,
            pointer: next_free,
            generation,
            free: true,
            update: false,
        }
    }
}

/// Sorts records by object number and splits them into runs of consecutive ids.
///
/// When an object number appears more than once the record written last wins.
pub fn partition_runs(entries: &[XRef]) -> Vec<Vec<XRef>> {
    let ordered: BTreeMap<u32, XRef> = entries.iter().map(|entry| (entry.id, *entry)).collect();
    let ordered: Vec<XRef> = ordered.into_values().collect();

    ordered
        .chunk_by(|a, b| a.id.checked_add(1) == Some(b.id))
        .map(<[XRef]>::to_vec)
        .collect()
}

/// One 20-byte record: `pad10(pointer) pad5(generation) status CR LF`.
///
/// The status is `f` for free records and `n` for in-use ones. A record
/// flagged both or neither, or whose numbers overflow their fields, fails
/// the length check.
pub fn encode_xref_record(entry: &XRef) -> Result<Vec<u8>> {
    let mut record = Vec::with_capacity(XREF_RECORD_LEN);
    record.extend_from_slice(&pad(OFFSET_WIDTH, entry.pointer));
    record.push(SPACE);
    record.extend_from_slice(&pad(GENERATION_WIDTH, u64::from(entry.generation)));
    record.push(SPACE);
    if entry.free {
        record.push(FREE);
    }
    if entry.update {
        record.push(IN_USE);
    }
    record.extend_from_slice(EOL);

    if record.len() != XREF_RECORD_LEN {
        return Err(PdfError::FormatInvariantViolation {
            expected: XREF_RECORD_LEN,
            actual: record.len(),
            record: String::from_utf8_lossy(&record).into_owned(),
        });
    }
    Ok(record)
}

/// `xref` CR LF, then for every run `first count` CR LF and its records.
pub fn build_xref_table(entries: &[XRef]) -> Result<Vec<u8>> {
    let runs = partition_runs(entries);

    let mut out = Vec::with_capacity(XREF.len() + 2 + entries.len() * (XREF_RECORD_LEN + 2));
    out.extend_from_slice(XREF);
    out.extend_from_slice(EOL);

    for run in &runs {
        let Some(first) = run.first() else {
            continue;
        };
        out.extend_from_slice(&encode_integer(first.id));
        out.push(SPACE);
        out.extend_from_slice(&encode_integer(run.len() as u64));
        out.extend_from_slice(EOL);
        tracing::debug!("xref subsection {} {}", first.id, run.len());

        for entry in run {
            out.extend_from_slice(&encode_xref_record(entry)?);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(runs: &[Vec<XRef>]) -> Vec<Vec<u32>> {
        runs.iter()
            .map(|run| run.iter().map(|entry| entry.id).collect())
            .collect()
    }

    #[test]
    fn test_partition_runs() {
        let entries: Vec<XRef> = [7, 3, 0, 5, 6, 1]
            .iter()
            .map(|&id| XRef::in_use(id, 0, 100))
            .collect();

        assert_eq!(ids(&partition_runs(&entries)), vec![vec![0, 1], vec![3], vec![5, 6, 7]]);
    }

    #[test]
    fn test_partition_runs_last_duplicate_wins() {
        let entries = [XRef::in_use(4, 0, 10), XRef::in_use(4, 0, 99)];
        let runs = partition_runs(&entries);
        assert_eq!(runs, vec![vec![XRef::in_use(4, 0, 99)]]);
    }

    #[test]
    fn test_partition_runs_empty() {
        assert!(partition_runs(&[]).is_empty());
    }

    #[test]
    fn test_encode_record() {
        let record = encode_xref_record(&XRef::in_use(1, 0, 1234)).unwrap();
        assert_eq!(record, b"0000001234 00000 n\r\n");

        let head = encode_xref_record(&XRef::free(0, 65535, 0)).unwrap();
        assert_eq!(head, b"0000000000 65535 f\r\n");
    }

    #[test]
    fn test_encode_record_rejects_bad_status() {
        let both = XRef {
            free: true,
            ..XRef::in_use(1, 0, 9)
        };
        let neither = XRef {
            update: false,
            ..XRef::in_use(1, 0, 9)
        };

        for entry in [both, neither] {
            match encode_xref_record(&entry) {
                Err(PdfError::FormatInvariantViolation { expected, .. }) => {
                    assert_eq!(expected, XREF_RECORD_LEN)
                }
                other => panic!("expected a format violation, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_encode_record_rejects_oversized_offset() {
        let result = encode_xref_record(&XRef::in_use(1, 0, 12_345_678_901));
        assert!(matches!(
            result,
            Err(PdfError::FormatInvariantViolation { actual: 21, .. })
        ));
    }

    #[test]
    fn test_build_table() {
        let entries = [
            XRef::in_use(7, 0, 120),
            XRef::in_use(8, 0, 150),
            XRef::in_use(3, 0, 180),
            XRef::free(0, 65535, 0),
        ];

        let table = build_xref_table(&entries).unwrap();
        let expected = "xref\r\n\
                        0 1\r\n\
                        0000000000 65535 f\r\n\
                        3 1\r\n\
                        0000000180 00000 n\r\n\
                        7 2\r\n\
                        0000000120 00000 n\r\n\
                        0000000150 00000 n\r\n";
        assert_eq!(String::from_utf8(table).unwrap(), expected);
    }
}
