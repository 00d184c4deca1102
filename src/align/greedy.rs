//! First-come pitch-equality matching.

use crate::note::{AlignmentRecord, Note};

/// Match score notes to performance notes by pitch alone.
///
/// Score notes are visited in input order; each takes the first unconsumed
/// performance note of equal pitch, or becomes a DELETION. Performance
/// notes left over become INSERTIONs. No time ordering is assumed, which
/// makes this the fallback when time data is insufficient.
///
/// # Example
/// ```
/// use segno::{simple_match, AlignmentRecord, Note};
///
/// let score = vec![Note::score(0.0, 1.0, 60, "s0")];
/// let performance = vec![
///     Note::performance(0.0, 1.0, 60, 70, "p0"),
///     Note::performance(1.0, 1.0, 64, 70, "p1"),
/// ];
/// let alignment = simple_match(&score, &performance);
/// assert_eq!(alignment[0], AlignmentRecord::matched("s0", "p0"));
/// assert_eq!(alignment[1], AlignmentRecord::inserted("p1"));
/// ```
pub fn simple_match(score_notes: &[Note], performance_notes: &[Note]) -> Vec<AlignmentRecord> {
    let mut alignment = Vec::with_capacity(score_notes.len() + performance_notes.len());
    let mut consumed = vec![false; performance_notes.len()];

    for score_note in score_notes {
        let found = performance_notes
            .iter()
            .enumerate()
            .find(|(i, p)| !consumed[*i] && p.pitch == score_note.pitch);
        match found {
            Some((i, perf_note)) => {
                consumed[i] = true;
                alignment.push(AlignmentRecord::matched(&score_note.id, &perf_note.id));
            }
            None => alignment.push(AlignmentRecord::deleted(&score_note.id)),
        }
    }

    for (i, perf_note) in performance_notes.iter().enumerate() {
        if !consumed[i] {
            alignment.push(AlignmentRecord::inserted(&perf_note.id));
        }
    }

    alignment
}
