//! Fusing per-window alignments into one global, conflict-free alignment.

use std::collections::HashMap;

use crate::align::greedy::simple_match;
use crate::align::times::TimeAlignment;
use crate::note::{AlignmentRecord, Note};

/// Merge overlapping per-window alignments into a single alignment that
/// names every score id and every performance id exactly once.
///
/// MATCH candidates are collected per score note across windows; score
/// notes are visited in score-array order and accept their earliest-window
/// candidate whose performance note is still unused. Notes left unmatched
/// go through [`simple_match`] restricted to the residuals, and whatever
/// remains becomes DELETION (score side) or INSERTION (performance side),
/// so mending never fails.
///
/// `node_times` and `max_traversal_depth` are accepted for a future
/// graph-walk conflict resolver and do not influence the earliest-window
/// policy.
pub fn mend_alignments(
    window_alignments: &[Vec<AlignmentRecord>],
    score_notes: &[Note],
    performance_notes: &[Note],
    _node_times: &[TimeAlignment],
    _max_traversal_depth: usize,
) -> Vec<AlignmentRecord> {
    // ids -> dense handles; all downstream bookkeeping is index-based
    let score_index: HashMap<&str, usize> = score_notes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let perf_index: HashMap<&str, usize> = performance_notes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    // per score note: (window_id, performance handle) candidates
    let mut candidates: Vec<Vec<(usize, usize)>> = vec![Vec::new(); score_notes.len()];
    for (window_id, alignment) in window_alignments.iter().enumerate() {
        for record in alignment {
            if let AlignmentRecord::Match {
                score_id,
                performance_id,
            } = record
            {
                if let (Some(&s), Some(&p)) =
                    (score_index.get(score_id.as_str()), perf_index.get(performance_id.as_str()))
                {
                    candidates[s].push((window_id, p));
                }
            }
        }
    }

    let mut alignment = Vec::with_capacity(score_notes.len() + performance_notes.len());
    let mut score_used = vec![false; score_notes.len()];
    let mut perf_used = vec![false; performance_notes.len()];

    for (s, note_candidates) in candidates.iter_mut().enumerate() {
        note_candidates.sort_by_key(|&(window_id, _)| window_id);
        if let Some(&(_, p)) = note_candidates.iter().find(|&&(_, p)| !perf_used[p]) {
            score_used[s] = true;
            perf_used[p] = true;
            alignment.push(AlignmentRecord::matched(
                &score_notes[s].id,
                &performance_notes[p].id,
            ));
        }
    }

    // residuals get one more chance via pitch-only greedy matching
    let residual_score: Vec<Note> = score_notes
        .iter()
        .enumerate()
        .filter(|(i, _)| !score_used[*i])
        .map(|(_, n)| n.clone())
        .collect();
    let residual_perf: Vec<Note> = performance_notes
        .iter()
        .enumerate()
        .filter(|(i, _)| !perf_used[*i])
        .map(|(_, n)| n.clone())
        .collect();

    alignment.extend(simple_match(&residual_score, &residual_perf));
    alignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Label;

    fn score_notes(n: usize) -> Vec<Note> {
        (0..n)
            .map(|i| Note::score(i as f32, 0.5, 60 + i as u8, &format!("s{i}")))
            .collect()
    }

    fn perf_notes(n: usize) -> Vec<Note> {
        (0..n)
            .map(|i| Note::performance(i as f32, 0.5, 60 + i as u8, 70, &format!("p{i}")))
            .collect()
    }

    fn assert_global_invariants(
        alignment: &[AlignmentRecord],
        score: &[Note],
        performance: &[Note],
    ) {
        for n in score {
            let occurrences = alignment
                .iter()
                .filter(|r| r.score_id() == Some(n.id.as_str()))
                .count();
            assert_eq!(occurrences, 1, "score id {} appears {occurrences} times", n.id);
        }
        for n in performance {
            let occurrences = alignment
                .iter()
                .filter(|r| r.performance_id() == Some(n.id.as_str()))
                .count();
            assert_eq!(occurrences, 1, "perf id {} appears {occurrences} times", n.id);
        }
    }

    #[test]
    fn test_agreeing_windows_deduplicate() {
        let score = score_notes(2);
        let performance = perf_notes(2);
        let window = vec![
            AlignmentRecord::matched("s0", "p0"),
            AlignmentRecord::matched("s1", "p1"),
        ];
        let alignment = mend_alignments(
            &[window.clone(), window],
            &score,
            &performance,
            &[],
            150,
        );
        assert_eq!(alignment.len(), 2);
        assert_global_invariants(&alignment, &score, &performance);
    }

    #[test]
    fn test_earliest_window_wins_conflicts() {
        let score = score_notes(1);
        let mut performance = perf_notes(1);
        performance.push(Note::performance(5.0, 0.5, 60, 70, "alt"));

        let w0 = vec![AlignmentRecord::matched("s0", "p0")];
        let w1 = vec![AlignmentRecord::matched("s0", "alt")];
        let alignment = mend_alignments(&[w0, w1], &score, &performance, &[], 150);

        assert!(alignment.contains(&AlignmentRecord::matched("s0", "p0")));
        assert!(alignment.contains(&AlignmentRecord::inserted("alt")));
        assert_global_invariants(&alignment, &score, &performance);
    }

    #[test]
    fn test_contended_performance_note_falls_through() {
        // both score notes claim p0; the loser picks up p1 via the greedy
        // fallback because the pitches agree
        let mut score = score_notes(1);
        score.push(Note::score(1.0, 0.5, 60, "rival"));
        let performance = vec![
            Note::performance(0.0, 0.5, 60, 70, "p0"),
            Note::performance(1.0, 0.5, 60, 70, "p1"),
        ];

        let w0 = vec![AlignmentRecord::matched("s0", "p0")];
        let w1 = vec![AlignmentRecord::matched("rival", "p0")];
        let alignment = mend_alignments(&[w0, w1], &score, &performance, &[], 150);

        assert!(alignment.contains(&AlignmentRecord::matched("s0", "p0")));
        assert!(alignment.contains(&AlignmentRecord::matched("rival", "p1")));
        assert_global_invariants(&alignment, &score, &performance);
    }

    #[test]
    fn test_residuals_become_deletions_and_insertions() {
        let score = score_notes(2);
        let performance = perf_notes(1);
        let w0 = vec![AlignmentRecord::matched("s0", "p0")];
        let alignment = mend_alignments(&[w0], &score, &performance, &[], 150);

        assert!(alignment.contains(&AlignmentRecord::deleted("s1")));
        assert_global_invariants(&alignment, &score, &performance);
    }

    #[test]
    fn test_no_windows_everything_residual() {
        let score = score_notes(2);
        let performance = perf_notes(2);
        let alignment = mend_alignments(&[], &score, &performance, &[], 150);
        // pitch-equal residuals still pair up greedily
        assert_eq!(
            alignment.iter().filter(|r| r.label() == Label::Match).count(),
            2
        );
        assert_global_invariants(&alignment, &score, &performance);
    }
}
