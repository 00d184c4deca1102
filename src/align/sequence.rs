//! Sequence-augmented greedy matching.
//!
//! The per-window workhorse: notes are grouped by pitch, score onsets are
//! mapped into performance time through the coarse alignment, and the two
//! onset sequences of each pitch are matched in rank order. When one side
//! has k extra notes, a combinatorial search picks the k omissions that
//! minimize the squared onset error of the remaining pairs; past
//! `cap_combinations` candidates the search switches to uniform random
//! subset sampling.

use rand::Rng;

use crate::align::greedy::simple_match;
use crate::align::times::TimeAlignment;
use crate::interpolate::LinearInterpolator;
use crate::note::{unique_pitches, AlignmentRecord, Note};

/// Lexicographic k-subset iterator over `0..n`.
///
/// Yields each subset exactly once, indices ascending within a subset.
struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Combinations {
            n,
            k,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        if self.k == 0 {
            self.done = true;
            return Some(current);
        }

        let mut i = self.k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] != i + self.n - self.k {
                self.indices[i] += 1;
                for j in i + 1..self.k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }
        Some(current)
    }
}

/// Binomial coefficient as f64, product form to dodge overflow.
fn count_combinations(n: usize, k: usize) -> f64 {
    let mut total = 1.0f64;
    for i in 0..k {
        total *= (n - i) as f64 / (i + 1) as f64;
    }
    total
}

/// Squared onset error after removing `omit` (sorted ascending) from
/// `long_times`, optionally with the mean residual subtracted first.
fn omission_score(long_times: &[f32], short_times: &[f32], omit: &[usize], shift: bool) -> f64 {
    let mut residuals = Vec::with_capacity(short_times.len());
    let mut omit_iter = omit.iter().peekable();
    let mut b = 0usize;
    for (a, &t) in long_times.iter().enumerate() {
        if omit_iter.peek() == Some(&&a) {
            omit_iter.next();
            continue;
        }
        if b < short_times.len() {
            residuals.push(t as f64 - short_times[b] as f64);
            b += 1;
        }
    }

    let mean = if shift && !residuals.is_empty() {
        residuals.iter().sum::<f64>() / residuals.len() as f64
    } else {
        0.0
    };
    residuals.iter().map(|r| (r - mean) * (r - mean)).sum()
}

/// Find the k-subset of `long_times` whose removal best matches
/// `short_times` by rank order; k = length difference.
///
/// Enumerates exhaustively while `C(n, k) ≤ cap_combinations`, otherwise
/// samples that many subsets uniformly at random. The first candidate
/// achieving the minimum wins, which makes the exhaustive branch
/// deterministic (lexicographically smallest minimizer).
fn best_omission<R: Rng>(
    long_times: &[f32],
    short_times: &[f32],
    shift: bool,
    cap_combinations: usize,
    rng: &mut R,
) -> Vec<usize> {
    let n = long_times.len();
    let k = n - short_times.len();
    if k == 0 {
        return Vec::new();
    }

    let mut best_score = f64::INFINITY;
    let mut best: Vec<usize> = Vec::new();

    let consider = |omit: Vec<usize>, best_score: &mut f64, best: &mut Vec<usize>| {
        let score = omission_score(long_times, short_times, &omit, shift);
        if score < *best_score {
            *best_score = score;
            *best = omit;
        }
    };

    if count_combinations(n, k) <= cap_combinations as f64 {
        for omit in Combinations::new(n, k) {
            consider(omit, &mut best_score, &mut best);
        }
    } else {
        for _ in 0..cap_combinations {
            let mut omit = rand::seq::index::sample(rng, n, k).into_vec();
            omit.sort_unstable();
            consider(omit, &mut best_score, &mut best);
        }
    }

    best
}

/// Match one window of score notes against performance notes using
/// interpolated onset times, with the thread-local RNG for subset sampling.
///
/// See [`sequence_greedy_match_with_rng`] for the seedable variant and the
/// full algorithm description.
pub fn sequence_greedy_match(
    score_notes: &[Note],
    performance_notes: &[Note],
    alignment_times: &[TimeAlignment],
    shift: bool,
    cap_combinations: usize,
) -> Vec<AlignmentRecord> {
    sequence_greedy_match_with_rng(
        score_notes,
        performance_notes,
        alignment_times,
        shift,
        cap_combinations,
        &mut rand::thread_rng(),
    )
}

/// Match one window of score notes against performance notes.
///
/// With fewer than two alignment nodes there is no usable time map and the
/// call falls back to [`simple_match`]. Otherwise, per pitch present in the
/// score window: score onsets are interpolated into performance time, both
/// onset lists are sorted, and the longer list drops its k surplus entries
/// via the combinatorial omission search before rank-order pairing. Omitted
/// score notes become DELETIONs, omitted performance notes INSERTIONs, and
/// performance notes of pitches the score never uses are swept into
/// INSERTIONs at the end.
///
/// Every score note of the window appears exactly once in the result; every
/// performance note at most once (exactly once counting the final sweep).
pub fn sequence_greedy_match_with_rng<R: Rng>(
    score_notes: &[Note],
    performance_notes: &[Note],
    alignment_times: &[TimeAlignment],
    shift: bool,
    cap_combinations: usize,
    rng: &mut R,
) -> Vec<AlignmentRecord> {
    if alignment_times.len() < 2 {
        return simple_match(score_notes, performance_notes);
    }

    let score_times: Vec<f32> = alignment_times.iter().map(|t| t.score_time).collect();
    let perf_times: Vec<f32> = alignment_times.iter().map(|t| t.performance_time).collect();
    let interpolator = match LinearInterpolator::new(&score_times, &perf_times) {
        Ok(interpolator) => interpolator,
        Err(_) => return simple_match(score_notes, performance_notes),
    };

    let mut alignment = Vec::with_capacity(score_notes.len() + performance_notes.len());
    let mut consumed = vec![false; performance_notes.len()];

    for pitch in unique_pitches(score_notes) {
        let s_idx: Vec<usize> = (0..score_notes.len())
            .filter(|&i| score_notes[i].pitch == pitch)
            .collect();
        let p_idx: Vec<usize> = (0..performance_notes.len())
            .filter(|&i| performance_notes[i].pitch == pitch)
            .collect();

        if p_idx.is_empty() {
            for &i in &s_idx {
                alignment.push(AlignmentRecord::deleted(&score_notes[i].id));
            }
            continue;
        }

        // score onsets mapped into performance time, then both sides sorted
        let s_onsets: Vec<f32> = s_idx
            .iter()
            .map(|&i| interpolator.at(score_notes[i].onset_beat))
            .collect();
        let p_onsets: Vec<f32> = p_idx.iter().map(|&i| performance_notes[i].onset_sec).collect();

        let mut s_order: Vec<usize> = (0..s_onsets.len()).collect();
        s_order.sort_by(|&a, &b| s_onsets[a].total_cmp(&s_onsets[b]));
        let mut p_order: Vec<usize> = (0..p_onsets.len()).collect();
        p_order.sort_by(|&a, &b| p_onsets[a].total_cmp(&p_onsets[b]));

        let sorted_s: Vec<f32> = s_order.iter().map(|&i| s_onsets[i]).collect();
        let sorted_p: Vec<f32> = p_order.iter().map(|&i| p_onsets[i]).collect();

        let score_note_at = |rank: usize| &score_notes[s_idx[s_order[rank]]];
        let perf_note_at = |rank: usize| {
            let i = p_idx[p_order[rank]];
            (i, &performance_notes[i])
        };

        let n_s = sorted_s.len();
        let n_p = sorted_p.len();

        if n_s == n_p {
            for rank in 0..n_s {
                let (pi, perf_note) = perf_note_at(rank);
                consumed[pi] = true;
                alignment.push(AlignmentRecord::matched(&score_note_at(rank).id, &perf_note.id));
            }
        } else if n_s > n_p {
            let omit = best_omission(&sorted_s, &sorted_p, shift, cap_combinations, rng);
            let mut omitted = vec![false; n_s];
            for &i in &omit {
                omitted[i] = true;
            }
            let mut b = 0usize;
            for rank in 0..n_s {
                if !omitted[rank] && b < n_p {
                    let (pi, perf_note) = perf_note_at(b);
                    consumed[pi] = true;
                    alignment
                        .push(AlignmentRecord::matched(&score_note_at(rank).id, &perf_note.id));
                    b += 1;
                } else {
                    alignment.push(AlignmentRecord::deleted(&score_note_at(rank).id));
                }
            }
        } else {
            let omit = best_omission(&sorted_p, &sorted_s, shift, cap_combinations, rng);
            let mut omitted = vec![false; n_p];
            for &i in &omit {
                omitted[i] = true;
            }
            let mut b = 0usize;
            for rank in 0..n_p {
                let (pi, perf_note) = perf_note_at(rank);
                consumed[pi] = true;
                if !omitted[rank] && b < n_s {
                    alignment.push(AlignmentRecord::matched(&score_note_at(b).id, &perf_note.id));
                    b += 1;
                } else {
                    alignment.push(AlignmentRecord::inserted(&perf_note.id));
                }
            }
        }
    }

    for (i, perf_note) in performance_notes.iter().enumerate() {
        if !consumed[i] {
            alignment.push(AlignmentRecord::inserted(&perf_note.id));
        }
    }

    alignment
}
