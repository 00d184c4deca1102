//! Cutting note arrays into overlapping windows around alignment nodes.

use crate::align::times::TimeAlignment;
use crate::note::Note;

/// A matched pair of note subsets around one coarse alignment interval.
#[derive(Debug, Clone, Default)]
pub struct Window {
    pub score: Vec<Note>,
    pub performance: Vec<Note>,
}

/// Cut both note arrays into overlapping windows around the alignment nodes.
///
/// Window `i` spans score times `[t_i − sfuzziness, t_{i+window_size} +
/// sfuzziness]` and the corresponding performance interval widened by
/// `pfuzziness`; with `pfuzziness_relative_to_tempo` the performance margin
/// scales with the interval's local tempo ratio. Notes are selected on
/// their onsets, boundaries inclusive. Windows overlap by design; the
/// mender resolves the duplicates.
///
/// Fewer than two nodes yield a single window holding both full arrays.
/// The last interval (`i = nodes − window_size`) is not emitted.
pub fn cut_note_arrays(
    score_notes: &[Note],
    performance_notes: &[Note],
    alignment_times: &[TimeAlignment],
    sfuzziness: f32,
    pfuzziness: f32,
    window_size: usize,
    pfuzziness_relative_to_tempo: bool,
) -> Vec<Window> {
    if alignment_times.len() < 2 {
        return vec![Window {
            score: score_notes.to_vec(),
            performance: performance_notes.to_vec(),
        }];
    }

    let count = alignment_times.len().saturating_sub(window_size);
    let mut windows = Vec::with_capacity(count);

    for i in 0..count {
        let start = alignment_times[i];
        let end = alignment_times[i + window_size];

        let p_margin = if pfuzziness_relative_to_tempo {
            let tempo_ratio = (end.performance_time - start.performance_time)
                / (end.score_time - start.score_time).max(1e-6);
            pfuzziness * tempo_ratio.max(1e-6)
        } else {
            pfuzziness
        };

        let s_lo = start.score_time - sfuzziness;
        let s_hi = end.score_time + sfuzziness;
        let p_lo = start.performance_time - p_margin;
        let p_hi = end.performance_time + p_margin;

        windows.push(Window {
            score: score_notes
                .iter()
                .filter(|n| n.onset_beat >= s_lo && n.onset_beat <= s_hi)
                .cloned()
                .collect(),
            performance: performance_notes
                .iter()
                .filter(|n| n.onset_sec >= p_lo && n.onset_sec <= p_hi)
                .cloned()
                .collect(),
        });
    }

    windows
}
